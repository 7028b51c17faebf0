#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use a2a_agent::{AgentClient, AgentService, AgentState, ClientConfig, RequestContext, ServerConfig, router};
use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome};
use a2a_task_store_memory::MemoryTaskStore;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

/// Test agent: `ECHO` returns its input, `FAIL` fails, `REJECT` rejects,
/// `SLOW` echoes after 50ms.
pub struct EchoService {
    meta: AgentMeta,
}

impl EchoService {
    pub fn new() -> Self {
        let mut meta = AgentMeta::new("agent.echo", "Echo", "0.1.0");
        for t in ["ECHO", "FAIL", "REJECT", "SLOW"] {
            meta = meta.with_capability(t, "any", "any");
        }
        Self { meta }
    }
}

#[async_trait]
impl AgentService for EchoService {
    fn meta(&self) -> &AgentMeta {
        &self.meta
    }

    async fn execute(
        &self,
        _ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload> {
        match request.task_type.as_str() {
            "FAIL" => Ok(TaskOutcome::failed(ErrorPayload::internal("boom"))),
            "REJECT" => Err(ErrorPayload::validation("rejected by service")),
            "SLOW" => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(TaskOutcome::succeeded(request.input))
            }
            _ => Ok(TaskOutcome::succeeded(request.input)),
        }
    }
}

pub fn client() -> AgentClient {
    AgentClient::new(ClientConfig::default(), None).unwrap()
}

pub fn app(config: ServerConfig) -> (Router, Arc<MemoryTaskStore>) {
    let store = Arc::new(MemoryTaskStore::new());
    let state = AgentState::new(Arc::new(EchoService::new()), store.clone(), client(), config);
    (router(state), store)
}

/// Serve `app` on an ephemeral localhost port.
pub async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
