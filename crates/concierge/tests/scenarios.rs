use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use a2a_agent::{AgentClient, AgentService, AgentState, ClientConfig, RequestContext, ServerConfig, router};
use a2a_auth::{AuthConfig, HmacAuth, RequestSigner, StaticSecrets};
use a2a_carrier::{CarrierConfig, CarrierService};
use a2a_concierge::{ConciergeConfig, ConciergeService, discover_agents};
use a2a_contract::{AgentMeta, CreateTask, ErrorPayload, TaskOutcome, task_types};
use a2a_interpreter::{InterpretService, RuleInterpreter};
use a2a_task_store_memory::MemoryTaskStore;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Pricing agent that records what it was asked.
struct Recorder {
    meta: AgentMeta,
    seen: Arc<Mutex<Vec<(Value, String)>>>,
}

impl Recorder {
    fn new() -> (Self, Arc<Mutex<Vec<(Value, String)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let meta = AgentMeta::new("carrier.recorder", "Recorder", "0.1.0").with_capability(
            task_types::QUOTE,
            "QuoteRequest",
            "QuoteResult",
        );
        (
            Self {
                meta,
                seen: seen.clone(),
            },
            seen,
        )
    }
}

#[async_trait]
impl AgentService for Recorder {
    fn meta(&self) -> &AgentMeta {
        &self.meta
    }

    async fn execute(
        &self,
        ctx: RequestContext,
        request: CreateTask,
    ) -> Result<TaskOutcome, ErrorPayload> {
        self.seen
            .lock()
            .unwrap()
            .push((request.input, ctx.trace_id));
        Ok(TaskOutcome::succeeded(json!({"carrier": "Recorder", "price": 1})))
    }
}

fn client(signer: Option<RequestSigner>) -> AgentClient {
    AgentClient::new(ClientConfig::default(), signer).unwrap()
}

async fn spawn_agent(service: Arc<dyn AgentService>, config: ServerConfig) -> String {
    let state = AgentState::new(service, Arc::new(MemoryTaskStore::new()), client(None), config);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn carrier(name: &str, latency: Duration) -> String {
    let config = CarrierConfig {
        name: name.to_string(),
        latency,
        ..CarrierConfig::default()
    };
    spawn_agent(
        Arc::new(CarrierService::new(format!("carrier.{name}"), config)),
        ServerConfig::default(),
    )
    .await
}

async fn interpreter() -> String {
    spawn_agent(
        Arc::new(InterpretService::new(
            "agent.interpreter",
            Arc::new(RuleInterpreter::new()),
        )),
        ServerConfig::default(),
    )
    .await
}

async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn concierge_with(config: ConciergeConfig, outbound: AgentClient) -> Router {
    let service = ConciergeService::new("agent.concierge", config, outbound.clone());
    router(AgentState::new(
        Arc::new(service),
        Arc::new(MemoryTaskStore::new()),
        outbound,
        ServerConfig::default(),
    ))
}

fn concierge(config: ConciergeConfig) -> Router {
    concierge_with(config, client(None))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .header("content-type", "application/json")
        .header("x-agent-trace-id", "tr_scenario")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn fetch(app: &Router, task_id: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(format!("/tasks/{task_id}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Create a task and return the stored record.
async fn run(app: &Router, body: Value) -> Value {
    let (status, ack) = create(app, body).await;
    assert_eq!(status, StatusCode::OK, "{ack}");
    let (status, task) = fetch(app, ack["task_id"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], ack["status"]);
    task
}

fn structured_quote() -> Value {
    json!({
        "task_type": "QUOTE",
        "input": {
            "from": {"country": "KR"},
            "to": {"country": "US"},
            "parcel": {"weight_kg": 2}
        }
    })
}

fn config(pricing_agents: Vec<String>) -> ConciergeConfig {
    ConciergeConfig {
        ship_agent: pricing_agents.first().cloned().unwrap_or_default(),
        pricing_agents,
        ..ConciergeConfig::default()
    }
}

#[tokio::test]
async fn test_quote_from_two_agents() {
    let agents = vec![
        carrier("AgentA", Duration::ZERO).await,
        carrier("AgentB", Duration::ZERO).await,
    ];
    let app = concierge(config(agents));

    let task = run(&app, structured_quote()).await;
    assert_eq!(task["status"], "SUCCEEDED");
    let quotes = task["result"]["quotes"].as_array().unwrap();
    assert_eq!(quotes.len(), 2);
    for quote in quotes {
        assert_eq!(quote["price"], 10_000);
    }
    let mut carriers: Vec<&str> = quotes.iter().map(|q| q["carrier"].as_str().unwrap()).collect();
    carriers.sort_unstable();
    assert_eq!(carriers, ["AgentA", "AgentB"]);
    assert_eq!(task["result"]["partial_failures"], json!([]));
}

#[tokio::test]
async fn test_silent_agent_is_dropped_at_deadline() {
    let slow = carrier("Sloth", Duration::from_secs(10)).await;
    let agents = vec![carrier("AgentA", Duration::ZERO).await, slow.clone()];
    let app = concierge(config(agents));

    let started = Instant::now();
    let task = run(&app, structured_quote()).await;
    let elapsed = started.elapsed();

    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(task["result"]["quotes"].as_array().unwrap().len(), 1);
    assert_eq!(task["result"]["quotes"][0]["carrier"], "AgentA");
    assert_eq!(
        task["result"]["partial_failures"],
        json!([{
            "agent": slow,
            "code": "TIMEOUT",
            "message": "no answer before aggregation deadline"
        }])
    );
    assert!(elapsed >= Duration::from_millis(1700), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
}

#[tokio::test]
async fn test_failing_agents_never_fail_the_quote() {
    let down = unreachable_url().await;
    let agents = vec![carrier("AgentA", Duration::ZERO).await, down.clone()];
    let app = concierge(config(agents));

    let task = run(&app, structured_quote()).await;
    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(task["result"]["quotes"].as_array().unwrap().len(), 1);
    assert_eq!(task["result"]["partial_failures"][0]["agent"], down);
    assert_eq!(task["result"]["partial_failures"][0]["code"], "INTERNAL");
}

#[tokio::test]
async fn test_all_agents_down_is_an_empty_success() {
    let agents = vec![unreachable_url().await, unreachable_url().await];
    let app = concierge(config(agents));

    let task = run(&app, structured_quote()).await;
    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(task["result"]["quotes"], json!([]));
    assert_eq!(task["result"]["partial_failures"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_quote_is_reported() {
    // The carrier rejects input without a parcel weight.
    let agents = vec![carrier("AgentA", Duration::ZERO).await];
    let app = concierge(config(agents));

    let task = run(
        &app,
        json!({
            "task_type": "QUOTE",
            "input": {"from": {"country": "KR"}, "to": {"country": "US"}, "parcel": {}}
        }),
    )
    .await;
    assert_eq!(task["result"]["quotes"], json!([]));
    assert_eq!(
        task["result"]["partial_failures"][0]["code"],
        "VALIDATION_FAILED"
    );
}

#[tokio::test]
async fn test_utterance_is_interpreted_before_fan_out() {
    let (recorder, seen) = Recorder::new();
    let pricing = spawn_agent(Arc::new(recorder), ServerConfig::default()).await;
    let app = concierge(ConciergeConfig {
        interpreter: interpreter().await,
        ..config(vec![pricing])
    });

    let task = run(
        &app,
        json!({
            "task_type": "QUOTE",
            "input": {"utterance": "2kg 서울에서 샌프란시스코로 빠르게"}
        }),
    )
    .await;
    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(task["result"]["quotes"].as_array().unwrap().len(), 1);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (forwarded, trace_id) = &seen[0];
    assert!(forwarded.get("utterance").is_none());
    assert_eq!(forwarded["from"]["country"], "KR");
    assert_eq!(forwarded["to"]["country"], "US");
    assert_eq!(forwarded["parcel"]["weight_kg"], 2.0);
    assert_eq!(forwarded["options"]["priority"], true);
    assert_eq!(trace_id, "tr_scenario");
}

#[tokio::test]
async fn test_partial_input_is_interpreted() {
    let (recorder, seen) = Recorder::new();
    let pricing = spawn_agent(Arc::new(recorder), ServerConfig::default()).await;
    let app = concierge(ConciergeConfig {
        interpreter: interpreter().await,
        ..config(vec![pricing])
    });

    run(
        &app,
        json!({"task_type": "QUOTE", "input": {"parcel": {"weight_kg": 4}, "to": "usa"}}),
    )
    .await;

    let seen = seen.lock().unwrap();
    let (forwarded, _) = &seen[0];
    assert_eq!(forwarded["from"]["country"], "KR");
    assert_eq!(forwarded["to"]["country"], "US");
    assert!(forwarded["parcel"]["weight_kg"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn test_structured_input_skips_interpreter() {
    let (recorder, seen) = Recorder::new();
    let pricing = spawn_agent(Arc::new(recorder), ServerConfig::default()).await;
    let app = concierge(ConciergeConfig {
        interpreter: unreachable_url().await,
        ..config(vec![pricing])
    });

    let task = run(&app, structured_quote()).await;
    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(seen.lock().unwrap()[0].0, structured_quote()["input"]);
}

#[tokio::test]
async fn test_interpreter_failure_is_validation_failed() {
    let app = concierge(ConciergeConfig {
        interpreter: unreachable_url().await,
        ..config(vec![carrier("AgentA", Duration::ZERO).await])
    });

    let (status, body) = create(
        &app,
        json!({"task_type": "QUOTE", "input": {"utterance": "2kg to usa"}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"].as_str().unwrap().starts_with("interpret failed"));
}

#[tokio::test]
async fn test_non_text_utterance_is_rejected_by_interpreter() {
    let (recorder, seen) = Recorder::new();
    let pricing = spawn_agent(Arc::new(recorder), ServerConfig::default()).await;
    let app = concierge(ConciergeConfig {
        interpreter: interpreter().await,
        ..config(vec![pricing])
    });

    let (status, body) = create(&app, json!({"task_type": "QUOTE", "input": {"utterance": 5}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"].as_str().unwrap().starts_with("interpret failed"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_task_type() {
    let app = concierge(ConciergeConfig::default());
    let (status, body) = create(&app, json!({"task_type": "UNKNOWN", "input": {"a": 1}})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_unknown_task_id() {
    let app = concierge(ConciergeConfig::default());
    let (status, body) = fetch(&app, "t_01jzzzzzzzzzzzzzzzzzzzzzzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_ship_delegation() {
    let app = concierge(config(vec![carrier("AgentA", Duration::ZERO).await]));

    let task = run(
        &app,
        json!({"task_type": "SHIP", "input": {"order_id": "o-1"}, "idempotency_key": "ship-o-1"}),
    )
    .await;
    assert_eq!(task["status"], "SUCCEEDED");
    assert_eq!(task["result"]["status"], "READY");
    assert!(task["result"]["tracking_id"].as_str().unwrap().starts_with("A-"));
}

#[tokio::test]
async fn test_ship_failure_is_internal() {
    let app = concierge(ConciergeConfig {
        ship_agent: unreachable_url().await,
        ..ConciergeConfig::default()
    });

    let task = run(&app, json!({"task_type": "SHIP", "input": {"order_id": "o-1"}})).await;
    assert_eq!(task["status"], "FAILED");
    assert_eq!(task["error"]["code"], "INTERNAL");
    assert!(task.get("result").is_none());
}

#[tokio::test]
async fn test_signed_fan_out() {
    let secrets = StaticSecrets::new().with("agent.concierge", "s3cret");
    let guarded = ServerConfig {
        auth: Some(HmacAuth::new(Arc::new(secrets), AuthConfig::default())),
        ..ServerConfig::default()
    };
    let agent = spawn_agent(
        Arc::new(CarrierService::new("carrier.a", CarrierConfig::default())),
        guarded,
    )
    .await;

    let unsigned = concierge(config(vec![agent.clone()]));
    let task = run(&unsigned, structured_quote()).await;
    assert_eq!(task["result"]["quotes"], json!([]));
    assert_eq!(task["result"]["partial_failures"][0]["code"], "UNAUTHORIZED");

    let signed = concierge_with(
        config(vec![agent]),
        client(Some(RequestSigner::new("agent.concierge", "s3cret"))),
    );
    let task = run(&signed, structured_quote()).await;
    assert_eq!(task["result"]["quotes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_discovery_reports_each_agent() {
    let up = carrier("AgentA", Duration::ZERO).await;
    let down = unreachable_url().await;

    let found = discover_agents(&client(None), &[up.as_str(), down.as_str()]).await;
    assert_eq!(found.len(), 2);
    for (url, meta) in found {
        if url == up {
            let meta = meta.unwrap();
            assert_eq!(meta.agent_id, "carrier.AgentA");
            assert!(meta.supports(task_types::QUOTE));
            assert!(meta.supports(task_types::SHIP));
        } else {
            assert!(meta.is_err());
        }
    }
}
