use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use a2a_auth::{HmacAuth, body_hash, require_signature};
use a2a_contract::{
    AgentMeta, AuthSpec, CreateTask, ErrorCode, ErrorPayload, Event, Task, TaskAck, TaskId,
    TaskOutcome, TaskStatus, TaskUpdate, headers, validate_create_task,
};
use a2a_task_store::{Reservation, TaskStore};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::client::AgentClient;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::service::AgentService;

/// Configuration for the agent HTTP surface.
#[derive(Clone)]
pub struct ServerConfig {
    /// Deadline given to each inbound request, measured from arrival.
    pub request_timeout: Duration,
    /// Signature check for the `/tasks` routes. `None` serves them unauthenticated.
    pub auth: Option<HmacAuth>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            auth: None,
        }
    }
}

/// Shared state behind [`router`].
#[derive(Clone)]
pub struct AgentState {
    service: Arc<dyn AgentService>,
    store: Arc<dyn TaskStore>,
    client: AgentClient,
    config: ServerConfig,
    shutdown: CancellationToken,
}

impl AgentState {
    /// `client` delivers completion events to `reply_url`s.
    pub fn new(
        service: Arc<dyn AgentService>,
        store: Arc<dyn TaskStore>,
        client: AgentClient,
        config: ServerConfig,
    ) -> Self {
        Self {
            service,
            store,
            client,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancel background work when `token` fires.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }
}

/// Build the uniform agent router. Only the `/tasks` routes sit behind the
/// signature check; health and discovery stay public.
pub fn router(state: AgentState) -> Router {
    let mut tasks = Router::new()
        .route("/tasks", post(create_task))
        .route("/tasks/{id}", get(get_task))
        .route("/tasks/{id}/events", post(post_event));
    if let Some(auth) = state.config.auth.clone() {
        tasks = tasks.route_layer(middleware::from_fn_with_state(auth, require_signature));
    }

    Router::new()
        .route("/healthz", get(healthz))
        .route("/.well-known/agent.json", get(discovery))
        .merge(tasks)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `app` on `addr` until `shutdown` is cancelled.
pub async fn serve(addr: SocketAddr, app: Router, shutdown: CancellationToken) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

/// Cancel `token` on Ctrl-C.
pub async fn shutdown_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown requested"),
        Err(e) => tracing::warn!(error = %e, "ctrl-c handler failed, shutting down"),
    }
    token.cancel();
}

async fn healthz() -> &'static str {
    "ok"
}

async fn discovery(State(state): State<AgentState>) -> Json<AgentMeta> {
    let mut meta = state.service.meta().clone();
    meta.auth = Some(AuthSpec::hmac(state.config.auth.is_some()));
    Json(meta)
}

async fn create_task(
    State(state): State<AgentState>,
    header_map: HeaderMap,
    body: Bytes,
) -> Result<Json<TaskAck>, ApiError> {
    let request: CreateTask = serde_json::from_slice(&body)
        .map_err(|e| ErrorPayload::validation(format!("invalid task request: {e}")))?;
    validate_create_task(&request)?;
    if !state.service.meta().supports(&request.task_type) {
        return Err(ErrorPayload::validation(format!(
            "unsupported task_type: {}",
            request.task_type
        ))
        .into());
    }

    let task_id = TaskId::generate();
    if let Some(key) = request.idempotency_key.as_deref() {
        match state
            .store
            .reserve_idempotency_key(key, &fingerprint(&request), &task_id)
            .await?
        {
            Reservation::Reserved => {}
            Reservation::Existing(existing) => {
                let status = state
                    .store
                    .get(&existing)
                    .await?
                    .map_or(TaskStatus::Pending, |t| t.status);
                tracing::debug!(task_id = %existing, idempotency_key = key, "replayed task");
                return Ok(Json(TaskAck {
                    task_id: existing,
                    status,
                }));
            }
            Reservation::Conflict(existing) => {
                return Err(ErrorPayload::new(
                    ErrorCode::Conflict,
                    format!("idempotency key {key} was used for a different request"),
                )
                .with_hint(format!("original task: {existing}"))
                .into());
            }
        }
    }

    state.store.put(Task::pending(task_id.clone())).await?;
    let ctx = RequestContext::new(
        trace_header(&header_map).map(str::to_string),
        state.config.request_timeout,
    );
    tracing::info!(
        task_id = %task_id,
        task_type = %request.task_type,
        trace_id = %ctx.trace_id,
        "task accepted"
    );

    if let Some(reply_url) = request.reply_url.clone() {
        tokio::spawn(run_in_background(
            state.clone(),
            task_id.clone(),
            ctx,
            request,
            reply_url,
        ));
        return Ok(Json(TaskAck {
            task_id,
            status: TaskStatus::Pending,
        }));
    }

    let idempotency_key = request.idempotency_key.clone();
    match state.service.execute(ctx, request).await {
        Ok(outcome) => {
            let task = state.store.transition(&task_id, outcome.into()).await?;
            Ok(Json(task.ack()))
        }
        Err(rejection) => {
            if let Err(e) = state
                .store
                .transition(&task_id, TaskUpdate::Failed(rejection.clone()))
                .await
            {
                tracing::warn!(task_id = %task_id, error = %e, "failed to record rejection");
            }
            // The caller never saw this task id; a retry must execute again.
            if let Some(key) = idempotency_key.as_deref() {
                state.store.release_idempotency_key(key, &task_id).await?;
            }
            Err(rejection.into())
        }
    }
}

async fn get_task(
    State(state): State<AgentState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::from(id);
    match state.store.get(&id).await? {
        Some(task) => Ok(Json(task)),
        None => Err(ErrorPayload::not_found(format!("task not found: {id}")).into()),
    }
}

async fn post_event(
    State(state): State<AgentState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let event: Event = serde_json::from_slice(&body)
        .map_err(|e| ErrorPayload::validation(format!("invalid event: {e}")))?;
    let id = TaskId::from(id);
    tracing::debug!(
        task_id = %id,
        sender_task_id = %event.task_id,
        event = ?event.event,
        "event received"
    );
    state.store.transition(&id, event.into_update()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Execute a `reply_url` task after the ack has been sent, then report the
/// terminal state to the caller.
async fn run_in_background(
    state: AgentState,
    task_id: TaskId,
    ctx: RequestContext,
    request: CreateTask,
    reply_url: String,
) {
    if let Err(e) = state.store.transition(&task_id, TaskUpdate::Running).await {
        tracing::warn!(task_id = %task_id, error = %e, "cannot start background task");
        return;
    }

    let trace_id = ctx.trace_id.clone();
    let outcome = tokio::select! {
        result = state.service.execute(ctx, request) => result.unwrap_or_else(TaskOutcome::failed),
        () = state.shutdown.cancelled() => {
            TaskOutcome::failed(ErrorPayload::internal("agent shutting down"))
        }
    };

    let task = match state.store.transition(&task_id, outcome.into()).await {
        Ok(task) => task,
        Err(e) => {
            tracing::warn!(task_id = %task_id, error = %e, "cannot finalize background task");
            return;
        }
    };

    let event = match (task.result, task.error) {
        (Some(result), _) => Event::completed(task_id.clone(), result),
        (None, Some(error)) => Event::failed(task_id.clone(), &error),
        (None, None) => Event::completed(task_id.clone(), serde_json::Value::Null),
    };
    if let Err(e) = state.client.post_event(&reply_url, &event, Some(&trace_id)).await {
        tracing::warn!(
            task_id = %task_id,
            reply_url = %reply_url,
            error = %e,
            "completion event not delivered"
        );
    }
}

fn trace_header(header_map: &HeaderMap) -> Option<&str> {
    header_map
        .get(headers::TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Identity of a request's content for idempotency checks.
fn fingerprint(request: &CreateTask) -> String {
    let canonical = format!("{}\n{}", request.task_type, request.input);
    body_hash(canonical.as_bytes())
}
