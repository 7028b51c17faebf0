use std::time::Duration;

use a2a_auth::RequestSigner;
use a2a_contract::{AgentMeta, CreateTask, ErrorCode, ErrorPayload, Event, Task, TaskAck, TaskId, headers};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::Instant;

/// Configuration for [`AgentClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-HTTP-call timeout.
    pub request_timeout: Duration,
    /// Delay between polls in [`AgentClient::run_task`].
    pub poll_interval: Duration,
    /// Upper bound on [`AgentClient::run_task`] waiting for a terminal status.
    pub poll_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            poll_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid agent url: {0}")]
    InvalidUrl(String),

    #[error("agent answered {status}: {error}")]
    Remote { status: u16, error: ErrorPayload },

    #[error("agent answered {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("decode response: {0}")]
    Decode(String),

    #[error("task not terminal after {0:?}")]
    Timeout(Duration),
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Remote { error, .. } => error.code,
            Self::Timeout(_) => ErrorCode::Timeout,
            Self::Http(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::InvalidUrl(_) => ErrorCode::ValidationFailed,
            _ => ErrorCode::Internal,
        }
    }

    /// The remote payload when there is one, otherwise a payload describing
    /// the local failure.
    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            Self::Remote { error, .. } => error.clone(),
            other => ErrorPayload::new(other.code(), other.to_string()),
        }
    }
}

/// Calling side of the A2A contract.
///
/// Signs every request when built with a [`RequestSigner`] and forwards the
/// trace id given per call.
#[derive(Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    signer: Option<RequestSigner>,
    config: ClientConfig,
}

impl AgentClient {
    pub fn new(config: ClientConfig, signer: Option<RequestSigner>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            signer,
            config,
        })
    }

    pub async fn create_task(
        &self,
        base_url: &str,
        request: &CreateTask,
        trace_id: Option<&str>,
    ) -> Result<TaskAck, ClientError> {
        let url = endpoint(base_url, "/tasks")?;
        let body = serde_json::to_vec(request).map_err(|e| ClientError::Decode(e.to_string()))?;
        let response = self.send(Method::POST, url, body, trace_id).await?;
        decode(response).await
    }

    pub async fn get_task(
        &self,
        base_url: &str,
        task_id: &TaskId,
        trace_id: Option<&str>,
    ) -> Result<Task, ClientError> {
        let url = endpoint(base_url, &format!("/tasks/{task_id}"))?;
        let response = self.send(Method::GET, url, Vec::new(), trace_id).await?;
        decode(response).await
    }

    /// Create a task and poll it until it reaches a terminal status.
    ///
    /// A task that ends `FAILED` is returned as `Ok`; callers inspect
    /// `status`. Gives up with [`ClientError::Timeout`] after
    /// `poll_timeout`.
    pub async fn run_task(
        &self,
        base_url: &str,
        request: &CreateTask,
        trace_id: Option<&str>,
    ) -> Result<Task, ClientError> {
        let ack = self.create_task(base_url, request, trace_id).await?;
        let give_up = Instant::now() + self.config.poll_timeout;
        loop {
            let task = self.get_task(base_url, &ack.task_id, trace_id).await?;
            if task.is_terminal() {
                return Ok(task);
            }
            if Instant::now() + self.config.poll_interval > give_up {
                return Err(ClientError::Timeout(self.config.poll_timeout));
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    pub async fn discover(&self, base_url: &str) -> Result<AgentMeta, ClientError> {
        let url = endpoint(base_url, "/.well-known/agent.json")?;
        let response = self.send(Method::GET, url, Vec::new(), None).await?;
        decode(response).await
    }

    /// POST an event to a full callback URL, usually a caller's `reply_url`.
    pub async fn post_event(
        &self,
        url: &str,
        event: &Event,
        trace_id: Option<&str>,
    ) -> Result<(), ClientError> {
        let url = Url::parse(url).map_err(|e| ClientError::InvalidUrl(format!("{url}: {e}")))?;
        let body = serde_json::to_vec(event).map_err(|e| ClientError::Decode(e.to_string()))?;
        let response = self.send(Method::POST, url, body, trace_id).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let bytes = response.bytes().await?;
        Err(error_from(status, &bytes))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Vec<u8>,
        trace_id: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(signer) = &self.signer {
            let signed =
                signer.sign_request(method.as_str(), url.path(), url.query().unwrap_or(""), &body);
            for (name, value) in signed.pairs() {
                builder = builder.header(name, value);
            }
        }
        if let Some(trace_id) = trace_id {
            builder = builder.header(headers::TRACE_ID, trace_id);
        }
        if !body.is_empty() {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        tracing::trace!(method = %method, url = %url, "a2a request");
        Ok(builder.send().await?)
    }
}

impl std::fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("signer", &self.signer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<Url, ClientError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(error_from(status, &bytes));
    }
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

fn error_from(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ErrorPayload>(body) {
        Ok(error) => ClientError::Remote {
            status: status.as_u16(),
            error,
        },
        Err(_) => ClientError::UnexpectedStatus {
            status: status.as_u16(),
            body: String::from_utf8_lossy(body).into_owned(),
        },
    }
}
