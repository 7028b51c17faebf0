use std::sync::Arc;
use std::time::Duration;

use a2a_contract::headers;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::error::AuthError;
use crate::secrets::SecretProvider;
use crate::signing::{canonical_string, verify};
use crate::timestamp::parse_request_time;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Maximum allowed distance between the request time header and now.
    /// Zero disables the check.
    pub clock_skew: Duration,
    /// Bodies larger than this are rejected before hashing.
    pub max_body_bytes: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            clock_skew: Duration::from_secs(120),
            max_body_bytes: 1_048_576, // 1MB
        }
    }
}

/// State for [`require_signature`].
#[derive(Clone)]
pub struct HmacAuth {
    secrets: Arc<dyn SecretProvider>,
    config: AuthConfig,
}

impl HmacAuth {
    pub fn new(secrets: Arc<dyn SecretProvider>, config: AuthConfig) -> Self {
        Self { secrets, config }
    }

    /// Authenticate a buffered request. Returns the caller's agent id.
    pub fn check(
        &self,
        method: &str,
        path: &str,
        raw_query: &str,
        header_map: &HeaderMap,
        body: &[u8],
    ) -> Result<String, AuthError> {
        let agent_id =
            header_str(header_map, headers::AGENT_ID).ok_or(AuthError::MissingHeaders)?;
        let signature =
            header_str(header_map, headers::SIGNATURE).ok_or(AuthError::MissingHeaders)?;
        let timestamp = header_str(header_map, headers::REQUEST_TIME).unwrap_or("");

        if !timestamp.is_empty() && !self.config.clock_skew.is_zero() {
            self.check_skew(timestamp)?;
        }

        let secret = self
            .secrets
            .secret_for(agent_id)
            .ok_or_else(|| AuthError::UnknownAgent(agent_id.to_string()))?;

        let canon = canonical_string(method, path, raw_query, body, timestamp);
        let hex_sig = signature
            .strip_prefix(headers::SIGNATURE_PREFIX)
            .unwrap_or(signature);
        if !verify(&secret, canon.as_bytes(), hex_sig) {
            return Err(AuthError::InvalidSignature);
        }

        Ok(agent_id.to_string())
    }

    /// An unparseable request time is an authentication failure, not a
    /// reason to skip the window check.
    fn check_skew(&self, timestamp: &str) -> Result<(), AuthError> {
        let sent = parse_request_time(timestamp)
            .ok_or_else(|| AuthError::MalformedTimestamp(timestamp.to_string()))?;
        let skew = (Utc::now() - sent).num_seconds();
        let tolerance = i64::try_from(self.config.clock_skew.as_secs()).unwrap_or(i64::MAX);
        if skew.abs() > tolerance {
            return Err(AuthError::ClockSkew { skew_secs: skew });
        }
        Ok(())
    }
}

fn header_str<'a>(header_map: &'a HeaderMap, name: &str) -> Option<&'a str> {
    header_map
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// axum middleware rejecting requests without a valid A2A signature.
///
/// The body is buffered to hash it and handed on unchanged to the next
/// handler. Install with
/// `axum::middleware::from_fn_with_state(auth, require_signature)`.
pub async fn require_signature(
    State(auth): State<HmacAuth>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, auth.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => return AuthError::Body(e.to_string()).into_response(),
    };

    let trace_id = header_str(&parts.headers, headers::TRACE_ID).unwrap_or("-");
    let result = auth.check(
        parts.method.as_str(),
        parts.uri.path(),
        parts.uri.query().unwrap_or(""),
        &parts.headers,
        &bytes,
    );

    match result {
        Ok(agent_id) => {
            tracing::debug!(agent_id = %agent_id, trace_id = %trace_id, "request authenticated");
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(e) => {
            tracing::warn!(
                path = %parts.uri.path(),
                trace_id = %trace_id,
                reason = %e,
                "rejected A2A request"
            );
            e.into_response()
        }
    }
}
