use a2a_contract::headers;
use chrono::{DateTime, Utc};

use crate::signing::{canonical_string, sign};
use crate::timestamp::format_request_time;

/// Headers that authenticate one outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub agent_id: String,
    /// Full header value, `hmac-sha256:<hex>`.
    pub signature: String,
    pub request_time: String,
}

impl SignedHeaders {
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (headers::AGENT_ID, self.agent_id.as_str()),
            (headers::SIGNATURE, self.signature.as_str()),
            (headers::REQUEST_TIME, self.request_time.as_str()),
        ]
    }
}

/// Signs outgoing requests on behalf of one agent identity.
#[derive(Clone)]
pub struct RequestSigner {
    agent_id: String,
    secret: Vec<u8>,
}

impl RequestSigner {
    pub fn new(agent_id: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        Self {
            agent_id: agent_id.into(),
            secret: secret.into(),
        }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn sign_request(
        &self,
        method: &str,
        path: &str,
        raw_query: &str,
        body: &[u8],
    ) -> SignedHeaders {
        self.sign_request_at(method, path, raw_query, body, Utc::now())
    }

    pub fn sign_request_at(
        &self,
        method: &str,
        path: &str,
        raw_query: &str,
        body: &[u8],
        at: DateTime<Utc>,
    ) -> SignedHeaders {
        let request_time = format_request_time(at);
        let canon = canonical_string(method, path, raw_query, body, &request_time);
        SignedHeaders {
            agent_id: self.agent_id.clone(),
            signature: format!(
                "{}{}",
                headers::SIGNATURE_PREFIX,
                sign(&self.secret, canon.as_bytes())
            ),
            request_time,
        }
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("agent_id", &self.agent_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}
