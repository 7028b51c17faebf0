//! HTTP header names used by the authenticated A2A transport.

/// Identity of the calling agent.
pub const AGENT_ID: &str = "x-agent-id";
/// `hmac-sha256:<hex>` over the canonical request string.
pub const SIGNATURE: &str = "x-agent-signature";
/// Opaque distributed-trace id, passed through unchanged.
pub const TRACE_ID: &str = "x-agent-trace-id";
/// RFC 3339 or epoch seconds. Optional.
pub const REQUEST_TIME: &str = "x-agent-request-time";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "hmac-sha256:";
