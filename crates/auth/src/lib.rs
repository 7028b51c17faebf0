//! Authenticated-request envelope for the A2A transport.
//!
//! Requests are signed with HMAC-SHA256 over a canonical string:
//!
//! ```text
//! METHOD \n PATH \n RAW_QUERY \n sha256hex(BODY) \n TIMESTAMP
//! ```
//!
//! [`RequestSigner`] produces the headers on the calling side,
//! [`require_signature`] checks them on the receiving side.

mod error;
mod middleware;
mod secrets;
mod signer;
mod signing;
mod timestamp;

pub use error::AuthError;
pub use middleware::{AuthConfig, HmacAuth, require_signature};
pub use secrets::{SecretProvider, StaticSecrets};
pub use signer::{RequestSigner, SignedHeaders};
pub use signing::{body_hash, canonical_string, sign, verify};
pub use timestamp::{format_request_time, parse_request_time};
