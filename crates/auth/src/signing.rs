use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 of `payload` keyed by `secret`, as lowercase hex.
pub fn sign(secret: &[u8], payload: &[u8]) -> String {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Recompute the signature and compare in constant time.
///
/// Lengths are compared first; only equal-length inputs reach the
/// byte-wise comparison.
pub fn verify(secret: &[u8], payload: &[u8], hex_signature: &str) -> bool {
    let expected = sign(secret, payload);
    if expected.len() != hex_signature.len() {
        return false;
    }
    expected.as_bytes().ct_eq(hex_signature.as_bytes()).into()
}

/// SHA-256 of `body` as lowercase hex.
pub fn body_hash(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

/// Deterministic string that gets signed for a request.
///
/// The body is hashed rather than embedded so the canonical form stays small
/// and the verifier never has to re-serialize it.
pub fn canonical_string(
    method: &str,
    path: &str,
    raw_query: &str,
    body: &[u8],
    timestamp: &str,
) -> String {
    format!(
        "{method}\n{path}\n{raw_query}\n{}\n{timestamp}",
        body_hash(body)
    )
}
