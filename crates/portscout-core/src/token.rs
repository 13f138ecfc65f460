//! Session-token expiry inspection.
//!
//! The backend issues three-part dot-separated signed tokens whose
//! payload segment is base64url JSON carrying an `exp` claim (seconds
//! since epoch). The client holds no verification key and never checks
//! the signature -- it only peeks at `exp` to decide whether presenting
//! the token is worthwhile. Every decode failure is treated as expired:
//! this path fails closed, never open.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use portscout_api::SessionToken;

#[derive(Deserialize)]
struct Claims {
    exp: i64,
}

/// Extract the expiry instant in milliseconds since epoch, or `None` if
/// the token is not structured as expected (wrong segment count, bad
/// base64, non-JSON payload, missing `exp`).
pub fn expiry_millis(token: &SessionToken) -> Option<i64> {
    let segments: Vec<&str> = token.as_str().split('.').collect();
    let [_header, payload, _signature] = segments.as_slice() else {
        return None;
    };

    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&decoded).ok()?;
    claims.exp.checked_mul(1000)
}

/// Whether the token is expired as of `now_millis`. Malformed tokens are
/// expired by definition.
pub fn is_expired(token: &SessionToken, now_millis: i64) -> bool {
    match expiry_millis(token) {
        Some(exp_millis) => now_millis >= exp_millis,
        None => true,
    }
}
