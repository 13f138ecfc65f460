use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque session token issued by the backend's token endpoint.
///
/// Structurally a three-part signed token whose payload segment carries an
/// `exp` claim, but this crate never looks inside it -- the token is an
/// opaque bearer credential attached verbatim to authenticated requests.
/// Expiry inspection lives in `portscout-core`.
///
/// `Debug` is redacted so tokens never leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token string, for storage or the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..redacted..)")
    }
}

/// Response shape of `POST /api/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: SessionToken,
    pub token_type: String,
}
