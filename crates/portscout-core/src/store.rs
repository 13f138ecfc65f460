//! Storage seam for the persisted session token.
//!
//! The persisted layout is a single opaque string under a fixed
//! identifier -- "exists or not" is the whole schema. Durable backends
//! (OS keyring, token file) live in `portscout-config`; this crate only
//! defines the seam and the in-memory test double.

use std::sync::Mutex;

use crate::error::CoreError;
use portscout_api::SessionToken;

/// Persists and retrieves the opaque session token. No business logic:
/// expiry checks and state transitions belong to `SessionManager`.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any. A missing token is `Ok(None)`,
    /// never an error.
    fn load(&self) -> Result<Option<SessionToken>, CoreError>;

    /// Replace the stored token.
    fn store(&self, token: &SessionToken) -> Result<(), CoreError>;

    /// Remove the stored token. Idempotent.
    fn clear(&self) -> Result<(), CoreError>;
}

/// In-memory store used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<SessionToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a token, for startup-path tests.
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, CoreError> {
        Ok(self.slot.lock().map_err(poisoned)?.clone())
    }

    fn store(&self, token: &SessionToken) -> Result<(), CoreError> {
        *self.slot.lock().map_err(poisoned)? = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        *self.slot.lock().map_err(poisoned)? = None;
        Ok(())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::TokenStore {
        message: "token store lock poisoned".into(),
    }
}
