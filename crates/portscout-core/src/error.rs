// ── Core error types ──
//
// User-facing errors from portscout-core. Consumers never see raw HTTP
// statuses or JSON parse failures -- the `From<portscout_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// No valid session token is available; the operator must log in.
    #[error("Not logged in -- run `portscout login` first")]
    AuthRequired,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Switch lifecycle ─────────────────────────────────────────────
    #[error("Cannot reach switch {ip}: {reason}")]
    ConnectionFailed { ip: String, reason: String },

    /// A connect or disconnect is already in flight; the session accepts
    /// one lifecycle operation at a time.
    #[error("A connection attempt is already in progress")]
    ConnectInProgress,

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    // ── Storage ──────────────────────────────────────────────────────
    /// The token store could not be read or written.
    #[error("Token storage error: {message}")]
    TokenStore { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<portscout_api::Error> for CoreError {
    fn from(err: portscout_api::Error) -> Self {
        match err {
            portscout_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            portscout_api::Error::SessionExpired => CoreError::AuthRequired,
            portscout_api::Error::Transport(ref e) => CoreError::Api {
                message: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
            },
            portscout_api::Error::InvalidUrl(e) => CoreError::Api {
                message: format!("invalid URL: {e}"),
                status: None,
            },
            portscout_api::Error::Tls(message) => CoreError::Api {
                message: format!("TLS error: {message}"),
                status: None,
            },
            portscout_api::Error::Api { message, status } => CoreError::Api {
                message,
                status: Some(status),
            },
            portscout_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("malformed backend response: {message}"),
                status: None,
            },
        }
    }
}
