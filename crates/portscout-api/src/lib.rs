//! Async Rust client for the portscout switch-diagnostics backend.
//!
//! The backend is an opaque remote service: it verifies operator
//! credentials, polls Cisco-style switches over SSH on our behalf, and
//! returns a complete diagnostic snapshot per connect. This crate owns
//! the transport mechanics and nothing else:
//!
//! - **[`BackendClient`]** — thin wrapper over `reqwest::Client` with
//!   backend-specific URL construction and response decoding. Every
//!   authenticated call takes the bearer [`SessionToken`] as an explicit
//!   argument; there is no ambient auth state here.
//! - **[`TransportConfig`]** — shared TLS / timeout settings for building
//!   the underlying HTTP client.
//! - **Wire models** ([`models`]) — serde shapes of the backend's JSON.
//! - **[`Error`]** — typed failure taxonomy; `portscout-core` maps these
//!   into user-facing diagnostics.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use auth::{SessionToken, TokenGrant};
pub use client::BackendClient;
pub use error::Error;
pub use models::{ConnectRequest, LowestUsage, PoeEntry, PortRow, SwitchSnapshot};
pub use transport::{TlsMode, TransportConfig};
