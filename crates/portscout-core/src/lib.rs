//! Business logic between `portscout-api` and the operator-facing shell.
//!
//! This crate owns everything that must be *right* rather than pretty:
//!
//! - **[`SessionManager`]** — the operator's authentication state.
//!   Initializes from a persisted token at startup, validates expiry on a
//!   fixed 60-second cadence, and demotes to unauthenticated the moment
//!   the token goes stale or unreadable. Mutations are serialized so a
//!   timer-driven revalidation can never race a fresh login.
//!
//! - **[`SwitchSession`]** — the connect/disconnect state machine. A
//!   diagnostic snapshot exists exactly while the state is `Connected`:
//!   stored whole on a successful connect, discarded whole on disconnect,
//!   never patched in place.
//!
//! - **[`TokenStore`]** — storage seam for the persisted session token.
//!   Durable implementations (keyring, file) live in `portscout-config`;
//!   [`MemoryTokenStore`] backs tests.
//!
//! - **[`sort`]** / **[`report`]** — pure transforms over the snapshot:
//!   stable port-table ordering and the fixed-format text summary.

pub mod error;
pub mod report;
pub mod session;
pub mod sort;
pub mod store;
pub mod switch;
pub mod token;

pub use error::CoreError;
pub use report::{render_report, report_filename};
pub use session::{AuthState, Clock, SessionManager, SystemClock, decide};
pub use sort::{SortDirection, SortDirective, SortKey, sort_ports};
pub use store::{MemoryTokenStore, TokenStore};
pub use switch::{ConnectParams, ConnectionState, Notice, Severity, SwitchSession};

// Wire models double as the domain model; re-export them at the root,
// along with the client surface consumers need to stand a session up.
pub use portscout_api::models::{LowestUsage, PoeEntry, PortRow, SwitchSnapshot};
pub use portscout_api::{BackendClient, SessionToken, TlsMode, TransportConfig};
