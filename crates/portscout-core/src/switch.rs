// ── Switch session state machine ──
//
// Owns the connect/disconnect lifecycle and the last-fetched snapshot.
// The snapshot exists exactly while the state is Connected: written
// whole on a successful connect, discarded whole on disconnect. A
// disconnect always wins locally -- a backend failure on that path is
// reported but never leaves the session stuck.

use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::session::SessionManager;
use portscout_api::BackendClient;
use portscout_api::models::{ConnectRequest, SwitchSnapshot};

const NOTICE_CHANNEL_SIZE: usize = 16;

// ── ConnectionState ──────────────────────────────────────────────────

/// Switch connection state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Disconnecting,
}

// ── Notices ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// A user-facing notification emitted by lifecycle transitions.
/// Consumers render these however they like (the CLI prints them);
/// dropping them is harmless.
#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Notice {
    fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            detail: detail.into(),
        }
    }

    fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

// ── Connect parameters ───────────────────────────────────────────────

/// Switch address and SSH credentials for a connect attempt.
#[derive(Debug)]
pub struct ConnectParams {
    pub ip: String,
    pub username: String,
    pub password: SecretString,
}

/// Snapshot plus the address it came from, applied as one unit.
struct ConnectedSwitch {
    ip: String,
    snapshot: SwitchSnapshot,
}

// ── SwitchSession ────────────────────────────────────────────────────

/// The connect/disconnect lifecycle for one switch at a time.
///
/// Cheaply cloneable via `Arc`. Exactly one lifecycle operation may be
/// in flight: entry into `Connecting` is a compare-and-set on the state
/// channel, so concurrent connect attempts are rejected rather than
/// queued. Disconnect during an in-flight connect is likewise rejected
/// (there is no cancellation of a connect; see DESIGN.md).
#[derive(Clone)]
pub struct SwitchSession {
    inner: Arc<SwitchInner>,
}

struct SwitchInner {
    client: BackendClient,
    session: SessionManager,
    state: watch::Sender<ConnectionState>,
    /// Written while holding the lock, then the state flips -- readers
    /// never observe a snapshot torn between two responses.
    current: Mutex<Option<ConnectedSwitch>>,
    notices: broadcast::Sender<Notice>,
}

impl SwitchSession {
    pub fn new(client: BackendClient, session: SessionManager) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_SIZE);
        Self {
            inner: Arc::new(SwitchInner {
                client,
                session,
                state,
                current: Mutex::new(None),
                notices,
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Connect to a switch and fetch its diagnostic snapshot.
    ///
    /// Requires an authenticated operator session; the bearer token is
    /// taken from the [`SessionManager`] at call time and passed to the
    /// backend explicitly. On failure the state returns to
    /// `Disconnected` and nothing is retained.
    pub async fn connect(&self, params: ConnectParams) -> Result<SwitchSnapshot, CoreError> {
        if !self.transition(ConnectionState::Disconnected, ConnectionState::Connecting) {
            return Err(CoreError::ConnectInProgress);
        }

        let Some(token) = self.inner.session.token() else {
            self.settle(ConnectionState::Disconnected);
            return Err(CoreError::AuthRequired);
        };

        let request = ConnectRequest {
            ip: params.ip.clone(),
            username: params.username,
            password: params.password.expose_secret().to_owned(),
        };

        debug!(ip = %params.ip, "connect attempt started");
        match self.inner.client.connect(&token, &request).await {
            Ok(snapshot) => {
                {
                    // Slot and state move together: no reader sees a
                    // Connected state before the snapshot is in place.
                    let mut current = self.lock_current();
                    *current = Some(ConnectedSwitch {
                        ip: params.ip,
                        snapshot: snapshot.clone(),
                    });
                    self.settle(ConnectionState::Connected);
                }
                info!(hostname = %snapshot.hostname, "switch connected");
                self.notify(Notice::info(
                    "Connected successfully",
                    format!("Connected to {}", snapshot.hostname),
                ));
                Ok(snapshot)
            }
            Err(e) => {
                self.settle(ConnectionState::Disconnected);
                // Backend-level failures become a connect failure naming
                // the switch; auth problems keep their own shape.
                let err = match CoreError::from(e) {
                    CoreError::Api { message, status: _ } => CoreError::ConnectionFailed {
                        ip: params.ip.clone(),
                        reason: message,
                    },
                    other => other,
                };
                warn!(ip = %params.ip, error = %err, "connect attempt failed");
                self.notify(Notice::error("Connection failed", err.to_string()));
                Err(err)
            }
        }
    }

    /// Disconnect from the current switch.
    ///
    /// The backend teardown is fire-and-forget: whatever it returns, the
    /// local snapshot and connected address are cleared and the state
    /// lands in `Disconnected`, so the session can always reconnect. A
    /// backend failure is surfaced as an error [`Notice`] only.
    pub async fn disconnect(&self) -> Result<(), CoreError> {
        if self.transition(ConnectionState::Disconnected, ConnectionState::Disconnected) {
            // Nothing to do; stay put.
            return Ok(());
        }
        if !self.transition(ConnectionState::Connected, ConnectionState::Disconnecting) {
            return Err(CoreError::ConnectInProgress);
        }

        let result = match self.inner.session.token() {
            Some(token) => self.inner.client.disconnect(&token).await,
            // Operator session lapsed mid-connection: the backend call
            // cannot be authenticated, but the local reset still happens.
            None => Ok(()),
        };

        {
            let mut current = self.lock_current();
            *current = None;
            self.settle(ConnectionState::Disconnected);
        }
        debug!("switch session cleared");

        if let Err(e) = result {
            let err = CoreError::from(e);
            warn!(error = %err, "backend disconnect failed; local state reset anyway");
            self.notify(Notice::error("Disconnect reported an error", err.to_string()));
        }

        Ok(())
    }

    // ── Observers ────────────────────────────────────────────────────

    /// The current state.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// The current snapshot. `Some` exactly while `Connected`.
    pub fn snapshot(&self) -> Option<SwitchSnapshot> {
        self.lock_current().as_ref().map(|c| c.snapshot.clone())
    }

    /// The address submitted to the successful connect, verbatim.
    pub fn connected_ip(&self) -> Option<String> {
        self.lock_current().as_ref().map(|c| c.ip.clone())
    }

    /// Subscribe to lifecycle notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.notices.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Compare-and-set on the state channel. Returns whether the state
    /// was `from` (and is now `to`).
    fn transition(&self, from: ConnectionState, to: ConnectionState) -> bool {
        let mut matched = false;
        self.inner.state.send_if_modified(|state| {
            if *state != from {
                return false;
            }
            matched = true;
            if *state == to {
                return false;
            }
            *state = to;
            true
        });
        matched
    }

    /// Unconditional state set for completing a transition we own.
    fn settle(&self, to: ConnectionState) {
        self.inner.state.send_if_modified(|state| {
            if *state == to {
                return false;
            }
            *state = to;
            true
        });
    }

    fn lock_current(&self) -> std::sync::MutexGuard<'_, Option<ConnectedSwitch>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn notify(&self, notice: Notice) {
        // No subscribers is fine -- notices are advisory.
        let _ = self.inner.notices.send(notice);
    }
}
