// ── Operator session lifecycle ──
//
// Owns authentication state: initializes from the persisted token at
// startup, revalidates expiry on a fixed cadence, and exposes
// login/logout. The expiry decision itself is a pure function of
// (now, token) so the scheduling machinery stays independently testable.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::store::TokenStore;
use crate::token;
use portscout_api::SessionToken;

/// Cadence of the background expiry check.
pub const REVALIDATION_INTERVAL: Duration = Duration::from_secs(60);

// ── Clock ────────────────────────────────────────────────────────────

/// Wall-clock seam so tests can move time without waiting.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// The real wall clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        // Pre-epoch system time is a misconfigured host; treat as epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

// ── AuthState ────────────────────────────────────────────────────────

/// Authentication state observable by consumers.
///
/// Authenticated iff a token was present and unexpired at the last
/// check. The token rides along so outbound calls can take it as an
/// explicit argument instead of reading ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Authenticated { token: SessionToken },
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&SessionToken> {
        match self {
            Self::Authenticated { token } => Some(token),
            Self::Unauthenticated => None,
        }
    }
}

/// Pure revalidation decision: given the current instant and whatever
/// token is persisted, what should the auth state be?
///
/// Malformed or expired tokens yield `Unauthenticated` -- the decode
/// path fails closed (see [`token::is_expired`]).
pub fn decide(now_millis: i64, stored: Option<SessionToken>) -> AuthState {
    match stored {
        Some(tok) if !token::is_expired(&tok, now_millis) => AuthState::Authenticated { token: tok },
        _ => AuthState::Unauthenticated,
    }
}

// ── SessionManager ───────────────────────────────────────────────────

/// Owns the operator's authentication state.
///
/// Cheaply cloneable via `Arc`. All state mutations (login, logout, the
/// periodic revalidation) are serialized under one lock, so a timer tick
/// can never interleave with a fresh login and erroneously demote it.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    state: watch::Sender<AuthState>,
    /// Serializes store access + state application. Never held across
    /// an await point -- every mutation here is synchronous.
    write_lock: Mutex<()>,
    cancel: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // Tear down the revalidation task with the last handle.
        self.cancel.cancel();
    }
}

impl SessionManager {
    /// Create a manager over a token store, using the real wall clock.
    /// Call [`initialize`](Self::initialize) before relying on the state.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    /// Create a manager with an injected clock (tests).
    pub fn with_clock(store: Arc<dyn TokenStore>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            inner: Arc::new(Inner {
                store,
                clock,
                state,
                write_lock: Mutex::new(()),
                cancel: CancellationToken::new(),
            }),
        }
    }

    // ── Lifecycle operations ─────────────────────────────────────────

    /// Read the persisted token and settle the initial auth state:
    /// present-and-unexpired means authenticated, anything else clears
    /// the store and lands unauthenticated. Safe to call repeatedly.
    pub fn initialize(&self) -> Result<bool, CoreError> {
        self.check_auth()
    }

    /// Persist a freshly issued token and become authenticated
    /// unconditionally -- the issuer just vouched for it, so no expiry
    /// check here.
    pub fn login(&self, token: SessionToken) -> Result<(), CoreError> {
        let _guard = self.lock();
        self.inner.store.store(&token)?;
        self.apply(AuthState::Authenticated { token });
        debug!("session token stored; operator authenticated");
        Ok(())
    }

    /// Clear the persisted token and become unauthenticated. A no-op
    /// when already logged out.
    pub fn logout(&self) -> Result<(), CoreError> {
        let _guard = self.lock();
        self.inner.store.clear()?;
        self.apply(AuthState::Unauthenticated);
        debug!("session token cleared; operator logged out");
        Ok(())
    }

    /// Re-read the persisted token and apply the pure [`decide`]
    /// outcome. An expired, malformed, or absent token demotes to
    /// unauthenticated and wipes the store; a valid one (re)confirms
    /// authenticated. Returns the resulting authenticated flag.
    pub fn check_auth(&self) -> Result<bool, CoreError> {
        let _guard = self.lock();

        let stored = match self.inner.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                // Unreadable storage fails closed.
                self.apply(AuthState::Unauthenticated);
                return Err(e);
            }
        };

        let had_token = stored.is_some();
        let next = decide(self.inner.clock.now_millis(), stored);

        if !next.is_authenticated() && had_token {
            debug!("persisted session token expired or malformed; clearing");
            self.inner.store.clear()?;
        }

        let authenticated = next.is_authenticated();
        self.apply(next);
        Ok(authenticated)
    }

    // ── Background revalidation ──────────────────────────────────────

    /// Spawn the periodic expiry check: once immediately, then every
    /// [`REVALIDATION_INTERVAL`] until [`shutdown`](Self::shutdown) or
    /// the last manager handle drops.
    pub fn start_revalidation(&self) -> JoinHandle<()> {
        let manager = self.clone();
        let cancel = self.inner.cancel.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(REVALIDATION_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        if let Err(e) = manager.check_auth() {
                            warn!(error = %e, "session revalidation failed");
                        }
                    }
                }
            }
            debug!("session revalidation task stopped");
        })
    }

    /// Cancel the revalidation task.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Observers ────────────────────────────────────────────────────

    /// Subscribe to auth state changes.
    pub fn state(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// The current auth state.
    pub fn current(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// The current bearer token, when authenticated.
    pub fn token(&self) -> Option<SessionToken> {
        self.current().token().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned guard only means another writer panicked; the
        // protected data is the store + watch channel, both still sound.
        self.inner
            .write_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Publish `next`, notifying watchers only on an actual change.
    fn apply(&self, next: AuthState) {
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    use super::*;
    use crate::store::MemoryTokenStore;

    const NOW: i64 = 1_700_000_000_000; // some fixed instant, in millis

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn new(millis: i64) -> Self {
            Self(AtomicI64::new(millis))
        }

        fn advance_secs(&self, secs: i64) {
            self.0.fetch_add(secs * 1000, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// A structurally valid token expiring at `exp_secs` (epoch seconds).
    fn token_expiring_at(exp_secs: i64) -> SessionToken {
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"ops","exp":{exp_secs}}}"#));
        SessionToken::new(format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2ln"))
    }

    fn manager_with(
        store: MemoryTokenStore,
        clock: Arc<ManualClock>,
    ) -> (SessionManager, Arc<MemoryTokenStore>) {
        let store = Arc::new(store);
        let manager = SessionManager::with_clock(store.clone(), clock);
        (manager, store)
    }

    #[test]
    fn decide_valid_token_is_authenticated() {
        let tok = token_expiring_at(NOW / 1000 + 3600);
        assert!(decide(NOW, Some(tok)).is_authenticated());
    }

    #[test]
    fn decide_expired_or_absent_is_unauthenticated() {
        let stale = token_expiring_at(NOW / 1000 - 1);
        assert!(!decide(NOW, Some(stale)).is_authenticated());
        assert!(!decide(NOW, None).is_authenticated());
        assert!(!decide(NOW, Some(SessionToken::new("garbage"))).is_authenticated());
    }

    #[tokio::test]
    async fn initialize_with_valid_token_authenticates() {
        let clock = Arc::new(ManualClock::new(NOW));
        let tok = token_expiring_at(NOW / 1000 + 3600);
        let (manager, _store) = manager_with(MemoryTokenStore::with_token(tok), clock);

        assert!(manager.initialize().expect("initialize"));
        assert!(manager.is_authenticated());
        assert!(manager.token().is_some());

        // Idempotent.
        assert!(manager.initialize().expect("initialize again"));
    }

    #[tokio::test]
    async fn initialize_with_expired_token_clears_store() {
        let clock = Arc::new(ManualClock::new(NOW));
        let tok = token_expiring_at(NOW / 1000 - 60);
        let (manager, store) = manager_with(MemoryTokenStore::with_token(tok), clock);

        assert!(!manager.initialize().expect("initialize"));
        assert!(!manager.is_authenticated());
        assert!(store.load().expect("load").is_none(), "stale token not cleared");
    }

    #[tokio::test]
    async fn login_is_not_undone_by_immediate_check() {
        let clock = Arc::new(ManualClock::new(NOW));
        let (manager, store) = manager_with(MemoryTokenStore::new(), clock);
        manager.initialize().expect("initialize");

        let tok = token_expiring_at(NOW / 1000 + 1800);
        manager.login(tok.clone()).expect("login");
        assert!(manager.is_authenticated());
        assert_eq!(store.load().expect("load"), Some(tok));

        assert!(manager.check_auth().expect("check_auth"));
        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn login_without_expiry_check_accepts_opaque_token() {
        // A just-issued token is trusted even if we cannot decode it.
        let clock = Arc::new(ManualClock::new(NOW));
        let (manager, _store) = manager_with(MemoryTokenStore::new(), clock);

        manager
            .login(SessionToken::new("totally-opaque"))
            .expect("login");
        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn logout_is_a_noop_when_already_out() {
        let clock = Arc::new(ManualClock::new(NOW));
        let (manager, _store) = manager_with(MemoryTokenStore::new(), clock);
        manager.initialize().expect("initialize");

        manager.logout().expect("logout while already out");
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn check_auth_demotes_once_token_expires() {
        let clock = Arc::new(ManualClock::new(NOW));
        let tok = token_expiring_at(NOW / 1000 + 90);
        let (manager, store) = manager_with(MemoryTokenStore::with_token(tok), clock.clone());
        manager.initialize().expect("initialize");
        assert!(manager.is_authenticated());

        clock.advance_secs(120);
        assert!(!manager.check_auth().expect("check_auth"));
        assert!(!manager.is_authenticated());
        assert!(store.load().expect("load").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn revalidation_task_demotes_after_expiry() {
        let clock = Arc::new(ManualClock::new(NOW));
        let tok = token_expiring_at(NOW / 1000 + 90);
        let (manager, _store) = manager_with(MemoryTokenStore::with_token(tok), clock.clone());
        manager.initialize().expect("initialize");

        let mut rx = manager.state();
        let task = manager.start_revalidation();

        // First (immediate) tick: token still valid.
        tokio::task::yield_now().await;
        assert!(manager.is_authenticated());

        // Cross the expiry, then let the next tick fire.
        clock.advance_secs(120);
        tokio::time::advance(REVALIDATION_INTERVAL).await;
        rx.changed().await.expect("state change");
        assert!(!rx.borrow().is_authenticated());

        manager.shutdown();
        task.await.expect("task join");
    }

    #[tokio::test(start_paused = true)]
    async fn revalidation_task_stops_on_shutdown() {
        let clock = Arc::new(ManualClock::new(NOW));
        let (manager, _store) = manager_with(MemoryTokenStore::new(), clock);
        manager.initialize().expect("initialize");

        let task = manager.start_revalidation();
        manager.shutdown();
        task.await.expect("task join");
    }
}
