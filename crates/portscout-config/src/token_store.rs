//! Durable session-token storage.
//!
//! The persisted layout is deliberately minimal: one opaque string under
//! a fixed identifier. [`KeyringTokenStore`] keeps it in the OS secret
//! service; [`FileTokenStore`] is the fallback for headless hosts where
//! no keyring is running. A missing token is `Ok(None)` in both -- only
//! real storage faults surface as errors.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use portscout_core::{CoreError, SessionToken, TokenStore};

// One fixed service/entry pair; there is never more than one session.
const KEYRING_SERVICE: &str = "portscout";
const KEYRING_ENTRY: &str = "session-token";

// ── Keyring ─────────────────────────────────────────────────────────

/// Session token in the OS keyring.
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn entry() -> Result<keyring::Entry, CoreError> {
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_ENTRY).map_err(|e| CoreError::TokenStore {
            message: format!("keyring unavailable: {e}"),
        })
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, CoreError> {
        match Self::entry()?.get_password() {
            Ok(raw) => Ok(Some(SessionToken::new(raw))),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(CoreError::TokenStore {
                message: format!("keyring read failed: {e}"),
            }),
        }
    }

    fn store(&self, token: &SessionToken) -> Result<(), CoreError> {
        Self::entry()?
            .set_password(token.as_str())
            .map_err(|e| CoreError::TokenStore {
                message: format!("keyring write failed: {e}"),
            })?;
        debug!("session token stored in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CoreError::TokenStore {
                message: format!("keyring delete failed: {e}"),
            }),
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

/// Session token as a single-line file under the platform data dir.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store under the default data directory (`.../portscout/token`).
    pub fn new() -> Self {
        Self::at(crate::data_dir().join("token"))
    }

    /// Store at an explicit path (tests, `--token-file`).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionToken>, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SessionToken::new(trimmed)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::TokenStore {
                message: format!("cannot read {}: {e}", self.path.display()),
            }),
        }
    }

    fn store(&self, token: &SessionToken) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::TokenStore {
                message: format!("cannot create {}: {e}", parent.display()),
            })?;
        }
        fs::write(&self.path, token.as_str()).map_err(|e| CoreError::TokenStore {
            message: format!("cannot write {}: {e}", self.path.display()),
        })?;

        // The token is a bearer credential: owner-only on unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| CoreError::TokenStore {
                message: format!("cannot chmod {}: {e}", self.path.display()),
            })?;
        }

        debug!(path = %self.path.display(), "session token stored in file");
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::TokenStore {
                message: format!("cannot remove {}: {e}", self.path.display()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileTokenStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileTokenStore::at(dir.path().join("token"));
        (dir, store)
    }

    #[test]
    fn missing_file_loads_as_none() {
        let (_dir, store) = temp_store();
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let (_dir, store) = temp_store();
        let token = SessionToken::new("aaa.bbb.ccc");
        store.store(&token).expect("store");
        assert_eq!(store.load().expect("load"), Some(token));
    }

    #[test]
    fn clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.clear().expect("clear nothing");
        store.store(&SessionToken::new("t.t.t")).expect("store");
        store.clear().expect("clear");
        store.clear().expect("clear again");
        assert!(store.load().expect("load").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store.store(&SessionToken::new("t.t.t")).expect("store");
        let mode = std::fs::metadata(store.path()).expect("meta").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
