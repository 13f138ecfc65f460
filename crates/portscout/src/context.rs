//! Shared runtime context for backend-facing commands.
//!
//! Resolves profile + flags into a [`BackendClient`] and a
//! [`SessionManager`] over the chosen token store. Built once per
//! invocation in `main` and threaded through command handlers.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use portscout_config::{FileTokenStore, KeyringTokenStore, Profile};
use portscout_core::store::TokenStore;
use portscout_core::{BackendClient, CoreError, SessionManager, TlsMode, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub struct AppContext {
    pub client: BackendClient,
    pub session: SessionManager,
    pub profile_name: String,
    pub profile: Option<Profile>,
}

impl AppContext {
    /// Resolve config + flags into a ready-to-use context.
    ///
    /// Precedence for each knob is flag/env, then profile, then the
    /// config-wide defaults.
    pub fn build(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = portscout_config::load_config_or_default();

        let profile_name = global
            .profile
            .clone()
            .or_else(|| cfg.default_profile.clone())
            .unwrap_or_else(|| "default".into());

        let profile = cfg.profiles.get(&profile_name).cloned();
        if global.profile.is_some() && profile.is_none() {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }

        let backend = global
            .backend
            .clone()
            .or_else(|| profile.as_ref().map(|p| p.backend.clone()))
            .ok_or_else(|| CliError::NoConfig {
                path: portscout_config::config_path().display().to_string(),
            })?;

        let url: Url = backend.parse().map_err(|_| CliError::Validation {
            field: "backend".into(),
            reason: format!("invalid URL: {backend}"),
        })?;

        let insecure = global.insecure
            || profile
                .as_ref()
                .and_then(|p| p.insecure)
                .unwrap_or(cfg.defaults.insecure);

        let tls = if insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca) = profile.as_ref().and_then(|p| p.ca_cert.clone()) {
            TlsMode::CustomCa(ca)
        } else {
            TlsMode::System
        };

        let timeout = global
            .timeout
            .or_else(|| profile.as_ref().and_then(|p| p.timeout))
            .unwrap_or(cfg.defaults.timeout);

        let transport = TransportConfig {
            tls,
            timeout: Duration::from_secs(timeout),
        };

        let client = BackendClient::new(url, &transport)
            .map_err(|e| CliError::from(CoreError::from(e)))?;

        let store: Arc<dyn TokenStore> = if let Some(path) = &global.token_file {
            Arc::new(FileTokenStore::at(path.clone()))
        } else if cfg.defaults.token_store == "file" {
            Arc::new(FileTokenStore::new())
        } else {
            Arc::new(KeyringTokenStore::new())
        };

        let session = SessionManager::new(store);

        Ok(Self {
            client,
            session,
            profile_name,
            profile,
        })
    }
}
