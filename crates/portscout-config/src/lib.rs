//! Shared configuration for the portscout CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and the durable [`TokenStore`](portscout_core::TokenStore)
//! implementations (OS keyring with a file fallback for headless hosts).

use std::collections::HashMap;
use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod token_store;

pub use token_store::{FileTokenStore, KeyringTokenStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Where the session token lives: "keyring" or "file".
    #[serde(default = "default_token_store")]
    pub token_store: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
            token_store: default_token_store(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_token_store() -> String {
    "keyring".into()
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://switchdiag.internal:8000").
    pub backend: String,

    /// Operator username for the token endpoint.
    pub username: Option<String>,

    /// Operator password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "portscout", "portscout").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory, home of the file token store.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", "portscout", "portscout")
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("portscout");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("PORTSCOUT_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the operator password: env var, then system keyring, then
/// plaintext profile entry.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Ok(pw) = std::env::var("PORTSCOUT_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new("portscout", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve the operator username: profile entry, then env var.
pub fn resolve_username(profile: &Profile) -> Option<String> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("PORTSCOUT_USERNAME").ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back.default_profile.as_deref(), Some("default"));
        assert_eq!(back.defaults.timeout, 30);
        assert_eq!(back.defaults.token_store, "keyring");
    }

    #[test]
    fn profile_parses_with_minimal_fields() {
        let text = r#"
            default_profile = "lab"

            [profiles.lab]
            backend = "https://switchdiag.lab:8000"
        "#;
        let cfg: Config = toml::from_str(text).expect("parse");
        let profile = cfg.profiles.get("lab").expect("profile");
        assert_eq!(profile.backend, "https://switchdiag.lab:8000");
        assert!(profile.username.is_none());
        assert!(profile.insecure.is_none());
    }

    #[test]
    fn resolve_username_prefers_profile_entry() {
        let profile = Profile {
            backend: "https://x".into(),
            username: Some("ops".into()),
            password: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
        };
        assert_eq!(resolve_username(&profile).as_deref(), Some("ops"));
    }
}
