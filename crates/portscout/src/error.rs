//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use portscout_config::ConfigError;
use portscout_core::CoreError;

/// Exit codes, stable for scripting.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Not logged in")]
    #[diagnostic(
        code(portscout::not_logged_in),
        help("Log in first: portscout login")
    )]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(portscout::auth_failed),
        help("Verify your operator username and password, then retry: portscout login")
    )]
    AuthFailed { message: String },

    // ── Switch connection ────────────────────────────────────────────
    #[error("Could not connect to switch {ip}: {reason}")]
    #[diagnostic(
        code(portscout::switch_unreachable),
        help("Check the IP address and the switch's SSH credentials.")
    )]
    SwitchConnect { ip: String, reason: String },

    #[error("A connection attempt is already in progress")]
    #[diagnostic(code(portscout::busy))]
    Busy,

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(portscout::backend))]
    Backend { message: String },

    // ── Export ───────────────────────────────────────────────────────
    #[error("Could not write summary to {path}")]
    #[diagnostic(
        code(portscout::export_failed),
        help("Pick a writable directory with --out.")
    )]
    ExportFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No backend configured")]
    #[diagnostic(
        code(portscout::no_config),
        help(
            "Create a profile with: portscout config init\n\
             Or pass --backend / set PORTSCOUT_BACKEND.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(portscout::profile_not_found),
        help("Available profiles: {available}\nCreate one with: portscout config init")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(portscout::no_credentials),
        help("Set PORTSCOUT_PASSWORD, or store one in the keyring, or add it to the profile.")
    )]
    NoCredentials { profile: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(portscout::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(portscout::config))]
    Config(Box<figment::Error>),

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Token storage error: {message}")]
    #[diagnostic(
        code(portscout::token_storage),
        help("On headless hosts, try --token-file to bypass the OS keyring.")
    )]
    TokenStorage { message: String },

    // ── IO / prompts ─────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotLoggedIn | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::SwitchConnect { .. } => exit_code::CONNECTION,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthRequired => CliError::NotLoggedIn,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::ConnectionFailed { ip, reason } => CliError::SwitchConnect { ip, reason },
            CoreError::ConnectInProgress => CliError::Busy,
            CoreError::Api { message, status: _ } => CliError::Backend { message },
            CoreError::TokenStore { message } => CliError::TokenStorage { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
