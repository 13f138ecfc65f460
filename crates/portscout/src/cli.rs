//! Clap derive structures for the `portscout` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use portscout_core::{SortDirection, SortKey};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// portscout -- find patchable switchports from the command line
#[derive(Debug, Parser)]
#[command(
    name = "portscout",
    version,
    about = "Diagnose switch port usage from the command line",
    long_about = "An operator client for a switch-diagnostics backend.\n\n\
        Log in once, then connect to a switch to see its not-connect ports,\n\
        PoE budget, and lowest-usage interface -- and export a text summary.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "PORTSCOUT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend base URL (overrides profile)
    #[arg(long, short = 'b', env = "PORTSCOUT_BACKEND", global = true)]
    pub backend: Option<String>,

    /// Keep the session token in this file instead of the OS keyring
    #[arg(long, env = "PORTSCOUT_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PORTSCOUT_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "PORTSCOUT_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Shared value enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKeyArg {
    /// Alphabetical on the interface name
    Port,
    /// Numeric on the usage percentage
    Usage,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Port => SortKey::Port,
            SortKeyArg::Usage => SortKey::Usage,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortDirArg {
    Asc,
    Desc,
}

impl From<SortDirArg> for SortDirection {
    fn from(arg: SortDirArg) -> Self {
        match arg {
            SortDirArg::Asc => SortDirection::Ascending,
            SortDirArg::Desc => SortDirection::Descending,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the backend and store a session token
    Login(LoginArgs),

    /// Discard the session token and log out
    Logout,

    /// Show session state and token expiry
    Status,

    /// Connect to a switch and show its diagnostics
    #[command(alias = "c")]
    Connect(ConnectArgs),

    /// Connect to a switch and export its text summary
    Export(ExportArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Operator username (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct SwitchTarget {
    /// Switch IP address (prompted when omitted)
    pub ip: Option<String>,

    /// SSH username for the switch
    #[arg(long, short = 'u', env = "PORTSCOUT_SWITCH_USERNAME")]
    pub username: Option<String>,

    /// SSH password for the switch (prefer the env var or the prompt)
    #[arg(long, env = "PORTSCOUT_SWITCH_PASSWORD", hide_env = true)]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConnectArgs {
    #[command(flatten)]
    pub target: SwitchTarget,

    /// Column ordering the port table
    #[arg(long, value_enum, default_value = "port")]
    pub sort_key: SortKeyArg,

    /// Sort direction
    #[arg(long, value_enum, default_value = "asc")]
    pub sort_dir: SortDirArg,

    /// Export the text summary without asking
    #[arg(long)]
    pub export: bool,

    /// Directory for the exported summary (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub out: Option<std::path::PathBuf>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub target: SwitchTarget,

    /// Directory for the exported summary (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub out: Option<std::path::PathBuf>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively create a profile
    Init,
    /// Print the resolved configuration
    Show,
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
