//! Command handlers, one module per command family.

pub mod config_cmd;
pub mod connect;
pub mod export;
pub mod login;
pub mod status;
mod util;

use crate::cli::{Command, GlobalOpts};
use crate::context::AppContext;
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(cmd: Command, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => login::handle(&args, ctx, global).await,
        Command::Logout => login::handle_logout(ctx, global).await,
        Command::Status => status::handle(ctx, global),
        Command::Connect(args) => connect::handle(args, ctx, global).await,
        Command::Export(args) => export::handle(args, ctx, global).await,
        // Handled in main before a context exists.
        Command::Config(_) | Command::Completions(_) => unreachable!("dispatched without backend"),
    }
}
