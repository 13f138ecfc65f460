//! Session status: auth state and token expiry.

use chrono::DateTime;

use portscout_core::{AuthState, token};

use crate::cli::GlobalOpts;
use crate::context::AppContext;
use crate::error::CliError;
use crate::output;

pub fn handle(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    // initialize() applies the expiry check, so a stale token already
    // reads as logged out here.
    ctx.session.initialize().map_err(CliError::from)?;

    match ctx.session.current() {
        AuthState::Authenticated { token } => {
            output::success(&format!("Logged in (profile '{}')", ctx.profile_name), global.quiet);
            if global.quiet {
                return Ok(());
            }
            match token::expiry_millis(&token).and_then(DateTime::from_timestamp_millis) {
                Some(expires) => {
                    println!("Token expires: {}", expires.format("%Y-%m-%d %H:%M:%S UTC"));
                }
                None => println!("Token expiry: unknown (opaque token)"),
            }
            println!("Backend: {}", ctx.client.base_url());
        }
        AuthState::Unauthenticated => {
            println!("Not logged in (run `portscout login`)");
        }
    }

    Ok(())
}
