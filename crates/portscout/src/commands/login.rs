//! Operator login / logout against the backend's token endpoint.

use std::io::Read;

use secrecy::SecretString;
use tracing::debug;

use portscout_core::CoreError;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::context::AppContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &LoginArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.session.initialize().map_err(CliError::from)?;

    let username = resolve_username(args, ctx)?;
    let password = resolve_password(args, ctx)?;

    let token = ctx
        .client
        .login(&username, &password)
        .await
        .map_err(|e| match CoreError::from(e) {
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            other => CliError::from(other),
        })?;

    ctx.session.login(token).map_err(CliError::from)?;
    output::success(&format!("Logged in as {username}"), global.quiet);
    Ok(())
}

pub async fn handle_logout(ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.session.initialize().map_err(CliError::from)?;

    // Server-side invalidation is best effort; the local token goes
    // away regardless.
    if let Some(token) = ctx.session.token() {
        if let Err(e) = ctx.client.logout(&token).await {
            debug!(error = %e, "backend logout failed; discarding token anyway");
            output::failure(&format!("Backend logout failed: {e}"));
        }
    }

    ctx.session.logout().map_err(CliError::from)?;
    output::success("Logged out", global.quiet);
    Ok(())
}

fn resolve_username(args: &LoginArgs, ctx: &AppContext) -> Result<String, CliError> {
    if let Some(ref username) = args.username {
        return Ok(username.clone());
    }
    if let Some(username) = ctx
        .profile
        .as_ref()
        .and_then(portscout_config::resolve_username)
    {
        return Ok(username);
    }
    dialoguer::Input::new()
        .with_prompt("Operator username")
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

fn resolve_password(args: &LoginArgs, ctx: &AppContext) -> Result<SecretString, CliError> {
    if args.password_stdin {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(SecretString::from(buf.trim_end().to_owned()));
    }

    // Profile chain: env var, keyring, plaintext profile entry.
    if let Some(ref profile) = ctx.profile {
        match portscout_config::resolve_password(profile, &ctx.profile_name) {
            Ok(password) => return Ok(password),
            Err(portscout_config::ConfigError::NoCredentials { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    } else if let Ok(pw) = std::env::var("PORTSCOUT_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    Ok(rpassword::prompt_password("Operator password: ")?.into())
}
