//! Shared helpers for command handlers.

use std::io;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use tokio::sync::broadcast;

use portscout_core::{ConnectParams, Notice, SwitchSnapshot, render_report, report_filename};

use crate::cli::SwitchTarget;
use crate::error::CliError;
use crate::output;

/// Fill in switch address + SSH credentials, prompting for whatever the
/// flags and env left out.
pub fn resolve_switch_params(target: &SwitchTarget) -> Result<ConnectParams, CliError> {
    let ip = match &target.ip {
        Some(ip) => ip.clone(),
        None => prompt_text("Switch IP")?,
    };

    let username = match &target.username {
        Some(user) => user.clone(),
        None => prompt_text("SSH username")?,
    };

    let password: SecretString = match &target.password {
        Some(pw) => pw.clone().into(),
        None => rpassword::prompt_password("SSH password: ")?.into(),
    };

    Ok(ConnectParams {
        ip,
        username,
        password,
    })
}

fn prompt_text(prompt: &str) -> Result<String, CliError> {
    dialoguer::Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Print any queued lifecycle notices.
pub fn drain_notices(rx: &mut broadcast::Receiver<Notice>, quiet: bool) {
    while let Ok(notice) = rx.try_recv() {
        output::print_notice(&notice, quiet);
    }
}

/// Render the text summary and write `{hostname}.txt` into `out`
/// (default: current directory). The snapshot itself is untouched by a
/// failed write.
pub fn write_summary(
    snapshot: &SwitchSnapshot,
    connected_ip: &str,
    out: Option<&Path>,
) -> Result<PathBuf, CliError> {
    let dir = out.unwrap_or_else(|| Path::new("."));
    let path = dir.join(report_filename(&snapshot.hostname));
    let text = render_report(snapshot, connected_ip);

    std::fs::write(&path, text).map_err(|e| CliError::ExportFailed {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(path)
}
