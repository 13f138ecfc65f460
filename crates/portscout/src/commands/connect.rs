//! Connect to a switch, show its diagnostics, optionally export.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use portscout_core::{SortDirective, SwitchSession, sort_ports};

use crate::cli::{ConnectArgs, GlobalOpts};
use crate::commands::util;
use crate::context::AppContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: ConnectArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.session.initialize().map_err(CliError::from)?;
    if !ctx.session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    // Keep the token validated while the operator reads tables and
    // answers prompts -- long interactive runs can outlive the expiry.
    let revalidation = ctx.session.start_revalidation();

    let params = util::resolve_switch_params(&args.target)?;
    let ip = params.ip.clone();

    let switch = SwitchSession::new(ctx.client.clone(), ctx.session.clone());
    let mut notices = switch.subscribe_notices();

    let spinner = connect_spinner(&ip, global.quiet);
    let result = switch.connect(params).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            ctx.session.shutdown();
            return Err(e.into());
        }
    };
    util::drain_notices(&mut notices, global.quiet);

    output::print_switch_info(&snapshot, &ip, global.quiet);

    let directive = SortDirective::new(args.sort_key.into(), args.sort_dir.into());
    let sorted = sort_ports(&snapshot.disconnected_ports, directive);
    output::print_port_table(&sorted, global.quiet);
    output::print_poe_table(snapshot.poe_status.as_deref(), global.quiet);
    output::print_lowest_usage(&snapshot, global.quiet);

    // Export on request, or after an interactive confirm (the summary
    // always uses snapshot order, not the table sort above).
    let wants_export = args.export
        || (std::io::stdin().is_terminal()
            && output::confirm(
                &format!("Export a text summary for {}?", snapshot.hostname),
                global.yes,
            )?);

    if wants_export {
        let path = util::write_summary(&snapshot, &ip, args.out.as_deref())?;
        output::success(&format!("Summary exported to {}", path.display()), global.quiet);
    }

    switch.disconnect().await.map_err(CliError::from)?;
    util::drain_notices(&mut notices, global.quiet);

    ctx.session.shutdown();
    let _ = revalidation.await;
    Ok(())
}

fn connect_spinner(ip: &str, quiet: bool) -> Option<ProgressBar> {
    if quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Connecting to {ip}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
