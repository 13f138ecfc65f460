//! Headless export: connect, write the summary, disconnect.

use portscout_core::SwitchSession;

use crate::cli::{ExportArgs, GlobalOpts};
use crate::commands::util;
use crate::context::AppContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: ExportArgs, ctx: &AppContext, global: &GlobalOpts) -> Result<(), CliError> {
    ctx.session.initialize().map_err(CliError::from)?;
    if !ctx.session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }

    let params = util::resolve_switch_params(&args.target)?;
    let ip = params.ip.clone();

    let switch = SwitchSession::new(ctx.client.clone(), ctx.session.clone());
    let mut notices = switch.subscribe_notices();

    let snapshot = switch.connect(params).await.map_err(CliError::from)?;
    util::drain_notices(&mut notices, global.quiet);

    // Write before disconnecting so a failed write leaves the session
    // inspectable with a plain `connect`.
    let written = util::write_summary(&snapshot, &ip, args.out.as_deref());

    switch.disconnect().await.map_err(CliError::from)?;
    util::drain_notices(&mut notices, global.quiet);

    let path = written?;
    output::success(&format!("Summary exported to {}", path.display()), global.quiet);
    Ok(())
}
