//! Terminal rendering: status lines, diagnostic tables, prompts.
//!
//! Tables use `tabled`, accents use `owo-colors` (respecting NO_COLOR
//! and non-terminal stdout), and the `[+]` / `[-]` status prefixes keep
//! the classic console feel.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use portscout_core::{Notice, PoeEntry, PortRow, Severity, SwitchSnapshot};

/// Whether color output should be enabled.
fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
}

// ── Status lines ─────────────────────────────────────────────────────

/// `[+] message` success line, green-accented on terminals.
pub fn success(message: &str, quiet: bool) {
    if quiet {
        return;
    }
    if should_color() {
        println!("{} {message}", "[+]".green().bold());
    } else {
        println!("[+] {message}");
    }
}

/// `[-] message` failure line on stderr.
pub fn failure(message: &str) {
    if should_color() {
        eprintln!("{} {message}", "[-]".red().bold());
    } else {
        eprintln!("[-] {message}");
    }
}

/// Render a lifecycle notice from the switch session.
pub fn print_notice(notice: &Notice, quiet: bool) {
    match notice.severity {
        Severity::Info => success(&format!("{}: {}", notice.title, notice.detail), quiet),
        Severity::Error => failure(&format!("{}: {}", notice.title, notice.detail)),
    }
}

// ── Diagnostic views ─────────────────────────────────────────────────

/// The switch header block: hostname, address, uptime.
pub fn print_switch_info(snapshot: &SwitchSnapshot, ip: &str, quiet: bool) {
    if quiet {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "Hostname: {}", snapshot.hostname);
    let _ = writeln!(stdout, "IP Address: {ip}");
    let _ = writeln!(stdout, "Uptime: {}", snapshot.uptime);
}

#[derive(Tabled)]
struct PortRowDisplay {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Last Input")]
    last_input: String,
    #[tabled(rename = "Input Packets")]
    input_packets: String,
    #[tabled(rename = "Output Packets")]
    output_packets: String,
    #[tabled(rename = "Percent Use")]
    usage: String,
}

impl From<&PortRow> for PortRowDisplay {
    fn from(row: &PortRow) -> Self {
        Self {
            port: row.port.clone(),
            description: row.description.clone(),
            vlan: row.vlan.clone(),
            last_input: row.last_input.clone(),
            input_packets: row.input_packets.clone(),
            output_packets: row.output_packets.clone(),
            usage: format!("{}%", row.usage_percentage),
        }
    }
}

/// The not-connect port table, in whatever order the caller chose.
pub fn print_port_table(rows: &[PortRow], quiet: bool) {
    if quiet {
        return;
    }
    println!("\nNot-connect Switchports");
    if rows.is_empty() {
        println!("(none -- every port is connected)");
        return;
    }
    let display: Vec<PortRowDisplay> = rows.iter().map(Into::into).collect();
    println!("{}", Table::new(display).with(Style::rounded()));
}

#[derive(Tabled)]
struct PoeRowDisplay {
    #[tabled(rename = "Switch No.")]
    switch_no: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Free")]
    free: String,
}

/// The PoE budget table. A depleted or unavailable "free" cell is
/// highlighted on terminals.
pub fn print_poe_table(entries: Option<&[PoeEntry]>, quiet: bool) {
    if quiet {
        return;
    }
    println!("\nPoE Status");
    let Some(entries) = entries else {
        println!("No PoE data available");
        return;
    };

    let color = should_color();
    let display: Vec<PoeRowDisplay> = entries
        .iter()
        .map(|entry| {
            let depleted = entry.free == "n/a" || entry.free == "0.0";
            let free = if depleted && color {
                entry.free.red().to_string()
            } else {
                entry.free.clone()
            };
            PoeRowDisplay {
                switch_no: entry.switch_no.clone(),
                available: entry.available.clone(),
                used: entry.used.clone(),
                free,
            }
        })
        .collect();
    println!("{}", Table::new(display).with(Style::rounded()));
}

/// The lowest-usage sentence, when the backend computed one.
pub fn print_lowest_usage(snapshot: &SwitchSnapshot, quiet: bool) {
    if quiet {
        return;
    }
    if let Some(ref lowest) = snapshot.lowest_usage_interface {
        println!(
            "\nInterface {} has {}% the usage of the highest on the switch.",
            lowest.interface, lowest.usage_percentage
        );
    }
}

// ── Prompt helpers ───────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, crate::error::CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| crate::error::CliError::Io(io::Error::other(e)))?;
    Ok(confirmed)
}
