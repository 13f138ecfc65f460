//! Text-summary rendering.
//!
//! Produces the fixed-format report an operator downloads after a
//! diagnostic run: header block, not-connect port table, PoE budget,
//! lowest-usage interface. The layout is a stable external contract --
//! downstream tooling greps these files -- so rendering is deterministic
//! and the port table always follows snapshot order, never the UI sort.

use std::fmt::Write as _;

use portscout_api::models::SwitchSnapshot;

/// Section separator width, matching the classic report layout.
const RULE_WIDTH: usize = 103;

/// Minimum column width in the tab-delimited tables.
const COL_WIDTH: usize = 12;

/// The exported file is named after the switch.
pub fn report_filename(hostname: &str) -> String {
    format!("{hostname}.txt")
}

/// Render the plain-text summary for a snapshot.
///
/// `connected_ip` is the address the operator submitted, echoed into the
/// header. Inputs are untouched; the same snapshot always yields the
/// same bytes.
pub fn render_report(snapshot: &SwitchSnapshot, connected_ip: &str) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    // Header block
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "PORTSCOUT RESULTS on hostname {}", snapshot.hostname);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Switch IP: {connected_ip}");
    let _ = writeln!(out, "Switch hostname: {}", snapshot.hostname);
    let _ = writeln!(out, "Switch uptime: {}", snapshot.uptime);
    out.push('\n');

    // Not-connect ports, in snapshot order
    let _ = writeln!(out, "Not-connect Interfaces");
    let _ = writeln!(
        out,
        "{}",
        padded_row(&[
            "Interface",
            "Description",
            "VLAN",
            "Last Input",
            "Packets-in",
            "Packets-out",
            "Percent Use",
        ])
    );
    for port in &snapshot.disconnected_ports {
        let _ = writeln!(
            out,
            "{}",
            padded_row(&[
                &port.port,
                &port.description,
                &port.vlan,
                &port.last_input,
                &port.input_packets,
                &port.output_packets,
                &port.usage_percentage.to_string(),
            ])
        );
    }
    let _ = writeln!(out, "{rule}");

    // PoE budget
    let _ = writeln!(out, "PoE Details");
    match &snapshot.poe_status {
        Some(entries) => {
            for entry in entries {
                let _ = writeln!(
                    out,
                    "{}",
                    padded_row(&[&entry.switch_no, &entry.available, &entry.used, &entry.free])
                );
            }
        }
        None => {
            let _ = writeln!(out, "No PoE data available");
        }
    }
    let _ = writeln!(out, "{rule}");

    // Lowest-usage interface
    match &snapshot.lowest_usage_interface {
        Some(lowest) => {
            let _ = writeln!(
                out,
                "Lowest used interface: Interface {} has {}% the usage of the highest on the switch.",
                lowest.interface, lowest.usage_percentage
            );
        }
        None => {
            let _ = writeln!(out, "No usage data available");
        }
    }

    out
}

/// Tab-join cells, each left-aligned and padded to the minimum width.
fn padded_row(cells: &[&str]) -> String {
    cells
        .iter()
        .map(|cell| format!("{cell:<COL_WIDTH$}"))
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use portscout_api::models::{LowestUsage, PoeEntry, PortRow};

    fn sample_snapshot() -> SwitchSnapshot {
        SwitchSnapshot {
            hostname: "sw-lab-01".into(),
            uptime: "5 weeks, 2 days".into(),
            disconnected_ports: vec![
                PortRow {
                    port: "Gi1/0/7".into(),
                    description: "printer bay".into(),
                    vlan: "20".into(),
                    last_input: "4w1d".into(),
                    input_packets: "9931".into(),
                    output_packets: "14002".into(),
                    usage_percentage: 12.42,
                },
                PortRow {
                    port: "Gi1/0/3".into(),
                    description: String::new(),
                    vlan: "1".into(),
                    last_input: "never".into(),
                    input_packets: "0".into(),
                    output_packets: "1204".into(),
                    usage_percentage: 0.0,
                },
            ],
            poe_status: Some(vec![PoeEntry {
                switch_no: "1".into(),
                available: "370.0".into(),
                used: "89.5".into(),
                free: "280.5".into(),
            }]),
            lowest_usage_interface: Some(LowestUsage {
                interface: "Gi1/0/3".into(),
                usage_percentage: 0.0,
            }),
        }
    }

    #[test]
    fn filename_follows_hostname() {
        assert_eq!(report_filename("sw-lab-01"), "sw-lab-01.txt");
    }

    #[test]
    fn header_carries_ip_hostname_uptime() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        assert!(text.contains("PORTSCOUT RESULTS on hostname sw-lab-01"));
        assert!(text.contains("Switch IP: 10.0.0.2"));
        assert!(text.contains("Switch hostname: sw-lab-01"));
        assert!(text.contains("Switch uptime: 5 weeks, 2 days"));
    }

    #[test]
    fn rule_lines_are_fixed_width() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        let rules: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with('-') && l.chars().all(|c| c == '-'))
            .collect();
        assert_eq!(rules.len(), 4);
        assert!(rules.iter().all(|r| r.len() == RULE_WIDTH));
    }

    #[test]
    fn ports_render_one_row_each_in_snapshot_order() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        let first = text.find("Gi1/0/7").expect("first port");
        let second = text.find("Gi1/0/3").expect("second port");
        // Snapshot order survives even though a sorted view would flip it.
        assert!(first < second);
        assert_eq!(text.matches("Gi1/0/7").count(), 1);
    }

    #[test]
    fn port_rows_are_tab_delimited_and_padded() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        let row = text
            .lines()
            .find(|l| l.starts_with("Gi1/0/7"))
            .expect("port row");
        let cells: Vec<&str> = row.split('\t').collect();
        assert_eq!(cells.len(), 7);
        assert!(cells.iter().all(|c| c.len() >= COL_WIDTH));
        assert_eq!(cells[1].trim_end(), "printer bay");
        assert_eq!(cells[6].trim_end(), "12.42");
    }

    #[test]
    fn poe_section_lists_entries() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        assert!(text.contains("PoE Details"));
        let row = text
            .lines()
            .find(|l| l.starts_with('1') && l.contains("370.0"))
            .expect("poe row");
        assert!(row.contains("280.5"));
        assert!(!text.contains("No PoE data available"));
    }

    #[test]
    fn absent_poe_renders_literal_line() {
        let mut snapshot = sample_snapshot();
        snapshot.poe_status = None;
        let text = render_report(&snapshot, "10.0.0.2");
        assert!(text.contains("No PoE data available"));
    }

    #[test]
    fn lowest_usage_sentence() {
        let text = render_report(&sample_snapshot(), "10.0.0.2");
        assert!(text.contains(
            "Lowest used interface: Interface Gi1/0/3 has 0% the usage of the highest on the switch."
        ));
    }

    #[test]
    fn absent_lowest_usage_renders_literal_line() {
        let mut snapshot = sample_snapshot();
        snapshot.lowest_usage_interface = None;
        let text = render_report(&snapshot, "10.0.0.2");
        assert!(text.contains("No usage data available"));
    }

    #[test]
    fn rendering_is_deterministic_and_nonmutating() {
        let snapshot = sample_snapshot();
        let a = render_report(&snapshot, "10.0.0.2");
        let b = render_report(&snapshot, "10.0.0.2");
        assert_eq!(a, b);
        assert_eq!(snapshot, sample_snapshot());
    }
}
