//! Wire models for the backend's JSON payloads.
//!
//! Field names match the backend exactly (snake_case JSON), so these
//! structs double as the canonical domain model -- `portscout-core`
//! re-exports them. The snapshot is immutable once received: the backend
//! returns it whole and the client replaces or discards it whole.

use serde::{Deserialize, Serialize};

/// Connect request body: which switch to poll and the SSH credentials
/// the backend should use for it.
///
/// These are the *switch* credentials, not the operator's backend login.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectRequest {
    pub ip: String,
    pub username: String,
    pub password: String,
}

/// One not-connect switchport, as classified by the backend.
///
/// Counter fields stay strings: the backend passes through whatever the
/// switch CLI printed (`"never"`, `"2d4h"`, numbers with separators), and
/// nothing client-side does arithmetic on them. Only `usage_percentage`
/// is numeric -- it drives sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortRow {
    /// Interface name, e.g. `Gi1/0/12`. Unique within a snapshot.
    pub port: String,
    pub description: String,
    pub vlan: String,
    pub last_input: String,
    pub input_packets: String,
    pub output_packets: String,
    /// Relative utilization vs the busiest interface on the switch.
    pub usage_percentage: f64,
}

/// Per-stack-member PoE budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoeEntry {
    pub switch_no: String,
    pub available: String,
    pub used: String,
    pub free: String,
}

/// The least-utilized interface on the switch, if the backend could
/// compute one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowestUsage {
    pub interface: String,
    pub usage_percentage: f64,
}

/// Complete diagnostic payload returned by a successful connect.
///
/// Held in full until replaced by the next connect or cleared by a
/// disconnect; never partially mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSnapshot {
    pub hostname: String,
    pub uptime: String,
    pub disconnected_ports: Vec<PortRow>,
    /// `None` when the switch reports no PoE capability.
    pub poe_status: Option<Vec<PoeEntry>>,
    /// `None` when no interface stats were usable.
    pub lowest_usage_interface: Option<LowestUsage>,
}
