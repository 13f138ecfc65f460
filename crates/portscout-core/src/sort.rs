//! Port-table ordering.
//!
//! Pure and stable: equal keys keep their input order, so toggling the
//! direction twice is guaranteed to restore the original view.

use std::cmp::Ordering;

use portscout_api::models::PortRow;

/// Which column drives the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Case-insensitive alphabetical on the interface name.
    Port,
    /// Numeric on the usage percentage.
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A column + direction pair. Transient view state, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortDirective {
    /// Ports alphabetical, the order an operator expects on first view.
    fn default() -> Self {
        Self {
            key: SortKey::Port,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortDirective {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// The header-click rule: re-selecting the active key flips its
    /// direction; selecting a different key resets to ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: match self.direction {
                    SortDirection::Ascending => SortDirection::Descending,
                    SortDirection::Descending => SortDirection::Ascending,
                },
            }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Produce an ordered copy of `rows` per the directive.
///
/// Descending reverses the comparator rather than the output, so ties
/// keep their input order in both directions.
pub fn sort_ports(rows: &[PortRow], directive: SortDirective) -> Vec<PortRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| compare(a, b, directive));
    sorted
}

/// The comparator behind [`sort_ports`], exposed for callers that order
/// in place.
pub fn compare(a: &PortRow, b: &PortRow, directive: SortDirective) -> Ordering {
    let ordering = match directive.key {
        SortKey::Port => a.port.to_lowercase().cmp(&b.port.to_lowercase()),
        SortKey::Usage => a.usage_percentage.total_cmp(&b.usage_percentage),
    };
    match directive.direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
