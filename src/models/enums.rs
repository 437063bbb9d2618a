//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ReservationState
// ---------------------------------------------------------------------------

/// Reservation lifecycle state as exchanged with the reservation backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationState {
    #[default]
    Created,
    Requested,
    Confirmed,
    Denied,
    Cancelled,
}

impl ReservationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationState::Created => "created",
            ReservationState::Requested => "requested",
            ReservationState::Confirmed => "confirmed",
            ReservationState::Denied => "denied",
            ReservationState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BerthType
// ---------------------------------------------------------------------------

/// Physical kind of a berth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BerthType {
    /// Ground storage place (winter storage)
    Ground,
    /// Dock berth
    Dock,
    /// Numbered mooring
    Number,
}
