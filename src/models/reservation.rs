//! Berth reservation model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{enums::ReservationState, localized::LocalizedText, resource::Berth};

/// Backend identifier of a berth reservation
pub type ReservationId = i64;

/// Reference to a user by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
}

/// Nested reservation record holding the reserver's contact data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservationDetails {
    #[serde(default)]
    pub reserver_name: String,
    #[serde(default)]
    pub reserver_email_address: String,
    #[serde(default)]
    pub reserver_phone_number: String,
    #[serde(default)]
    pub reserver_address_street: String,
    #[serde(default)]
    pub reserver_address_zip: String,
    #[serde(default)]
    pub reserver_address_city: String,
    #[serde(default)]
    pub description: LocalizedText,
    /// Backend attributes passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Berth reservation as edited by staff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ReservationId>,
    #[serde(default)]
    pub begin: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: ReservationState,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub reservable: bool,
    #[serde(default)]
    pub berth: Option<Berth>,
    #[serde(default)]
    pub reserver_ssn: String,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub key_returned: bool,
    #[serde(default)]
    pub reservation: ReservationDetails,
}

impl Reservation {
    /// True when both ends are set and `begin` strictly precedes `end`
    pub fn has_valid_period(&self) -> bool {
        matches!((self.begin, self.end), (Some(begin), Some(end)) if begin < end)
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// Successful save response; only the id is interpreted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedReservation {
    pub id: ReservationId,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}
