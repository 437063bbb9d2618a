//! Boat resources (berths), units and the read-only resource catalog

use serde::{Deserialize, Serialize};

use super::{enums::BerthType, localized::LocalizedText};

/// Underlying bookable resource a berth wraps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(default)]
    pub name: LocalizedText,
    /// Owning unit id
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub reservable: bool,
}

/// Boat resource as listed in the catalog
///
/// Attributes the admin core does not interpret are kept in `extra` so the
/// berth snapshot stored on a reservation carries the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatResource {
    pub id: i64,
    pub resource: ResourceRef,
    #[serde(default)]
    pub is_disabled: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub berth_type: Option<BerthType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length_cm: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_cm: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_cm: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BoatResource {
    pub fn resource_id(&self) -> &str {
        &self.resource.id
    }

    pub fn unit_id(&self) -> Option<&str> {
        self.resource.unit.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        !self.is_disabled
    }
}

/// Snapshot of a boat resource captured into a reservation
pub type Berth = BoatResource;

/// Harbour or storage area owning a set of berths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    #[serde(default)]
    pub name: LocalizedText,
}

/// Ordered, read-only collection of boat resources
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCatalog {
    resources: Vec<BoatResource>,
}

impl ResourceCatalog {
    pub fn new(resources: Vec<BoatResource>) -> Self {
        Self { resources }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoatResource> {
        self.resources.iter()
    }

    /// Resources that may be selected for a reservation
    pub fn enabled(&self) -> impl Iterator<Item = &BoatResource> {
        self.resources.iter().filter(|r| r.is_enabled())
    }

    /// First resource whose underlying resource id matches
    pub fn find_by_resource_id(&self, resource_id: &str) -> Option<&BoatResource> {
        self.resources.iter().find(|r| r.resource_id() == resource_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
