//! Unit list presentation

use crate::models::{ResourceCatalog, Unit};

/// One line of the unit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRow {
    pub unit_id: String,
    pub name: String,
    pub boat_resource_count: usize,
}

#[derive(Debug, Clone)]
pub struct UnitListPresenter {
    language: String,
}

impl UnitListPresenter {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Number of boat resources owned by a unit, disabled ones included
    pub fn resource_count(&self, unit_id: &str, catalog: &ResourceCatalog) -> usize {
        catalog
            .iter()
            .filter(|resource| resource.unit_id() == Some(unit_id))
            .count()
    }

    pub fn rows(&self, units: &[Unit], catalog: &ResourceCatalog) -> Vec<UnitRow> {
        units
            .iter()
            .map(|unit| UnitRow {
                unit_id: unit.id.clone(),
                name: unit.name.get(&self.language).to_string(),
                boat_resource_count: self.resource_count(&unit.id, catalog),
            })
            .collect()
    }

    /// Display name of a unit, empty when it is not known
    pub fn unit_name(&self, units: &[Unit], unit_id: &str) -> String {
        units
            .iter()
            .find(|unit| unit.id == unit_id)
            .map(|unit| unit.name.get(&self.language).to_string())
            .unwrap_or_default()
    }
}
