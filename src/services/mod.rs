//! Business logic services

pub mod events;
pub mod filters;
pub mod reservations;
pub mod units;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub bus: Arc<EventBus>,
    pub filters: Arc<filters::FilterStore>,
    pub reservations: reservations::ReservationEditor,
    pub units: units::UnitListPresenter,
}

pub use events::{AppEvent, EventBus, SubscriptionId};

impl Services {
    /// Create all services around one shared event bus
    pub fn new(repository: &Repository, config: &AppConfig, bus: Arc<EventBus>) -> AppResult<Self> {
        Ok(Self {
            filters: Arc::new(filters::FilterStore::new(
                repository.storage.clone(),
                config.storage.filter_key.clone(),
                bus.clone(),
            )),
            reservations: reservations::ReservationEditor::from_config(
                bus.clone(),
                &config.display,
            )?,
            units: units::UnitListPresenter::new(config.display.language.clone()),
            bus,
        })
    }
}
