//! Varaus admin core
//!
//! Client-side core of the boat-berth reservation administration UI: the
//! reservation edit-and-validate workflow, the persisted reservation filter
//! state and the unit list counts, wired together through an event bus.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use models::{FieldFeedback, Reservation, ReservationDraft, ResourceCatalog, Unit};
use repository::Repository;
use services::{reservations::AttemptState, EventBus, Services};

/// Composition root shared by all views
#[derive(Clone)]
pub struct AdminContext {
    pub config: Arc<AppConfig>,
    pub repository: Repository,
    pub services: Arc<Services>,
    pub catalog: Arc<ResourceCatalog>,
    pub units: Arc<Vec<Unit>>,
}

impl AdminContext {
    /// Wire services to the given collaborators with a fresh event bus
    pub fn new(
        config: AppConfig,
        repository: Repository,
        catalog: ResourceCatalog,
        units: Vec<Unit>,
    ) -> AppResult<Self> {
        let bus = Arc::new(EventBus::new());
        let services = Services::new(&repository, &config, bus)?;
        Ok(Self {
            config: Arc::new(config),
            repository,
            services: Arc::new(services),
            catalog: Arc::new(catalog),
            units: Arc::new(units),
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.services.bus
    }

    /// Run one save attempt of the edit form against the configured backend
    pub async fn save_reservation(
        &self,
        reservation: &mut Reservation,
        draft: &ReservationDraft,
        feedback: &mut FieldFeedback,
    ) -> AttemptState {
        self.services
            .reservations
            .save(
                reservation,
                draft,
                &self.catalog,
                self.repository.reservations.as_ref(),
                feedback,
            )
            .await
    }
}
