//! Repository layer: durable local storage and the reservation backend

pub mod catalog;
pub mod reservations;
pub mod storage;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult};

pub use reservations::{HttpReservationPersistence, PersistenceError, ReservationPersistence};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

/// External collaborators the services work against
#[derive(Clone)]
pub struct Repository {
    pub storage: Arc<dyn KeyValueStorage>,
    pub reservations: Arc<dyn ReservationPersistence>,
}

impl Repository {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        reservations: Arc<dyn ReservationPersistence>,
    ) -> Self {
        Self {
            storage,
            reservations,
        }
    }

    /// File-backed storage and the HTTP reservation backend from config
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let storage = Arc::new(FileStorage::new(config.storage.path.clone()));
        let reservations = Arc::new(HttpReservationPersistence::new(&config.api)?);
        Ok(Self::new(storage, reservations))
    }
}
