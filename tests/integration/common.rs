//! Shared wiring for the integration tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use serde_json::json;

use varaus_admin::{
    config::AppConfig,
    models::{Reservation, ResourceCatalog, SavedReservation, Unit},
    repository::{
        KeyValueStorage, MemoryStorage, PersistenceError, Repository, ReservationPersistence,
    },
    services::AppEvent,
    AdminContext,
};

mock! {
    pub Persistence {}

    #[async_trait]
    impl ReservationPersistence for Persistence {
        async fn save(
            &self,
            reservation: &Reservation,
        ) -> Result<SavedReservation, PersistenceError>;
    }
}

pub fn catalog() -> ResourceCatalog {
    serde_json::from_value(json!([
        {
            "id": 11,
            "resource": {
                "id": "res-a",
                "name": {"fi": "A-laituri 1"},
                "unit": "unit-1",
                "reservable": true
            },
            "is_disabled": false,
            "type": "dock",
            "price": "150.00",
            "length_cm": 800,
            "width_cm": 300,
            "depth_cm": 120
        },
        {
            "id": 12,
            "resource": {
                "id": "res-b",
                "name": {"fi": "A-laituri 2"},
                "unit": "unit-1",
                "reservable": false
            },
            "is_disabled": true,
            "type": "dock"
        },
        {
            "id": 21,
            "resource": {
                "id": "res-c",
                "name": {"fi": "Kenttäpaikka 5"},
                "unit": "unit-2",
                "reservable": true
            },
            "is_disabled": false,
            "type": "ground"
        }
    ]))
    .expect("catalog fixture")
}

pub fn units() -> Vec<Unit> {
    serde_json::from_value(json!([
        {"id": "unit-1", "name": {"fi": "Pursilahden venesatama"}},
        {"id": "unit-2", "name": {"fi": "Vuosaaren talvisäilytys"}},
        {"id": "unit-3", "name": {"fi": "Tyhjä satama"}}
    ]))
    .expect("units fixture")
}

/// Context over the given storage; form dates are Europe/Helsinki time
pub fn context_with(
    storage: Arc<dyn KeyValueStorage>,
    persistence: MockPersistence,
) -> AdminContext {
    let repository = Repository::new(storage, Arc::new(persistence));
    AdminContext::new(AppConfig::default(), repository, catalog(), units()).expect("context")
}

pub fn context(persistence: MockPersistence) -> AdminContext {
    context_with(Arc::new(MemoryStorage::new()), persistence)
}

/// Record every event published on the context bus
pub fn record_events(context: &AdminContext) -> Arc<Mutex<Vec<AppEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    context.bus().subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}
