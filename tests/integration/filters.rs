use std::sync::Arc;

use serde_json::{json, Value};

use varaus_admin::{
    models::{FilterKind, FilterValue},
    repository::{FileStorage, KeyValueStorage, MemoryStorage},
    services::AppEvent,
};

use crate::common::{context, context_with, record_events, MockPersistence};

const KEY: &str = "boat_reservation_filters";

#[test]
fn test_filters_survive_reinitialization() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());

    let first = context_with(storage.clone(), MockPersistence::new());
    let filters = &first.services.filters;
    filters.set_filter("berth_length", "8", FilterKind::Float).unwrap();
    filters.set_filter("unit", "unit-1", FilterKind::Text).unwrap();
    filters.toggle_visibility().unwrap();

    let second = context_with(storage, MockPersistence::new());
    let restored = second.services.filters.snapshot();

    assert!(restored.show);
    assert_eq!(restored.get("berth_length"), Some(&FilterValue::Int(800)));
    assert_eq!(restored.get("unit"), Some(&FilterValue::Text("unit-1".into())));
    assert_eq!(second.services.filters.meters("berth_length"), "8.00");
}

#[test]
fn test_stored_blob_shape() {
    let storage = Arc::new(MemoryStorage::new());
    let ctx = context_with(storage.clone(), MockPersistence::new());
    let filters = &ctx.services.filters;

    filters.set_filter("berth_width", "2.5", FilterKind::Float).unwrap();
    filters.set_filter("unit", "", FilterKind::Text).unwrap();
    filters.set_filter("min_price", "0", FilterKind::Integer).unwrap();

    let raw = storage.get_item(KEY).unwrap().expect("filters stored");
    let blob: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(blob, json!({"berth_width": 250}));

    filters.toggle_visibility().unwrap();
    let raw = storage.get_item(KEY).unwrap().unwrap();
    let blob: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(blob, json!({"berth_width": 250, "show": true}));
}

#[test]
fn test_every_change_notifies_listeners() {
    let ctx = context(MockPersistence::new());
    let events = record_events(&ctx);
    let filters = &ctx.services.filters;

    filters.set_filter("unit", "unit-2", FilterKind::Text).unwrap();
    filters.set_filter("unit", "", FilterKind::Text).unwrap();
    filters.toggle_visibility().unwrap();
    filters.clear().unwrap();

    assert_eq!(
        *events.lock().unwrap(),
        vec![
            AppEvent::ReservationFilterChanged,
            AppEvent::ReservationFilterChanged,
            AppEvent::ReservationFilterChanged,
        ]
    );
}

#[test]
fn test_listener_sees_updated_filters() {
    let ctx = context(MockPersistence::new());
    let filters = ctx.services.filters.clone();
    let seen = Arc::new(std::sync::Mutex::new(None));

    let sink = seen.clone();
    let reader = filters.clone();
    ctx.bus().subscribe(move |_| {
        *sink.lock().unwrap() = reader.snapshot().get("unit").cloned();
    });

    filters.set_filter("unit", "unit-1", FilterKind::Text).unwrap();
    assert_eq!(*seen.lock().unwrap(), Some(FilterValue::Text("unit-1".into())));
}

#[test]
fn test_corrupt_blob_starts_empty() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(KEY, "[1, 2, 3]").unwrap();

    let ctx = context_with(storage, MockPersistence::new());
    assert!(ctx.services.filters.snapshot().is_empty());
    assert!(!ctx.services.filters.is_shown());
}

#[test]
fn test_file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("local_storage.json");

    {
        let storage = Arc::new(FileStorage::new(path.clone()));
        let ctx = context_with(storage, MockPersistence::new());
        ctx.services
            .filters
            .set_filter("berth_depth", "1.2", FilterKind::Float)
            .unwrap();
    }

    let storage = Arc::new(FileStorage::new(path));
    let ctx = context_with(storage, MockPersistence::new());
    assert_eq!(
        ctx.services.filters.snapshot().get("berth_depth"),
        Some(&FilterValue::Int(120))
    );
}
