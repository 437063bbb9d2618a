//! Persisted reservation filter state

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    error::{AppError, AppResult},
    models::filter::{FilterKind, FilterSet, SHOW_KEY},
    repository::KeyValueStorage,
    services::events::{AppEvent, EventBus},
};

/// Owner of the process-wide filter set
///
/// Every mutation is written through to storage before it becomes visible, so
/// a failed write leaves both the stored and the in-memory set unchanged.
pub struct FilterStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    bus: Arc<EventBus>,
    filters: Mutex<FilterSet>,
}

impl FilterStore {
    /// Create the store, loading the persisted set
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        key: impl Into<String>,
        bus: Arc<EventBus>,
    ) -> Self {
        let key = key.into();
        let filters = Self::load(storage.as_ref(), &key);
        Self {
            storage,
            key,
            bus,
            filters: Mutex::new(filters),
        }
    }

    /// Read the stored set; missing or unreadable data yields an empty set
    pub fn load(storage: &dyn KeyValueStorage, key: &str) -> FilterSet {
        let raw = match storage.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FilterSet::new(),
            Err(e) => {
                tracing::warn!("Could not read stored filters: {}", e);
                return FilterSet::new();
            }
        };

        FilterSet::from_json(&raw).unwrap_or_else(|| {
            tracing::warn!("Stored filters under {} are not a JSON object, ignoring", key);
            FilterSet::new()
        })
    }

    /// Apply raw input for one filter field, persist, then notify listeners.
    ///
    /// Input that normalizes to `''` or `0` (or does not parse for numeric
    /// kinds) removes the constraint.
    pub fn set_filter(&self, name: &str, raw_value: &str, kind: FilterKind) -> AppResult<()> {
        if name == SHOW_KEY {
            return Err(AppError::Validation(format!(
                "'{}' is reserved for panel visibility",
                SHOW_KEY
            )));
        }

        self.mutate(|filters| match kind.normalize(raw_value) {
            Some(value) => {
                tracing::debug!("Filter {} set to {}", name, value);
                filters.insert(name, value);
            }
            None => {
                tracing::debug!("Filter {} cleared", name);
                filters.remove(name);
            }
        })?;

        self.bus.publish(AppEvent::ReservationFilterChanged);
        Ok(())
    }

    /// Remove every constraint, keeping panel visibility
    pub fn clear(&self) -> AppResult<()> {
        self.mutate(FilterSet::clear_constraints)?;
        self.bus.publish(AppEvent::ReservationFilterChanged);
        Ok(())
    }

    /// Flip the panel visibility flag and persist it. Returns the new value.
    ///
    /// Visibility is not a query constraint, so nothing is published.
    pub fn toggle_visibility(&self) -> AppResult<bool> {
        let mut shown = false;
        self.mutate(|filters| {
            filters.show = !filters.show;
            shown = filters.show;
        })?;
        Ok(shown)
    }

    pub fn snapshot(&self) -> FilterSet {
        self.filters().clone()
    }

    pub fn is_shown(&self) -> bool {
        self.filters().show
    }

    /// Centimetre filter rendered as metres for the filter form
    pub fn meters(&self, name: &str) -> String {
        self.filters().meters(name)
    }

    fn mutate<F>(&self, f: F) -> AppResult<()>
    where
        F: FnOnce(&mut FilterSet),
    {
        let mut current = self.filters();
        let mut next = current.clone();
        f(&mut next);

        let blob = next.to_json()?;
        self.storage.set_item(&self.key, &blob).map_err(|e| {
            tracing::error!("Failed to persist filters: {}", e);
            e
        })?;

        *current = next;
        Ok(())
    }

    fn filters(&self) -> MutexGuard<'_, FilterSet> {
        self.filters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
