//! Reservation persistence collaborator

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    models::{FieldErrors, Reservation, SavedReservation},
};

/// Why a save did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The backend refused the payload with field-level errors
    #[error("Reservation rejected: {0}")]
    Rejected(FieldErrors),

    /// The request did not complete or the response was unusable
    #[error("Transport error: {0}")]
    Transport(String),
}

impl PersistenceError {
    /// Errors in the shape the form displays them
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            PersistenceError::Rejected(errors) => errors.clone(),
            PersistenceError::Transport(message) => FieldErrors::general(message.clone()),
        }
    }
}

/// Saves reservations; success yields the stored record with its id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationPersistence: Send + Sync {
    async fn save(&self, reservation: &Reservation) -> Result<SavedReservation, PersistenceError>;
}

/// REST implementation against the berth reservation backend
#[derive(Clone)]
pub struct HttpReservationPersistence {
    client: reqwest::Client,
    base_url: String,
}

impl HttpReservationPersistence {
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Collection URL for new reservations, detail URL for existing ones
    pub fn url_for(&self, reservation: &Reservation) -> String {
        match reservation.id {
            Some(id) => format!("{}/hml_reservation/{}/", self.base_url, id),
            None => format!("{}/hml_reservation/", self.base_url),
        }
    }
}

#[async_trait]
impl ReservationPersistence for HttpReservationPersistence {
    async fn save(&self, reservation: &Reservation) -> Result<SavedReservation, PersistenceError> {
        let url = self.url_for(reservation);
        let request = if reservation.is_new() {
            self.client.post(&url)
        } else {
            self.client.put(&url)
        };

        tracing::debug!("Saving reservation to {}", url);

        let response = request
            .json(reservation)
            .send()
            .await
            .map_err(|e| PersistenceError::Transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status.is_success() {
            return response.json::<SavedReservation>().await.map_err(|e| {
                PersistenceError::Transport(format!("Invalid save response: {}", e))
            });
        }

        if status.is_client_error() {
            let body = response
                .json::<serde_json::Value>()
                .await
                .unwrap_or(serde_json::Value::Null);
            let mut errors = FieldErrors::from_json(&body);
            if errors.is_empty() {
                errors = FieldErrors::general(format!("Request rejected with status {}", status));
            }
            tracing::warn!("Reservation save rejected ({}): {}", status, errors);
            return Err(PersistenceError::Rejected(errors));
        }

        tracing::error!("Reservation backend returned {}", status);
        Err(PersistenceError::Transport(format!(
            "Reservation backend returned {}",
            status
        )))
    }
}
