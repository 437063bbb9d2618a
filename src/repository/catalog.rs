//! Loading of the read-only resource catalog and unit list

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{ResourceCatalog, Unit},
};

async fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<T> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(format!("{} does not exist", path.display()))
        } else {
            AppError::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Load boat resources from a JSON array file
pub async fn load_resources(path: &Path) -> AppResult<ResourceCatalog> {
    let catalog: ResourceCatalog = read_json(path).await?;
    tracing::info!("Loaded {} boat resources from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Load units from a JSON array file
pub async fn load_units(path: &Path) -> AppResult<Vec<Unit>> {
    let units: Vec<Unit> = read_json(path).await?;
    tracing::info!("Loaded {} units from {}", units.len(), path.display());
    Ok(units)
}
