//! Local JSON file stores.
//!
//! Same documents as the HTTP endpoints, kept on disk. Writes go to a
//! temporary sibling file that is then renamed over the target.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::{BasePriceDocument, BasePriceStore, ConfigDocument, ConfigStore};
use crate::domain::BaseState;
use crate::error::Result;

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let json = serde_json::to_vec_pretty(document)?;
    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Pricing config in a JSON file.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> Result<ConfigDocument> {
        match read_optional(&self.path).await? {
            Some(content) => ConfigDocument::from_json(&content),
            None => {
                info!(path = %self.path.display(), "No config file, using defaults");
                Ok(ConfigDocument::default())
            }
        }
    }

    async fn save_config(&self, document: &ConfigDocument) -> Result<()> {
        document.validate()?;
        let mut document = document.clone();
        document.stamp(Utc::now());
        write_atomic(&self.path, &document).await?;
        debug!(path = %self.path.display(), "Saved config file");
        Ok(())
    }
}

/// Base prices in a JSON file.
pub struct FileBasePriceStore {
    path: PathBuf,
}

impl FileBasePriceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BasePriceStore for FileBasePriceStore {
    async fn load_base_prices(&self) -> Result<BaseState> {
        match read_optional(&self.path).await? {
            Some(content) => Ok(BasePriceDocument::from_json(&content)?.into_state()),
            None => Ok(BaseState::default()),
        }
    }

    async fn save_base_prices(&self, state: &BaseState) -> Result<()> {
        let mut document = BasePriceDocument::from_state(state);
        document.stamp(Utc::now());
        write_atomic(&self.path, &document).await?;
        debug!(
            path = %self.path.display(),
            count = state.prices.len(),
            lagging = state.applied.len(),
            "Saved base prices file"
        );
        Ok(())
    }
}
