//! HTTP document stores.
//!
//! `GET` returns the stored JSON document, `POST` with an `X-Token` header
//! replaces it. The server adds its own metadata on write.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use super::{BasePriceDocument, BasePriceStore, ConfigDocument, ConfigStore};
use crate::domain::BaseState;
use crate::error::{ConfigError, Result, StoreError};

/// One remote JSON document.
#[derive(Clone)]
struct RemoteDocument {
    client: Client,
    url: String,
    token: Option<String>,
}

impl RemoteDocument {
    /// Fetch the document body, `None` when the server has none yet.
    async fn get(&self) -> Result<Option<String>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(url = %self.url, "Store document not found");
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(status_error(&self.url, status, body).into());
        }
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(body))
    }

    async fn post<T: serde::Serialize + Sync>(&self, document: &T) -> Result<()> {
        let token = self.token.as_deref().ok_or(ConfigError::MissingField {
            field: "REPRICER_STORE_TOKEN",
        })?;

        let response = self
            .client
            .post(&self.url)
            .header("X-Token", token)
            .json(document)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(&self.url, status, body).into());
        }
        Ok(())
    }
}

/// Map a non-2xx store response to a [`StoreError`].
pub(crate) fn status_error(url: &str, status: StatusCode, body: String) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized {
            url: url.to_string(),
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation { reason: body }
        }
        _ => StoreError::Transport {
            url: url.to_string(),
            status: status.as_u16(),
            message: body,
        },
    }
}

/// Pricing config behind an HTTP endpoint.
pub struct HttpConfigStore {
    inner: RemoteDocument,
}

impl HttpConfigStore {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            inner: RemoteDocument {
                client,
                url: url.into(),
                token,
            },
        }
    }
}

#[async_trait]
impl ConfigStore for HttpConfigStore {
    async fn load_config(&self) -> Result<ConfigDocument> {
        match self.inner.get().await? {
            Some(body) => ConfigDocument::from_json(&body),
            None => {
                info!(url = %self.inner.url, "No stored config, using defaults");
                Ok(ConfigDocument::default())
            }
        }
    }

    async fn save_config(&self, document: &ConfigDocument) -> Result<()> {
        document.validate()?;
        self.inner.post(document).await?;
        debug!(url = %self.inner.url, "Saved config document");
        Ok(())
    }
}

/// Base prices behind an HTTP endpoint.
pub struct HttpBasePriceStore {
    inner: RemoteDocument,
}

impl HttpBasePriceStore {
    #[must_use]
    pub fn new(client: Client, url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            inner: RemoteDocument {
                client,
                url: url.into(),
                token,
            },
        }
    }
}

#[async_trait]
impl BasePriceStore for HttpBasePriceStore {
    async fn load_base_prices(&self) -> Result<BaseState> {
        match self.inner.get().await? {
            Some(body) => Ok(BasePriceDocument::from_json(&body)?.into_state()),
            None => Ok(BaseState::default()),
        }
    }

    async fn save_base_prices(&self, state: &BaseState) -> Result<()> {
        self.inner
            .post(&BasePriceDocument::from_state(state))
            .await?;
        debug!(
            url = %self.inner.url,
            count = state.prices.len(),
            lagging = state.applied.len(),
            "Saved base prices"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let url = "https://store.example/config";
        assert!(matches!(
            status_error(url, StatusCode::FORBIDDEN, String::new()),
            StoreError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(url, StatusCode::UNAUTHORIZED, String::new()),
            StoreError::Unauthorized { .. }
        ));
        assert!(matches!(
            status_error(url, StatusCode::BAD_REQUEST, "Invalid JSON".into()),
            StoreError::Validation { ref reason } if reason == "Invalid JSON"
        ));
        assert!(matches!(
            status_error(url, StatusCode::INTERNAL_SERVER_ERROR, String::new()),
            StoreError::Transport { status: 500, .. }
        ));
    }
}
