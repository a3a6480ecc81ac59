//! Config / base-price store configuration.

use serde::Deserialize;

/// Which store implementation backs the pricing documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Remote token-guarded JSON endpoints.
    #[default]
    Http,
    /// JSON documents on local disk.
    File,
}

/// Store configuration shared by every marketplace.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Write token sent as `X-Token`. Loaded from `REPRICER_STORE_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
}

const fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}
