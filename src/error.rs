use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("unknown marketplace: {0}")]
    UnknownMarketplace(String),
}

/// Errors raised at the config / base-price store boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store rejected write token for {url}")]
    Unauthorized { url: String },

    #[error("store rejected document: {reason}")]
    Validation { reason: String },

    #[error("store request to {url} failed with status {status}: {message}")]
    Transport {
        url: String,
        status: u16,
        message: String,
    },
}

/// Errors talking to a marketplace API.
#[derive(Error, Debug)]
pub enum MarketplaceError {
    #[error("{marketplace} API error {status}: {message}")]
    Transport {
        marketplace: &'static str,
        status: u16,
        message: String,
    },

    #[error("{marketplace} returned an unexpected response: {reason}")]
    UnexpectedResponse {
        marketplace: &'static str,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Marketplace(#[from] MarketplaceError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Whether the failure came from the network or a non-2xx response.
    ///
    /// Transport failures abort a cycle; the scheduler retries it whole.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Marketplace(MarketplaceError::Transport { .. })
                | Error::Store(StoreError::Transport { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
