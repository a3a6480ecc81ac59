//! Per-marketplace configuration.

use serde::Deserialize;

/// Where a marketplace's pricing config and base prices live.
///
/// URLs for the `http` store backend, file paths for `file`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreLocation {
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub base_prices: String,
}

/// Ozon Seller API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OzonConfig {
    #[serde(default = "default_ozon_api_url")]
    pub api_url: String,
    /// Products per page (API maximum is 1000).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Prices per update request (API maximum is 1000).
    #[serde(default = "default_page_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Currency sent with every price update.
    #[serde(default = "default_currency")]
    pub currency_code: String,
    #[serde(default)]
    pub store: StoreLocation,
    /// Loaded from `OZON_CLIENT_ID`.
    #[serde(skip)]
    pub client_id: Option<String>,
    /// Loaded from `OZON_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for OzonConfig {
    fn default() -> Self {
        Self {
            api_url: default_ozon_api_url(),
            page_size: default_page_size(),
            batch_size: default_page_size(),
            timeout_ms: default_timeout_ms(),
            currency_code: default_currency(),
            store: StoreLocation::default(),
            client_id: None,
            api_key: None,
        }
    }
}

/// How Wildberries corrections are encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WbPushMode {
    /// Keep the list price and adjust the discount.
    #[default]
    Discount,
    /// Set the list price to the target with no discount.
    Price,
}

/// Wildberries prices API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WildberriesConfig {
    #[serde(default = "default_wb_api_url")]
    pub api_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_page_size")]
    pub batch_size: usize,
    /// Pause between list pages (10 requests per 6 seconds).
    #[serde(default = "default_wb_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default)]
    pub push_mode: WbPushMode,
    /// Times an upload task's outcome is looked up; 0 trusts the upload.
    #[serde(default = "default_wb_task_poll_attempts")]
    pub task_poll_attempts: u32,
    #[serde(default = "default_wb_task_poll_delay_ms")]
    pub task_poll_delay_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub store: StoreLocation,
    /// Loaded from `WB_API_KEY`.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for WildberriesConfig {
    fn default() -> Self {
        Self {
            api_url: default_wb_api_url(),
            page_size: default_page_size(),
            batch_size: default_page_size(),
            page_delay_ms: default_wb_page_delay_ms(),
            push_mode: WbPushMode::default(),
            task_poll_attempts: default_wb_task_poll_attempts(),
            task_poll_delay_ms: default_wb_task_poll_delay_ms(),
            timeout_ms: default_timeout_ms(),
            store: StoreLocation::default(),
            api_key: None,
        }
    }
}

/// Marketplace-specific configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MarketplaceConfig {
    Ozon(OzonConfig),
    Wildberries(WildberriesConfig),
}

impl MarketplaceConfig {
    /// Marketplace name as used on the command line.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            MarketplaceConfig::Ozon(_) => "ozon",
            MarketplaceConfig::Wildberries(_) => "wildberries",
        }
    }

    #[must_use]
    pub fn api_url(&self) -> &str {
        match self {
            MarketplaceConfig::Ozon(c) => &c.api_url,
            MarketplaceConfig::Wildberries(c) => &c.api_url,
        }
    }

    #[must_use]
    pub fn store(&self) -> &StoreLocation {
        match self {
            MarketplaceConfig::Ozon(c) => &c.store,
            MarketplaceConfig::Wildberries(c) => &c.store,
        }
    }

    pub(crate) fn page_and_batch(&self) -> (usize, usize) {
        match self {
            MarketplaceConfig::Ozon(c) => (c.page_size, c.batch_size),
            MarketplaceConfig::Wildberries(c) => (c.page_size, c.batch_size),
        }
    }

    /// Fill credentials from the environment. Never read from the file.
    pub(crate) fn load_credentials(&mut self) {
        match self {
            MarketplaceConfig::Ozon(c) => {
                c.client_id = non_empty_env("OZON_CLIENT_ID");
                c.api_key = non_empty_env("OZON_API_KEY");
            }
            MarketplaceConfig::Wildberries(c) => {
                c.api_key = non_empty_env("WB_API_KEY");
            }
        }
    }
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_ozon_api_url() -> String {
    "https://api-seller.ozon.ru".into()
}

fn default_wb_api_url() -> String {
    "https://discounts-prices-api.wildberries.ru".into()
}

const fn default_page_size() -> usize {
    1000
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_wb_page_delay_ms() -> u64 {
    600
}

const fn default_wb_task_poll_attempts() -> u32 {
    3
}

const fn default_wb_task_poll_delay_ms() -> u64 {
    2000
}

fn default_currency() -> String {
    "RUB".into()
}
