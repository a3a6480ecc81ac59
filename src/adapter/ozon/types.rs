//! Ozon Seller API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::marketplace::FailureReason;

/// Body of `POST /v5/product/info/prices`.
#[derive(Debug, Serialize)]
pub struct PricesRequest<'a> {
    pub filter: PricesFilter,
    pub limit: usize,
    pub cursor: &'a str,
}

/// Empty filter: every product of the seller.
#[derive(Debug, Default, Serialize)]
pub struct PricesFilter {}

/// A page of prices.
///
/// Items and cursor appear either at the top level or wrapped in `result`.
#[derive(Debug, Default, Deserialize)]
pub struct PricesResponse {
    #[serde(default)]
    pub result: Option<PricesPage>,
    #[serde(default)]
    pub items: Option<Vec<PriceItem>>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PricesPage {
    #[serde(default)]
    pub items: Vec<PriceItem>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl PricesResponse {
    pub fn into_page(self) -> PricesPage {
        match self.result {
            Some(page) => page,
            None => PricesPage {
                items: self.items.unwrap_or_default(),
                cursor: self.cursor,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PriceItem {
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<Value>,
    #[serde(default)]
    pub price: Option<PriceBlock>,
}

/// Price fields arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub struct PriceBlock {
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub old_price: Option<Value>,
    #[serde(default)]
    pub min_price: Option<Value>,
}

/// Body of `POST /v1/product/import/prices`.
#[derive(Debug, Serialize)]
pub struct ImportPricesRequest {
    pub prices: Vec<ImportPrice>,
}

/// One price update. Ozon expects prices as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPrice {
    pub offer_id: String,
    pub price: String,
    pub old_price: String,
    pub currency_code: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportPricesResponse {
    #[serde(default)]
    pub result: Vec<ImportResult>,
}

#[derive(Debug, Deserialize)]
pub struct ImportResult {
    #[serde(default)]
    pub offer_id: String,
    #[serde(default)]
    pub updated: bool,
    #[serde(default)]
    pub errors: Vec<ImportError>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ImportError {
    /// Whether Ozon refused the price for being below the product minimum.
    pub fn is_min_price(&self) -> bool {
        self.code == "MIN_PRICE_ERROR"
            || self.message.contains("min_price")
            || self.message.contains("минимальн")
    }

    fn text(&self) -> String {
        if self.message.is_empty() {
            self.code.clone()
        } else {
            self.message.clone()
        }
    }
}

/// Map item-level errors to a failure reason.
pub fn classify_errors(errors: &[ImportError]) -> FailureReason {
    let messages = errors.iter().map(ImportError::text).collect();
    if errors.iter().any(ImportError::is_min_price) {
        FailureReason::BelowMinPrice { messages }
    } else {
        FailureReason::Rejected { messages }
    }
}
