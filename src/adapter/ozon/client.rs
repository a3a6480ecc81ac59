//! Ozon Seller API client.
//!
//! Reads effective prices and floors from `/v5/product/info/prices` and
//! writes corrections through `/v1/product/import/prices`.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::types::{
    classify_errors, ImportPrice, ImportPricesRequest, ImportPricesResponse, PricesFilter,
    PricesRequest, PricesResponse,
};
use crate::adapter::{build_http_client, ensure_success, response_text};
use crate::app::OzonConfig;
use crate::domain::{PriceCorrection, PriceRecord};
use crate::error::{ConfigError, Result};
use crate::marketplace::{FailureReason, MarketplaceAdapter, PushFailure, PushReport};

const NAME: &str = "ozon";

/// HTTP adapter for the Ozon Seller API.
pub struct OzonAdapter {
    client: Client,
    api_url: String,
    client_id: String,
    api_key: String,
    page_size: usize,
    batch_size: usize,
    currency_code: String,
}

impl OzonAdapter {
    /// Build an adapter from configuration.
    ///
    /// Fails if `OZON_CLIENT_ID` or `OZON_API_KEY` was not provided.
    #[allow(clippy::result_large_err)]
    pub fn new(config: &OzonConfig) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "OZON_CLIENT_ID",
            })?;
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingField {
            field: "OZON_API_KEY",
        })?;

        Ok(Self {
            client: build_http_client(config.timeout_ms)?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            client_id,
            api_key,
            page_size: config.page_size,
            batch_size: config.batch_size,
            currency_code: config.currency_code.clone(),
        })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<PricesResponse> {
        let url = format!("{}/v5/product/info/prices", self.api_url);
        let body = PricesRequest {
            filter: PricesFilter::default(),
            limit: self.page_size,
            cursor,
        };

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        Ok(ensure_success(NAME, response).await?.json().await?)
    }

    /// Translate a correction into Ozon's string-typed update.
    fn to_import(&self, correction: &PriceCorrection) -> ImportPrice {
        ImportPrice {
            offer_id: correction.offer_id.clone(),
            price: correction.new_price.normalize().to_string(),
            old_price: correction.display_reference_price.normalize().to_string(),
            currency_code: self.currency_code.clone(),
        }
    }

    async fn push_batch(&self, batch: &[PriceCorrection]) -> Result<PushReport> {
        let url = format!("{}/v1/product/import/prices", self.api_url);
        let body = ImportPricesRequest {
            prices: batch.iter().map(|c| self.to_import(c)).collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response_text(response).await;
            warn!(
                status = status.as_u16(),
                size = batch.len(),
                message = %message,
                "Ozon price batch rejected"
            );
            return Ok(reject_all(batch, status.as_u16(), &message));
        }

        let parsed: ImportPricesResponse = response.json().await?;
        Ok(collect_results(batch, parsed))
    }
}

fn reject_all(batch: &[PriceCorrection], status: u16, message: &str) -> PushReport {
    PushReport {
        succeeded: Vec::new(),
        failed: batch
            .iter()
            .map(|c| {
                PushFailure::new(
                    c.offer_id.clone(),
                    FailureReason::BatchRejected {
                        status,
                        message: message.to_string(),
                    },
                )
            })
            .collect(),
    }
}

/// Match per-item results back to the batch.
///
/// An offer the response does not mention counts as rejected.
fn collect_results(batch: &[PriceCorrection], response: ImportPricesResponse) -> PushReport {
    let mut report = PushReport::default();
    let mut answered = HashSet::new();

    for item in response.result {
        answered.insert(item.offer_id.clone());
        if item.updated {
            report.succeeded.push(item.offer_id);
        } else {
            let reason = classify_errors(&item.errors);
            report.failed.push(PushFailure::new(item.offer_id, reason));
        }
    }

    for correction in batch {
        if !answered.contains(&correction.offer_id) {
            report.failed.push(PushFailure::new(
                correction.offer_id.clone(),
                FailureReason::Rejected {
                    messages: vec!["no result returned for offer".into()],
                },
            ));
        }
    }

    report
}

#[async_trait]
impl MarketplaceAdapter for OzonAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_snapshot(&self) -> Result<Vec<PriceRecord>> {
        let mut records = Vec::new();
        let mut cursor = String::new();

        loop {
            let page = self.fetch_page(&cursor).await?.into_page();
            let count = page.items.len();

            for item in page.items {
                let Some(offer_id) = item.offer_id.filter(|id| !id.is_empty()) else {
                    warn!(product_id = ?item.product_id, "Ozon item without offer_id skipped");
                    continue;
                };
                let block = item.price.unwrap_or_default();
                records.push(PriceRecord::from_raw(
                    offer_id,
                    block.price.as_ref(),
                    block.min_price.as_ref(),
                ));
            }

            let next = page.cursor.unwrap_or_default();
            debug!(count, total = records.len(), "Fetched Ozon price page");
            if count < self.page_size || next.is_empty() {
                break;
            }
            cursor = next;
        }

        info!(count = records.len(), "Fetched Ozon snapshot");
        Ok(records)
    }

    async fn push_corrections(&self, corrections: &[PriceCorrection]) -> Result<PushReport> {
        let mut report = PushReport::default();

        for (index, batch) in corrections.chunks(self.batch_size).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "Pushing Ozon price batch");
            report.extend(self.push_batch(batch).await?);
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            below_min_price = report.floor_violations(),
            "Ozon price update finished"
        );
        Ok(report)
    }
}
