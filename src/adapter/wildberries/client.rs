//! Wildberries prices API client.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::pricing::{effective_price, encode, will_trigger_quarantine};
use super::types::{
    GoodsResponse, PriceUpdate, TaskGoodsResponse, TaskHistoryResponse, TaskStatus,
    UploadTaskRequest, UploadTaskResponse,
};
use crate::adapter::{build_http_client, ensure_success, response_text};
use crate::app::{WbPushMode, WildberriesConfig};
use crate::domain::money::coerce_price;
use crate::domain::{Price, PriceCorrection, PriceRecord, DEFAULT_TOLERANCE};
use crate::error::{ConfigError, Result};
use crate::marketplace::{FailureReason, MarketplaceAdapter, PushFailure, PushReport};

const NAME: &str = "wildberries";

/// HTTP adapter for the Wildberries prices and discounts API.
///
/// Remembers each product's list price from the last snapshot so that
/// discount-mode corrections keep it unchanged. Uploads are processed
/// asynchronously; each accepted task is looked up in the task history to
/// find items Wildberries refused.
pub struct WildberriesAdapter {
    client: Client,
    api_url: String,
    api_key: String,
    page_size: usize,
    batch_size: usize,
    page_delay: Duration,
    push_mode: WbPushMode,
    tolerance: Decimal,
    task_poll_attempts: u32,
    task_poll_delay: Duration,
    list_prices: Mutex<HashMap<String, Price>>,
}

impl WildberriesAdapter {
    #[allow(clippy::result_large_err)]
    pub fn new(config: &WildberriesConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or(ConfigError::MissingField {
            field: "WB_API_KEY",
        })?;

        Ok(Self {
            client: build_http_client(config.timeout_ms)?,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key,
            page_size: config.page_size,
            batch_size: config.batch_size,
            page_delay: Duration::from_millis(config.page_delay_ms),
            push_mode: config.push_mode,
            tolerance: DEFAULT_TOLERANCE,
            task_poll_attempts: config.task_poll_attempts,
            task_poll_delay: Duration::from_millis(config.task_poll_delay_ms),
            list_prices: Mutex::new(HashMap::new()),
        })
    }

    /// Price tolerance a discount-encoded price must meet.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    async fn fetch_page(&self, offset: usize) -> Result<GoodsResponse> {
        let url = format!(
            "{}/api/v2/list/goods/filter?limit={}&offset={}",
            self.api_url, self.page_size, offset
        );

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await?;

        Ok(ensure_success(NAME, response).await?.json().await?)
    }

    /// Encode corrections, withholding those that would trigger quarantine.
    fn prepare(&self, corrections: &[PriceCorrection]) -> (Vec<(String, PriceUpdate)>, PushReport) {
        let list_prices = self.list_prices.lock();
        let mut updates = Vec::with_capacity(corrections.len());
        let mut report = PushReport::default();

        for correction in corrections {
            let observed = correction.observed_price();
            let target = correction.new_price;

            if will_trigger_quarantine(observed, target) {
                warn!(
                    offer_id = %correction.offer_id,
                    observed = %observed,
                    target = %target,
                    "Wildberries correction withheld: quarantine risk"
                );
                report.failed.push(PushFailure::new(
                    correction.offer_id.clone(),
                    FailureReason::QuarantineRisk { observed, target },
                ));
                continue;
            }

            let Ok(nm_id) = correction.offer_id.parse::<u64>() else {
                report.failed.push(PushFailure::new(
                    correction.offer_id.clone(),
                    FailureReason::Rejected {
                        messages: vec!["offer_id is not a numeric nmID".into()],
                    },
                ));
                continue;
            };

            let (price, discount) = encode(
                self.push_mode,
                list_prices.get(&correction.offer_id).copied(),
                target,
                self.tolerance,
            );
            let Some(price) = price.to_u64() else {
                report.failed.push(PushFailure::new(
                    correction.offer_id.clone(),
                    FailureReason::Rejected {
                        messages: vec![format!("price {price} out of range")],
                    },
                ));
                continue;
            };

            updates.push((
                correction.offer_id.clone(),
                PriceUpdate {
                    nm_id,
                    price,
                    discount,
                },
            ));
        }

        (updates, report)
    }

    async fn upload_batch(&self, batch: &[(String, PriceUpdate)]) -> Result<PushReport> {
        let url = format!("{}/api/v2/upload/task", self.api_url);
        let body = UploadTaskRequest {
            data: batch.iter().map(|(_, update)| update.clone()).collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let offer_ids = batch.iter().map(|(id, _)| id.clone());

        if !status.is_success() {
            let message = response_text(response).await;
            warn!(
                status = status.as_u16(),
                size = batch.len(),
                message = %message,
                "Wildberries upload task rejected"
            );
            return Ok(fail_all(
                offer_ids,
                &FailureReason::BatchRejected {
                    status: status.as_u16(),
                    message,
                },
            ));
        }

        let parsed: UploadTaskResponse = response.json().await?;
        match parsed.task_id() {
            Some(task_id) => {
                info!(task_id = %task_id, size = batch.len(), "Wildberries upload task accepted");
                Ok(self.resolve_task(&task_id, batch).await)
            }
            None => {
                let message = parsed
                    .error_text
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "upload task not accepted".into());
                warn!(message = %message, "Wildberries upload task missing id");
                Ok(fail_all(
                    offer_ids,
                    &FailureReason::Rejected {
                        messages: vec![message],
                    },
                ))
            }
        }
    }

    /// Per-item outcome of an accepted upload task.
    ///
    /// Items count as applied when the task is still processing after the
    /// configured attempts, or when its history cannot be read.
    async fn resolve_task(&self, task_id: &str, batch: &[(String, PriceUpdate)]) -> PushReport {
        let all_applied = || PushReport {
            succeeded: batch.iter().map(|(id, _)| id.clone()).collect(),
            failed: Vec::new(),
        };

        for attempt in 1..=self.task_poll_attempts {
            tokio::time::sleep(self.task_poll_delay).await;
            let status = match self.fetch_task_history(task_id).await {
                Ok(history) => history.status(),
                Err(e) => {
                    warn!(task_id, error = %e, "Wildberries task history unavailable");
                    return all_applied();
                }
            };

            match status {
                TaskStatus::Pending => {
                    debug!(task_id, attempt, "Wildberries upload task still processing");
                }
                TaskStatus::Processed => return all_applied(),
                TaskStatus::Canceled => {
                    warn!(task_id, "Wildberries upload task canceled");
                    return fail_all(
                        batch.iter().map(|(id, _)| id.clone()),
                        &FailureReason::Rejected {
                            messages: vec!["upload task canceled".into()],
                        },
                    );
                }
                TaskStatus::ProcessedWithErrors => {
                    return match self.fetch_task_goods(task_id).await {
                        Ok(goods) => item_outcomes(goods, batch),
                        Err(e) => {
                            warn!(task_id, error = %e, "Wildberries task goods unavailable");
                            all_applied()
                        }
                    };
                }
            }
        }

        if self.task_poll_attempts > 0 {
            warn!(task_id, "Wildberries upload task still processing; assuming applied");
        }
        all_applied()
    }

    async fn fetch_task_history(&self, task_id: &str) -> Result<TaskHistoryResponse> {
        let url = format!("{}/api/v2/history/tasks?uploadID={task_id}", self.api_url);
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await?;
        Ok(ensure_success(NAME, response).await?.json().await?)
    }

    async fn fetch_task_goods(&self, task_id: &str) -> Result<TaskGoodsResponse> {
        let url = format!(
            "{}/api/v2/history/goods/task?uploadID={task_id}&limit={}&offset=0",
            self.api_url, self.batch_size
        );
        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .send()
            .await?;
        Ok(ensure_success(NAME, response).await?.json().await?)
    }
}

/// Split a batch by the item errors in a task's goods history.
fn item_outcomes(goods: TaskGoodsResponse, batch: &[(String, PriceUpdate)]) -> PushReport {
    let failures: HashMap<u64, FailureReason> = goods
        .data
        .unwrap_or_default()
        .history_goods
        .iter()
        .filter_map(|good| Some((good.nm_id?, good.failure()?)))
        .collect();

    let mut report = PushReport::default();
    for (offer_id, update) in batch {
        match failures.get(&update.nm_id) {
            Some(reason) => {
                warn!(offer_id = %offer_id, reason = %reason, "Wildberries refused price update");
                report
                    .failed
                    .push(PushFailure::new(offer_id.clone(), reason.clone()));
            }
            None => report.succeeded.push(offer_id.clone()),
        }
    }
    report
}

fn fail_all(offer_ids: impl Iterator<Item = String>, reason: &FailureReason) -> PushReport {
    PushReport {
        succeeded: Vec::new(),
        failed: offer_ids
            .map(|id| PushFailure::new(id, reason.clone()))
            .collect(),
    }
}

#[async_trait]
impl MarketplaceAdapter for WildberriesAdapter {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn fetch_snapshot(&self) -> Result<Vec<PriceRecord>> {
        let mut records = Vec::new();
        let mut list_prices = HashMap::new();
        let mut offset = 0;

        loop {
            let goods = self
                .fetch_page(offset)
                .await?
                .data
                .unwrap_or_default()
                .list_goods;
            let count = goods.len();

            for good in goods {
                let Some(nm_id) = good.nm_id else {
                    warn!(vendor_code = ?good.vendor_code, "Wildberries good without nmID skipped");
                    continue;
                };
                let offer_id = nm_id.to_string();
                let size = good.sizes.first();
                let list_price = coerce_price(size.and_then(|s| s.price.as_ref()));
                let discounted = coerce_price(size.and_then(|s| s.discounted_price.as_ref()));
                let discount = coerce_price(good.discount.as_ref());

                list_prices.insert(offer_id.clone(), list_price);
                records.push(PriceRecord::new(
                    offer_id,
                    effective_price(list_price, discount, discounted),
                    Price::ZERO,
                ));
            }

            debug!(count, total = records.len(), "Fetched Wildberries goods page");
            if count < self.page_size {
                break;
            }
            offset += self.page_size;
            tokio::time::sleep(self.page_delay).await;
        }

        *self.list_prices.lock() = list_prices;

        info!(count = records.len(), "Fetched Wildberries snapshot");
        Ok(records)
    }

    async fn push_corrections(&self, corrections: &[PriceCorrection]) -> Result<PushReport> {
        let (updates, mut report) = self.prepare(corrections);

        for (index, batch) in updates.chunks(self.batch_size).enumerate() {
            debug!(batch = index + 1, size = batch.len(), "Uploading Wildberries prices");
            report.extend(self.upload_batch(batch).await?);
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Wildberries price update finished"
        );
        Ok(report)
    }
}
