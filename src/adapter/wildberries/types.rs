//! Wildberries prices API request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::marketplace::FailureReason;

/// Response of `GET /api/v2/list/goods/filter`.
#[derive(Debug, Default, Deserialize)]
pub struct GoodsResponse {
    #[serde(default)]
    pub data: Option<GoodsData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GoodsData {
    #[serde(default, rename = "listGoods")]
    pub list_goods: Vec<Good>,
}

#[derive(Debug, Deserialize)]
pub struct Good {
    #[serde(default, rename = "nmID")]
    pub nm_id: Option<u64>,
    #[serde(default, rename = "vendorCode")]
    pub vendor_code: Option<String>,
    #[serde(default)]
    pub discount: Option<Value>,
    #[serde(default)]
    pub sizes: Vec<Size>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Size {
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default, rename = "discountedPrice")]
    pub discounted_price: Option<Value>,
}

/// Body of `POST /api/v2/upload/task`.
#[derive(Debug, Serialize)]
pub struct UploadTaskRequest {
    pub data: Vec<PriceUpdate>,
}

/// One product's new list price and discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceUpdate {
    #[serde(rename = "nmID")]
    pub nm_id: u64,
    pub price: u64,
    pub discount: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadTaskResponse {
    #[serde(default)]
    pub data: Option<UploadTask>,
    #[serde(default, rename = "errorText")]
    pub error_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadTask {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "alreadyExists")]
    pub already_exists: bool,
}

impl UploadTaskResponse {
    /// Task id if Wildberries accepted the upload.
    pub fn task_id(&self) -> Option<String> {
        match self.data.as_ref()?.id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Response of `GET /api/v2/history/tasks?uploadID=`.
///
/// `data` stays empty while the task is still in the processing buffer.
#[derive(Debug, Default, Deserialize)]
pub struct TaskHistoryResponse {
    #[serde(default)]
    pub data: Option<TaskHistory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskHistory {
    #[serde(default)]
    pub status: Option<u8>,
    #[serde(default, rename = "overAllGoodsNumber")]
    pub overall_goods: Option<u64>,
    #[serde(default, rename = "successGoodsNumber")]
    pub success_goods: Option<u64>,
}

/// Processing state of an upload task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not finished, or not visible in the history yet.
    Pending,
    /// Every item applied.
    Processed,
    /// Some or all items failed; details are in the goods history.
    ProcessedWithErrors,
    Canceled,
}

impl TaskHistoryResponse {
    pub fn status(&self) -> TaskStatus {
        match self.data.as_ref().and_then(|task| task.status) {
            Some(3) => TaskStatus::Processed,
            Some(4) => TaskStatus::Canceled,
            Some(5 | 6) => TaskStatus::ProcessedWithErrors,
            _ => TaskStatus::Pending,
        }
    }
}

/// Response of `GET /api/v2/history/goods/task?uploadID=`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskGoodsResponse {
    #[serde(default)]
    pub data: Option<TaskGoods>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TaskGoods {
    #[serde(default, rename = "historyGoods")]
    pub history_goods: Vec<TaskGood>,
}

/// Per-item outcome of an upload task.
#[derive(Debug, Deserialize)]
pub struct TaskGood {
    #[serde(default, rename = "nmID")]
    pub nm_id: Option<u64>,
    #[serde(default, rename = "errorText")]
    pub error_text: Option<String>,
}

impl TaskGood {
    /// Error reported for this item, if any.
    pub fn error(&self) -> Option<&str> {
        self.error_text.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// Why the item was not applied; `None` when it was.
    pub fn failure(&self) -> Option<FailureReason> {
        let message = self.error()?;
        let lower = message.to_lowercase();
        let messages = vec![message.to_string()];
        let below_min = ["min_price", "min price", "minimum price", "минимальн"]
            .iter()
            .any(|marker| lower.contains(marker));
        Some(if below_min {
            FailureReason::BelowMinPrice { messages }
        } else {
            FailureReason::Rejected { messages }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_uses_wildberries_field_names() {
        let body = serde_json::to_value(UploadTaskRequest {
            data: vec![PriceUpdate {
                nm_id: 123,
                price: 2000,
                discount: 25,
            }],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"data": [{"nmID": 123, "price": 2000, "discount": 25}]})
        );
    }

    #[test]
    fn task_id_accepts_numbers_and_strings() {
        let numeric: UploadTaskResponse =
            serde_json::from_str(r#"{"data":{"id":4242,"alreadyExists":false},"error":false}"#)
                .unwrap();
        assert_eq!(numeric.task_id().as_deref(), Some("4242"));

        let missing: UploadTaskResponse =
            serde_json::from_str(r#"{"data":null,"error":true,"errorText":"bad"}"#).unwrap();
        assert_eq!(missing.task_id(), None);
        assert_eq!(missing.error_text.as_deref(), Some("bad"));
    }

    #[test]
    fn task_status_codes() {
        let status = |raw: &str| serde_json::from_str::<TaskHistoryResponse>(raw).unwrap().status();
        assert_eq!(status(r#"{"data":{"uploadID":1,"status":3}}"#), TaskStatus::Processed);
        assert_eq!(
            status(r#"{"data":{"uploadID":1,"status":5}}"#),
            TaskStatus::ProcessedWithErrors
        );
        assert_eq!(status(r#"{"data":{"uploadID":1,"status":4}}"#), TaskStatus::Canceled);
        assert_eq!(status(r#"{"data":null,"error":false}"#), TaskStatus::Pending);
    }

    #[test]
    fn task_item_errors_are_classified() {
        let good = |error: &str| TaskGood {
            nm_id: Some(1),
            error_text: Some(error.to_string()),
        };
        assert!(good("").failure().is_none());
        assert!(good("Цена ниже минимальной").failure().unwrap().is_floor_violation());
        assert!(good("new price is below the minimum price")
            .failure()
            .unwrap()
            .is_floor_violation());
        assert!(matches!(
            good("nmID not found").failure(),
            Some(FailureReason::Rejected { .. })
        ));
    }
}
