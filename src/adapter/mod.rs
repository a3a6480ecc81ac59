//! Marketplace adapters.
//!
//! Each submodule speaks one marketplace's HTTP API and implements
//! [`MarketplaceAdapter`](crate::marketplace::MarketplaceAdapter).

pub mod ozon;
pub mod wildberries;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::{MarketplaceError, Result};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 512;

pub(crate) fn build_http_client(timeout_ms: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?)
}

/// Turn a non-2xx response into a [`MarketplaceError::Transport`].
pub(crate) async fn ensure_success(marketplace: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response_text(response).await;
    Err(MarketplaceError::Transport {
        marketplace,
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Response body for error reporting, truncated.
pub(crate) async fn response_text(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    truncate(text.trim(), MAX_ERROR_BODY)
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
