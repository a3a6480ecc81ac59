//! In-memory stores and a scripted marketplace adapter.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use repricer::domain::{AppliedMultipliers, BasePriceMap, BaseState, PriceCorrection, PriceRecord};
use repricer::error::{MarketplaceError, Result};
use repricer::marketplace::{FailureReason, MarketplaceAdapter, PushFailure, PushReport};
use repricer::store::{BasePriceStore, ConfigDocument, ConfigStore, Stores};

#[derive(Debug, Default)]
pub struct MemoryState {
    pub config: Option<ConfigDocument>,
    pub base_prices: BasePriceMap,
    pub applied: AppliedMultipliers,
    pub config_saves: usize,
    pub base_saves: usize,
}

/// Both stores over one shared state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn with(config: Option<ConfigDocument>, base_prices: BasePriceMap) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                config,
                base_prices,
                ..MemoryState::default()
            })),
        }
    }

    pub fn stores(&self) -> Stores {
        Stores {
            config: Box::new(self.clone()),
            base_prices: Box::new(self.clone()),
        }
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load_config(&self) -> Result<ConfigDocument> {
        Ok(self.state.lock().config.clone().unwrap_or_default())
    }

    async fn save_config(&self, document: &ConfigDocument) -> Result<()> {
        let mut state = self.state.lock();
        state.config = Some(document.clone());
        state.config_saves += 1;
        Ok(())
    }
}

#[async_trait]
impl BasePriceStore for MemoryStore {
    async fn load_base_prices(&self) -> Result<BaseState> {
        let state = self.state.lock();
        Ok(BaseState {
            prices: state.base_prices.clone(),
            applied: state.applied.clone(),
        })
    }

    async fn save_base_prices(&self, saved: &BaseState) -> Result<()> {
        let mut state = self.state.lock();
        state.base_prices = saved.prices.clone();
        state.applied = saved.applied.clone();
        state.base_saves += 1;
        Ok(())
    }
}

/// Adapter returning a fixed snapshot and recording pushes.
#[derive(Clone, Default)]
pub struct ScriptedAdapter {
    pub snapshot: Vec<PriceRecord>,
    pub fail_fetch: bool,
    /// Offers the marketplace refuses as below its minimum price.
    pub refused: Vec<String>,
    pub pushed: Arc<Mutex<Vec<PriceCorrection>>>,
}

impl ScriptedAdapter {
    pub fn new(snapshot: Vec<PriceRecord>) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn refusing(mut self, offer_ids: &[&str]) -> Self {
        self.refused = offer_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn failing() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MarketplaceAdapter for ScriptedAdapter {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_snapshot(&self) -> Result<Vec<PriceRecord>> {
        if self.fail_fetch {
            return Err(MarketplaceError::Transport {
                marketplace: "scripted",
                status: 503,
                message: "unavailable".into(),
            }
            .into());
        }
        Ok(self.snapshot.clone())
    }

    async fn push_corrections(&self, corrections: &[PriceCorrection]) -> Result<PushReport> {
        self.pushed.lock().extend_from_slice(corrections);
        let mut report = PushReport::default();
        for correction in corrections {
            if self.refused.contains(&correction.offer_id) {
                report.failed.push(PushFailure::new(
                    correction.offer_id.clone(),
                    FailureReason::BelowMinPrice {
                        messages: vec!["price is below min_price".into()],
                    },
                ));
            } else {
                report.succeeded.push(correction.offer_id.clone());
            }
        }
        Ok(report)
    }
}
