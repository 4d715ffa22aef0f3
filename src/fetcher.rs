// Bounded parallel stats fetch: one spawned worker per container, admitted through a
// counting semaphore, each call under its own deadline.
// Each worker's return value is its result slot; handles are kept in submission order
// so results come back by index regardless of completion order.

use crate::error::FetchError;
use crate::models::RawCounterSample;
use crate::source::StatsSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default ceiling on simultaneous in-flight stats calls.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Default per-call deadline, independent of any batch deadline.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(1500);

pub type FetchOutcome = Result<RawCounterSample, FetchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetcherConfig {
    pub max_concurrency: usize,
    pub fetch_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

pub struct BoundedFetcher {
    source: Arc<dyn StatsSource>,
    config: FetcherConfig,
}

impl BoundedFetcher {
    pub fn new(source: Arc<dyn StatsSource>, config: FetcherConfig) -> Self {
        Self { source, config }
    }

    /// Fetch one sample per id. Always returns exactly `ids.len()` outcomes, in `ids` order.
    ///
    /// Failures stay in their own slot. Once `cancel` fires no new workers are admitted;
    /// in-flight workers unwind at their next await and report `FetchError::Cancelled`.
    pub async fn fetch_all(&self, ids: &[String], cancel: &CancellationToken) -> Vec<FetchOutcome> {
        if ids.is_empty() {
            return Vec::new();
        }
        let limit = self.config.max_concurrency.clamp(1, ids.len());
        let gate = Arc::new(Semaphore::new(limit));

        let mut slots: Vec<Option<JoinHandle<FetchOutcome>>> = Vec::with_capacity(ids.len());
        for id in ids {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = gate.clone().acquire_owned() => permit.ok(),
            };
            let Some(permit) = permit else {
                slots.push(None);
                continue;
            };

            let source = self.source.clone();
            let id = id.clone();
            let cancel = cancel.clone();
            let deadline = self.config.fetch_timeout;
            slots.push(Some(tokio::spawn(async move {
                let _permit = permit;
                fetch_one(source.as_ref(), &id, deadline, &cancel).await
            })));
        }

        let mut outcomes = Vec::with_capacity(ids.len());
        for (id, slot) in ids.iter().zip(slots) {
            let outcome = match slot {
                None => Err(FetchError::Cancelled),
                Some(handle) => handle.await.unwrap_or_else(|e| {
                    Err(FetchError::Transport(format!("fetch worker failed: {e}")))
                }),
            };
            if let Err(e) = &outcome {
                debug!(container_id = %id, error = %e, "stats fetch failed");
            }
            outcomes.push(outcome);
        }
        outcomes
    }
}

async fn fetch_one(
    source: &dyn StatsSource,
    id: &str,
    deadline: Duration,
    cancel: &CancellationToken,
) -> FetchOutcome {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(FetchError::Cancelled),
        res = tokio::time::timeout(deadline, source.fetch_once(id)) => {
            res.unwrap_or(Err(FetchError::Timeout(deadline)))
        }
    }
}
