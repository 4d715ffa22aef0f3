// One collection cycle: list containers, fetch stats for the running subset, assemble
// snapshots in the lister's order.

use crate::error::CollectError;
use crate::fetcher::{BoundedFetcher, FetchOutcome, FetcherConfig};
use crate::models::{ContainerIdentity, Snapshot};
use crate::normalize::normalize;
use crate::source::{ContainerLister, StatsSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct Collector {
    lister: Arc<dyn ContainerLister>,
    fetcher: BoundedFetcher,
}

impl Collector {
    pub fn new(
        lister: Arc<dyn ContainerLister>,
        source: Arc<dyn StatsSource>,
        config: FetcherConfig,
    ) -> Self {
        Self {
            lister,
            fetcher: BoundedFetcher::new(source, config),
        }
    }

    /// One-shot collection. Fails only when listing fails or is cancelled; stats
    /// failures become `ERROR` snapshots.
    pub async fn collect(
        &self,
        include_stopped: bool,
        cancel: &CancellationToken,
    ) -> Result<Vec<Snapshot>, CollectError> {
        let identities = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CollectError::Cancelled),
            listed = self.lister.list(include_stopped) => listed?,
        };

        let running: Vec<usize> = identities
            .iter()
            .enumerate()
            .filter(|(_, c)| c.state.is_running())
            .map(|(i, _)| i)
            .collect();
        let ids: Vec<String> = running.iter().map(|&i| identities[i].id.clone()).collect();

        let outcomes = self.fetcher.fetch_all(&ids, cancel).await;
        let snapshots = assemble(&identities, running.into_iter().zip(outcomes));

        debug!(
            total = snapshots.len(),
            running = ids.len(),
            failed = snapshots.iter().filter(|s| s.is_error()).count(),
            "collection cycle assembled"
        );
        Ok(snapshots)
    }
}

/// Join identities with fetch outcomes keyed by identity index.
///
/// Identities without an outcome get all-zero metrics and keep their listed status.
/// Failed outcomes force status `ERROR` with blank metrics.
pub fn assemble(
    identities: &[ContainerIdentity],
    outcomes: impl IntoIterator<Item = (usize, FetchOutcome)>,
) -> Vec<Snapshot> {
    let mut snapshots: Vec<Snapshot> = identities.iter().map(Snapshot::idle).collect();
    for (idx, outcome) in outcomes {
        let Some(identity) = identities.get(idx) else {
            continue;
        };
        snapshots[idx] = match outcome {
            Ok(sample) => Snapshot::sampled(identity, normalize(sample)),
            Err(_) => Snapshot::failed(identity),
        };
    }
    snapshots
}
