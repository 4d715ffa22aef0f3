// Refresh loop: collect, hand off, then wait for the next tick or cancellation.

use crate::collector::Collector;
use crate::error::CollectError;
use crate::models::Snapshot;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Default refresh interval for watch mode.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub include_stopped: bool,
    pub interval: Duration,
}

/// Run collection cycles until `cancel` fires (returns `Ok`) or a cycle fails.
///
/// A failed listing or an `on_cycle` error ends the loop with that error; stale data is
/// never re-delivered. Cancellation is observed while idle without waiting for the tick,
/// and a cycle interrupted by cancellation is dropped rather than delivered.
/// With `cancel` already fired on entry, at most one cycle runs.
#[instrument(skip_all, fields(interval_ms = options.interval.as_millis() as u64))]
pub async fn watch<F>(
    collector: &Collector,
    options: WatchOptions,
    cancel: CancellationToken,
    mut on_cycle: F,
) -> anyhow::Result<()>
where
    F: FnMut(Vec<Snapshot>) -> anyhow::Result<()>,
{
    // tokio panics on a zero period
    let mut tick = interval(options.interval.max(Duration::from_millis(1)));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately; the first cycle starts right away.
    tick.tick().await;
    tracing::debug!("watch loop started");

    let mut cycles: u64 = 0;
    loop {
        let snapshots = match collector.collect(options.include_stopped, &cancel).await {
            Ok(s) => s,
            Err(CollectError::Cancelled) => {
                tracing::debug!(cycles, "watch loop cancelled during listing");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        // fetches cut short by cancellation read as ERROR; never hand that cycle out
        if cancel.is_cancelled() {
            tracing::debug!(cycles, "watch loop cancelled during collection");
            return Ok(());
        }
        cycles += 1;
        on_cycle(snapshots)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(cycles, "watch loop cancelled");
                return Ok(());
            }
            _ = tick.tick() => {}
        }
    }
}
