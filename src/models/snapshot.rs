// Normalized metrics and per-cycle snapshots

use super::ContainerIdentity;

/// Status sentinel for running containers whose stats could not be fetched.
pub const STATUS_ERROR: &str = "ERROR";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizedMetrics {
    pub cpu_percent: f64,
    pub mem_usage_bytes: u64,
    pub mem_limit_bytes: u64,
    pub mem_percent: f64,
    pub net_rx_bytes: u64,
    pub net_tx_bytes: u64,
    pub block_read_bytes: u64,
    pub block_write_bytes: u64,
    pub pids: u64,
}

/// One container's result for one collection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    pub status: String,
    /// `None` when metrics could not be obtained (status is then `ERROR`).
    pub metrics: Option<NormalizedMetrics>,
}

impl Snapshot {
    /// Snapshot with all-zero metrics, used for containers that are not running.
    pub fn idle(identity: &ContainerIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            status: identity.display_status(),
            metrics: Some(NormalizedMetrics::default()),
        }
    }

    pub fn sampled(identity: &ContainerIdentity, metrics: NormalizedMetrics) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            status: identity.display_status(),
            metrics: Some(metrics),
        }
    }

    /// Failure marker: status forced to `ERROR`, metrics left blank.
    pub fn failed(identity: &ContainerIdentity) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            status: STATUS_ERROR.to_string(),
            metrics: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_ERROR)
    }

    pub fn cpu_percent(&self) -> f64 {
        self.metrics.map_or(0.0, |m| m.cpu_percent)
    }

    pub fn mem_percent(&self) -> f64 {
        self.metrics.map_or(0.0, |m| m.mem_percent)
    }
}
