// Collaborator contracts: where identities and raw samples come from.

use crate::error::{FetchError, ListError};
use crate::models::{ContainerIdentity, RawCounterSample};
use async_trait::async_trait;

/// Lists containers in the daemon's order.
#[async_trait]
pub trait ContainerLister: Send + Sync {
    async fn list(&self, include_stopped: bool) -> Result<Vec<ContainerIdentity>, ListError>;
}

/// Fetches one point-in-time sample for a container. Deadlines are applied by the caller.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_once(&self, container_id: &str) -> Result<RawCounterSample, FetchError>;
}
