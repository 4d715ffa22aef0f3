// Docker lister and one-shot stats source via bollard

mod stats;

use crate::error::{FetchError, ListError};
use crate::models::{ContainerIdentity, ContainerState, RawCounterSample, derive_name};
use crate::source::{ContainerLister, StatsSource};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::ContainerSummary;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use tracing::instrument;

pub use stats::sample_from_response;

#[derive(Clone)]
pub struct DockerRepo {
    docker: Docker,
}

impl DockerRepo {
    /// Connect using local defaults (unix socket, or `DOCKER_HOST` when set).
    pub fn connect() -> anyhow::Result<Self> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker })
    }

    /// Fail fast when the daemon is unreachable.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.docker.ping().await?;
        Ok(())
    }
}

#[async_trait]
impl ContainerLister for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "list_containers"))]
    async fn list(&self, include_stopped: bool) -> Result<Vec<ContainerIdentity>, ListError> {
        let options = ListContainersOptions {
            all: include_stopped,
            ..Default::default()
        };
        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| ListError(e.to_string()))?;
        Ok(containers.into_iter().map(identity_from_summary).collect())
    }
}

#[async_trait]
impl StatsSource for DockerRepo {
    #[instrument(skip(self), fields(repo = "docker", operation = "stats"))]
    async fn fetch_once(&self, container_id: &str) -> Result<RawCounterSample, FetchError> {
        // stream=false: the daemon samples twice and returns one document with precpu filled in.
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut stream = self.docker.stats(container_id, Some(options));
        match stream.next().await {
            Some(Ok(response)) => Ok(sample_from_response(&response)),
            Some(Err(e)) => Err(classify(&e)),
            None => Err(FetchError::Decode("empty stats response".into())),
        }
    }
}

fn identity_from_summary(c: ContainerSummary) -> ContainerIdentity {
    let state = c.state.as_ref().map(|s| s.to_string()).unwrap_or_default();
    let mut networks: Vec<String> = c
        .network_settings
        .and_then(|ns| ns.networks)
        .map(|n| n.into_keys().collect())
        .unwrap_or_default();
    networks.sort();
    ContainerIdentity {
        id: c.id.unwrap_or_default(),
        name: derive_name(c.names.as_deref().unwrap_or_default()),
        state: ContainerState::from_docker(&state),
        status: c.status.unwrap_or_default(),
        networks,
    }
}

fn classify(e: &bollard::errors::Error) -> FetchError {
    use bollard::errors::Error;
    match e {
        Error::JsonSerdeError { .. } | Error::JsonDataError { .. } => {
            FetchError::Decode(e.to_string())
        }
        _ => FetchError::Transport(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{ContainerSummaryNetworkSettings, EndpointSettings};
    use std::collections::HashMap;

    #[test]
    fn identity_from_summary_maps_fields() {
        let mut nets = HashMap::new();
        nets.insert("frontend".to_string(), EndpointSettings::default());
        nets.insert("backend".to_string(), EndpointSettings::default());
        let summary = ContainerSummary {
            id: Some("abc123".into()),
            names: Some(vec!["/web".into()]),
            status: Some("Up 3 minutes".into()),
            network_settings: Some(ContainerSummaryNetworkSettings {
                networks: Some(nets),
                ..Default::default()
            }),
            ..Default::default()
        };
        let c = identity_from_summary(summary);
        assert_eq!(c.id, "abc123");
        assert_eq!(c.name, "web");
        assert_eq!(c.status, "Up 3 minutes");
        assert_eq!(c.networks, ["backend", "frontend"]);
    }

    #[test]
    fn identity_from_empty_summary_degrades_to_defaults() {
        let c = identity_from_summary(ContainerSummary::default());
        assert_eq!(c.id, "");
        assert_eq!(c.name, "");
        assert_eq!(c.state, ContainerState::Unknown);
        assert!(c.networks.is_empty());
    }
}
