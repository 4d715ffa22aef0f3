// Container identity as reported by the lister

use serde::Serialize;

/// Docker container lifecycle state; serializes to lowercase JSON (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Unknown,
}

impl ContainerState {
    /// Parse from Docker API state string (e.g. "running", "exited").
    pub fn from_docker(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "created" => ContainerState::Created,
            "running" => ContainerState::Running,
            "paused" => ContainerState::Paused,
            "restarting" => ContainerState::Restarting,
            "removing" => ContainerState::Removing,
            "exited" => ContainerState::Exited,
            "dead" => ContainerState::Dead,
            _ => ContainerState::Unknown,
        }
    }

    /// Lowercase token as used by the Docker API. `Unknown` maps to an empty token.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
            ContainerState::Unknown => "",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }
}

/// One container as seen by the lister for a single collection cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerIdentity {
    pub id: String,
    pub name: String,
    pub state: ContainerState,
    /// Human status string, e.g. "Up 3 minutes". May be empty.
    pub status: String,
    /// Names of attached networks, sorted.
    pub networks: Vec<String>,
}

impl ContainerIdentity {
    /// Status to display: the human status when set, else the state token, else empty.
    pub fn display_status(&self) -> String {
        if !self.status.is_empty() {
            self.status.clone()
        } else {
            self.state.as_str().to_string()
        }
    }
}

/// First reported name without Docker's leading slash; empty when there is none.
pub fn derive_name(names: &[String]) -> String {
    names
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default()
}
