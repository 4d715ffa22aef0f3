// Shared test fakes for the lister and stats source
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use whale::error::{FetchError, ListError};
use whale::models::{ContainerIdentity, ContainerState, CpuReading, RawCounterSample};
use whale::source::{ContainerLister, StatsSource};

pub fn container(id: &str, state: ContainerState, status: &str) -> ContainerIdentity {
    ContainerIdentity {
        id: id.to_string(),
        name: format!("{id}-name"),
        state,
        status: status.to_string(),
        networks: vec![],
    }
}

pub fn running(id: &str) -> ContainerIdentity {
    container(id, ContainerState::Running, "Up 1 minute")
}

/// cpuDelta = 50, systemDelta = 500, 4 online CPUs -> 40%.
pub fn forty_percent_sample() -> RawCounterSample {
    RawCounterSample {
        cpu: CpuReading {
            container_total: 150,
            host_total: 1500,
            online_cpus: 4,
            per_core: 0,
        },
        precpu: Some(CpuReading {
            container_total: 100,
            host_total: 1000,
            online_cpus: 4,
            per_core: 0,
        }),
        memory_usage: 104_857_600,
        memory_limit: 2_147_483_648,
        pids: 7,
        ..Default::default()
    }
}

/// Lister returning a fixed list, or failing; counts calls.
pub struct FakeLister {
    containers: Vec<ContainerIdentity>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeLister {
    pub fn new(containers: Vec<ContainerIdentity>) -> Self {
        Self {
            containers,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            containers: vec![],
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContainerLister for FakeLister {
    async fn list(&self, include_stopped: bool) -> Result<Vec<ContainerIdentity>, ListError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ListError("Cannot connect to the Docker daemon".into()));
        }
        Ok(self
            .containers
            .iter()
            .filter(|c| include_stopped || c.state.is_running())
            .cloned()
            .collect())
    }
}

#[derive(Clone)]
pub enum Behavior {
    Sample(RawCounterSample),
    Fail,
    /// Never answers; only a deadline or cancellation ends the call.
    Hang,
    Delay(Duration, RawCounterSample),
}

/// Stats source with scripted per-container behavior. Unscripted ids get `default`.
/// Tracks concurrent in-flight calls and every id it was asked for.
pub struct ScriptedSource {
    script: HashMap<String, Behavior>,
    default: Behavior,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requested: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(default: Behavior) -> Self {
        Self {
            script: HashMap::new(),
            default,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with(mut self, id: &str, behavior: Behavior) -> Self {
        self.script.insert(id.to_string(), behavior);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatsSource for ScriptedSource {
    async fn fetch_once(&self, container_id: &str) -> Result<RawCounterSample, FetchError> {
        self.requested.lock().unwrap().push(container_id.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let behavior = self
            .script
            .get(container_id)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        match behavior {
            Behavior::Sample(s) => Ok(s),
            Behavior::Fail => Err(FetchError::Transport("connection reset by peer".into())),
            Behavior::Hang => std::future::pending().await,
            Behavior::Delay(d, s) => {
                tokio::time::sleep(d).await;
                Ok(s)
            }
        }
    }
}

pub fn collector(lister: Arc<FakeLister>, source: Arc<ScriptedSource>) -> whale::collector::Collector {
    whale::collector::Collector::new(lister, source, whale::fetcher::FetcherConfig::default())
}
