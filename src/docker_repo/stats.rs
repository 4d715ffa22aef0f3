// Map the raw Docker stats API response onto RawCounterSample.

use crate::models::{BlkioEntry, CpuReading, InterfaceCounters, RawCounterSample};
use bollard::models::{ContainerCpuStats, ContainerStatsResponse};

/// Convert a Docker stats response. Missing sections become zero/empty, never an error.
pub fn sample_from_response(s: &ContainerStatsResponse) -> RawCounterSample {
    let memory_usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let memory_limit = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);

    let mut networks: Vec<InterfaceCounters> = s
        .networks
        .as_ref()
        .map(|n| {
            n.iter()
                .map(|(name, v)| InterfaceCounters {
                    name: name.clone(),
                    rx_bytes: v.rx_bytes.unwrap_or(0),
                    tx_bytes: v.tx_bytes.unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();
    networks.sort_by(|a, b| a.name.cmp(&b.name));

    let blkio = s
        .blkio_stats
        .as_ref()
        .and_then(|b| b.io_service_bytes_recursive.as_ref())
        .map(|entries| {
            entries
                .iter()
                .map(|e| BlkioEntry {
                    op: e.op.clone().unwrap_or_default(),
                    value: e.value.unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default();

    RawCounterSample {
        cpu: s.cpu_stats.as_ref().map(cpu_reading).unwrap_or_default(),
        // the daemon zero-fills precpu_stats on the first read; that is no prior reading
        precpu: s
            .precpu_stats
            .as_ref()
            .map(cpu_reading)
            .filter(|r| r.host_total > 0),
        memory_usage,
        memory_limit,
        networks,
        blkio,
        pids: s.pids_stats.as_ref().and_then(|p| p.current).unwrap_or(0),
    }
}

fn cpu_reading(stats: &ContainerCpuStats) -> CpuReading {
    let usage = stats.cpu_usage.as_ref();
    CpuReading {
        container_total: usage.and_then(|u| u.total_usage).unwrap_or(0),
        host_total: stats.system_cpu_usage.unwrap_or(0),
        online_cpus: stats.online_cpus.unwrap_or(0),
        per_core: usage
            .and_then(|u| u.percpu_usage.as_ref())
            .map_or(0, |p| p.len()),
    }
}
