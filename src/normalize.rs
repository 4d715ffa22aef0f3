// Turn raw cumulative counters into comparable percentages and byte totals.
// Pure functions: no I/O, no shared state.

use crate::models::{BlkioEntry, CpuReading, InterfaceCounters, NormalizedMetrics, RawCounterSample};

/// Normalize one sample. Consumes the sample; it does not outlive its fetch.
pub fn normalize(sample: RawCounterSample) -> NormalizedMetrics {
    let (mem_usage_bytes, mem_limit_bytes, mem_percent) =
        memory(sample.memory_usage, sample.memory_limit);
    let (net_rx_bytes, net_tx_bytes) = network(&sample.networks);
    let (block_read_bytes, block_write_bytes) = block_io(&sample.blkio);

    NormalizedMetrics {
        cpu_percent: sample
            .precpu
            .as_ref()
            .map_or(0.0, |pre| cpu_percent(&sample.cpu, pre)),
        mem_usage_bytes,
        mem_limit_bytes,
        mem_percent,
        net_rx_bytes,
        net_tx_bytes,
        block_read_bytes,
        block_write_bytes,
        pids: sample.pids,
    }
}

/// `(cpuDelta / systemDelta) * onlineCPUs * 100`, or 0 when either delta is not positive.
pub fn cpu_percent(cur: &CpuReading, pre: &CpuReading) -> f64 {
    let cpu_delta = cur.container_total as i128 - pre.container_total as i128;
    let system_delta = cur.host_total as i128 - pre.host_total as i128;
    if cpu_delta <= 0 || system_delta <= 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * online_cpus(cur) as f64 * 100.0
}

/// Explicit online count, then per-core breakdown length, then 1.
pub fn online_cpus(reading: &CpuReading) -> u32 {
    if reading.online_cpus > 0 {
        reading.online_cpus
    } else if reading.per_core > 0 {
        u32::try_from(reading.per_core).unwrap_or(u32::MAX)
    } else {
        1
    }
}

/// Returns `(usage, limit, percent)`. Percent is 0 when either input is 0.
pub fn memory(usage: u64, limit: u64) -> (u64, u64, f64) {
    if limit == 0 || usage == 0 {
        return (usage, limit, 0.0);
    }
    (usage, limit, usage as f64 / limit as f64 * 100.0)
}

/// Sum of rx/tx bytes over every interface.
pub fn network(interfaces: &[InterfaceCounters]) -> (u64, u64) {
    interfaces.iter().fold((0u64, 0u64), |(rx, tx), i| {
        (rx.saturating_add(i.rx_bytes), tx.saturating_add(i.tx_bytes))
    })
}

/// Read/write byte totals; labels other than read/write are ignored.
pub fn block_io(entries: &[BlkioEntry]) -> (u64, u64) {
    let mut read = 0u64;
    let mut write = 0u64;
    for e in entries {
        if e.op.eq_ignore_ascii_case("read") {
            read = read.saturating_add(e.value);
        } else if e.op.eq_ignore_ascii_case("write") {
            write = write.saturating_add(e.value);
        }
    }
    (read, write)
}
