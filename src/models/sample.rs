// Raw cumulative counters for one container, as returned by a stats source.

/// One CPU accounting reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuReading {
    /// Cumulative CPU time consumed by the container (ns).
    pub container_total: u64,
    /// Cumulative CPU time consumed by the whole host (ns).
    pub host_total: u64,
    /// Explicit online CPU count; 0 when not reported.
    pub online_cpus: u32,
    /// Length of the per-core usage breakdown; 0 when not reported.
    pub per_core: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Block I/O entry keyed by operation label ("Read", "write", "Async", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlkioEntry {
    pub op: String,
    pub value: u64,
}

/// Point-in-time sample; every field degrades to zero/empty when unreported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCounterSample {
    pub cpu: CpuReading,
    /// Prior reading; `None` on a container's first sample.
    pub precpu: Option<CpuReading>,
    pub memory_usage: u64,
    /// 0 means unset (unbounded).
    pub memory_limit: u64,
    pub networks: Vec<InterfaceCounters>,
    pub blkio: Vec<BlkioEntry>,
    pub pids: u64,
}
