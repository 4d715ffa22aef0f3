// Domain models

mod container;
mod sample;
mod snapshot;

pub use container::{ContainerIdentity, ContainerState, derive_name};
pub use sample::{BlkioEntry, CpuReading, InterfaceCounters, RawCounterSample};
pub use snapshot::{NormalizedMetrics, STATUS_ERROR, Snapshot};
