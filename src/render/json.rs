// Machine-friendly JSON output with snake_case keys.

use super::round1;
use crate::models::Snapshot;
use serde::Serialize;
use std::io::Write;

/// One output row. Metric fields are `null` when stats could not be fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRow {
    pub name: String,
    pub id: String,
    pub status: String,
    pub cpu_percent: Option<f64>,
    pub mem_usage: Option<u64>,
    pub mem_limit: Option<u64>,
    pub mem_percent: Option<f64>,
    pub net_rx: Option<u64>,
    pub net_tx: Option<u64>,
    pub block_read: Option<u64>,
    pub block_write: Option<u64>,
    pub pids: Option<u64>,
}

impl From<&Snapshot> for JsonRow {
    fn from(s: &Snapshot) -> Self {
        let m = s.metrics.as_ref();
        Self {
            name: s.name.clone(),
            id: s.id.clone(),
            status: s.status.clone(),
            cpu_percent: m.map(|m| round1(m.cpu_percent)),
            mem_usage: m.map(|m| m.mem_usage_bytes),
            mem_limit: m.map(|m| m.mem_limit_bytes),
            mem_percent: m.map(|m| round1(m.mem_percent)),
            net_rx: m.map(|m| m.net_rx_bytes),
            net_tx: m.map(|m| m.net_tx_bytes),
            block_read: m.map(|m| m.block_read_bytes),
            block_write: m.map(|m| m.block_write_bytes),
            pids: m.map(|m| m.pids),
        }
    }
}

/// Pretty-printed JSON array followed by a newline.
pub fn render_json<W: Write>(snaps: &[Snapshot], w: &mut W) -> anyhow::Result<()> {
    let rows: Vec<JsonRow> = snaps.iter().map(JsonRow::from).collect();
    serde_json::to_writer_pretty(&mut *w, &rows)?;
    writeln!(w)?;
    Ok(())
}
