// Presentation: sorting, truncation, table/JSON output, screen clearing.

mod json;
mod table;

pub use json::{JsonRow, render_json};
pub use table::{TableOptions, render_networks, render_table};

use crate::models::Snapshot;
use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Cpu,
    Mem,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// CPU and memory sort descending (blank counts as 0); name ascending, case-insensitive.
pub fn sort_snapshots(snaps: &mut [Snapshot], key: SortKey) {
    match key {
        SortKey::Cpu => snaps.sort_by(|a, b| b.cpu_percent().total_cmp(&a.cpu_percent())),
        SortKey::Mem => snaps.sort_by(|a, b| b.mem_percent().total_cmp(&a.mem_percent())),
        SortKey::Name => snaps.sort_by_key(|s| s.name.to_lowercase()),
    }
}

/// Docker-style 12-char short id unless `no_trunc`.
pub fn truncate_id(id: &str, no_trunc: bool) -> String {
    if no_trunc {
        return id.to_string();
    }
    id.chars().take(12).collect()
}

/// Cut to `max` chars with a trailing ellipsis; `max == 0` means 25.
pub fn truncate_name(name: &str, no_trunc: bool, max: usize) -> String {
    let max = if max == 0 { 25 } else { max };
    if no_trunc || name.chars().count() <= max {
        return name.to_string();
    }
    if max == 1 {
        return name.chars().take(1).collect();
    }
    let mut out: String = name.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// IEC units with two decimals (KiB, MiB, GiB, TiB); plain bytes below 1 KiB.
pub fn humanize_bytes(b: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;
    match b {
        b if b >= TIB => format!("{:.2}TiB", b as f64 / TIB as f64),
        b if b >= GIB => format!("{:.2}GiB", b as f64 / GIB as f64),
        b if b >= MIB => format!("{:.2}MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.2}KiB", b as f64 / KIB as f64),
        b => format!("{}B", b),
    }
}

/// Round to one decimal place for machine output.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Clear the terminal and move the cursor home.
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    crossterm::queue!(
        w,
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
        crossterm::cursor::MoveTo(0, 0)
    )?;
    w.flush()
}
