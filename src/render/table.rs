// Plain-text tables with severity colouring.

use super::{humanize_bytes, truncate_id, truncate_name};
use crate::models::{ContainerIdentity, NormalizedMetrics, Snapshot};
use crossterm::style::Stylize;
use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Write};

const DASH: &str = "—";
const GAP: &str = "  ";
const STATUS_MAX: usize = 24;
const NAME_MAX: usize = 25;

/// Eighth-block partials for the last bar cell.
const BAR_RAMP: [char; 8] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉'];
/// Space plus brackets around a bar.
const BAR_FRAME: usize = 3;

const CONTAINER_HEADERS: [&str; 8] = [
    "NAME", "ID", "STATUS", "CPU %", "MEM", "NET I/O", "BLOCK I/O", "PIDS",
];
const CONTAINER_RIGHT: [bool; 8] = [false, false, false, true, false, false, false, true];

const NETWORK_HEADERS: [&str; 4] = ["NETWORK", "NAME", "ID", "STATUS"];
const NETWORK_RIGHT: [bool; 4] = [false; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Good,
    Warn,
    Bad,
    Accent,
}

struct Cell {
    text: String,
    tone: Tone,
}

impl Cell {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    pub no_trunc: bool,
    pub color: bool,
    /// Terminal width in columns, when known.
    pub width: Option<u16>,
}

impl TableOptions {
    /// Colour and width detection from stdout.
    pub fn for_stdout(no_trunc: bool) -> Self {
        let tty = io::stdout().is_terminal();
        Self {
            no_trunc,
            color: tty,
            width: if tty {
                crossterm::terminal::size().ok().map(|(w, _)| w)
            } else {
                None
            },
        }
    }
}

/// Container table: NAME, ID, STATUS, CPU %, MEM, NET I/O, BLOCK I/O, PIDS.
/// `ERROR` rows leave every metric cell blank; zero values print a dash.
pub fn render_table<W: Write>(
    snaps: &[Snapshot],
    opts: &TableOptions,
    w: &mut W,
) -> io::Result<()> {
    let title = format!("whale — {} containers — {}", snaps.len(), now_kitchen());
    writeln!(w, "{}", paint(&title, Tone::Plain, opts.color, true))?;

    let plain_rows: Vec<Vec<Cell>> = snaps
        .iter()
        .map(|s| snapshot_row(s, opts.no_trunc, 0))
        .collect();
    let bar = bar_width(&plain_rows, opts.width);
    let mut rows = if bar == 0 {
        plain_rows
    } else {
        snaps
            .iter()
            .map(|s| snapshot_row(s, opts.no_trunc, bar))
            .collect()
    };
    let name_max = fit_width(&CONTAINER_HEADERS, &rows, 0, opts.width, NAME_MAX);
    for row in &mut rows {
        row[0].text = truncate_name(&row[0].text, opts.no_trunc, name_max);
    }

    write_grid(w, &CONTAINER_HEADERS, &CONTAINER_RIGHT, &rows, opts.color)?;
    if snaps.is_empty() {
        writeln!(w, "no containers")?;
    }
    Ok(())
}

/// Containers grouped by network; the network name is printed once per group.
pub fn render_networks<W: Write>(
    groups: &BTreeMap<String, Vec<ContainerIdentity>>,
    opts: &TableOptions,
    w: &mut W,
) -> io::Result<()> {
    let title = format!("whale — networks: {} — {}", groups.len(), now_kitchen());
    writeln!(w, "{}", paint(&title, Tone::Plain, opts.color, true))?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (network, members) in groups {
        for (i, c) in members.iter().enumerate() {
            let net = if i == 0 { network.as_str() } else { "" };
            let status = c.display_status();
            rows.push(vec![
                Cell::new(truncate_name(net, false, 24), Tone::Accent),
                Cell::plain(c.name.clone()),
                Cell::plain(truncate_id(&c.id, opts.no_trunc)),
                Cell::new(truncate_name(&status, false, STATUS_MAX), status_tone(&status)),
            ]);
        }
    }
    let name_max = fit_width(&NETWORK_HEADERS, &rows, 1, opts.width, 40);
    for row in &mut rows {
        row[1].text = truncate_name(&row[1].text, opts.no_trunc, name_max);
    }

    write_grid(w, &NETWORK_HEADERS, &NETWORK_RIGHT, &rows, opts.color)?;
    if groups.is_empty() {
        writeln!(w, "no networks")?;
    }
    Ok(())
}

fn snapshot_row(s: &Snapshot, no_trunc: bool, bar: usize) -> Vec<Cell> {
    let mut row = vec![
        Cell::plain(s.name.clone()),
        Cell::plain(truncate_id(&s.id, no_trunc)),
        Cell::new(
            truncate_name(&s.status, false, STATUS_MAX),
            status_tone(&s.status),
        ),
    ];
    match s.metrics.filter(|_| !s.is_error()) {
        None => row.extend((0..5).map(|_| Cell::plain(""))),
        Some(m) => {
            row.push(percent_cell(m.cpu_percent, bar));
            row.push(memory_cell(&m, bar));
            row.push(Cell::plain(printable_io(m.net_rx_bytes, m.net_tx_bytes)));
            row.push(Cell::plain(printable_io(m.block_read_bytes, m.block_write_bytes)));
            row.push(Cell::plain(if m.pids > 0 {
                m.pids.to_string()
            } else {
                DASH.to_string()
            }));
        }
    }
    row
}

fn percent_cell(pct: f64, bar: usize) -> Cell {
    if pct == 0.0 {
        return Cell::plain(DASH);
    }
    Cell::new(with_bar(format!("{:.1}", pct), pct, bar), percent_tone(pct))
}

fn memory_cell(m: &NormalizedMetrics, bar: usize) -> Cell {
    let (usage, limit) = if m.mem_limit_bytes > 0 {
        (humanize_bytes(m.mem_usage_bytes), humanize_bytes(m.mem_limit_bytes))
    } else {
        (DASH.to_string(), DASH.to_string())
    };
    if m.mem_percent == 0.0 {
        return Cell::plain(format!("{usage} / {limit}"));
    }
    Cell::new(
        with_bar(
            format!("{usage} / {limit}  {:.1}%", m.mem_percent),
            m.mem_percent,
            bar,
        ),
        percent_tone(m.mem_percent),
    )
}

fn with_bar(text: String, pct: f64, bar: usize) -> String {
    if bar == 0 {
        return text;
    }
    format!("{text} {}", percentage_bar(pct, bar))
}

/// `[████▌     ]` with `width` cells; `pct` is clamped to 0..=100.
fn percentage_bar(pct: f64, width: usize) -> String {
    let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
    let filled = pct / 100.0 * width as f64;
    let full = (filled as usize).min(width);
    let frac = filled - full as f64;
    let idx = ((frac * (BAR_RAMP.len() - 1) as f64 + 0.5) as usize).min(BAR_RAMP.len() - 1);

    let mut out = String::with_capacity(width * 3 + 2);
    out.push('[');
    out.extend(std::iter::repeat_n('█', full));
    if full < width {
        out.push(BAR_RAMP[idx]);
        out.extend(std::iter::repeat_n(' ', width - full - 1));
    }
    out.push(']');
    out
}

/// Bar cells for the CPU and MEM columns: 10, 8, 4 or 2 by terminal width, then
/// shrunk until the table fits with NAME at its default width. None off a terminal.
fn bar_width(rows: &[Vec<Cell>], terminal: Option<u16>) -> usize {
    let Some(terminal) = terminal else {
        return 0;
    };
    let terminal = terminal as usize;
    let mut bar = match terminal {
        t if t > 120 => 10,
        t if t > 100 => 8,
        t if t > 80 => 4,
        _ => 2,
    };
    let widths = column_widths(&CONTAINER_HEADERS, rows);
    let plain: usize = widths[0].min(NAME_MAX)
        + widths[1..].iter().sum::<usize>()
        + GAP.len() * (widths.len() - 1);
    while bar > 0 && plain + 2 * (bar + BAR_FRAME) > terminal {
        bar -= 1;
    }
    bar
}

fn printable_io(rx: u64, tx: u64) -> String {
    if rx == 0 && tx == 0 {
        return DASH.to_string();
    }
    format!("{} / {}", humanize_bytes(rx), humanize_bytes(tx))
}

fn percent_tone(pct: f64) -> Tone {
    if pct >= 80.0 {
        Tone::Bad
    } else if pct >= 50.0 {
        Tone::Warn
    } else {
        Tone::Good
    }
}

fn status_tone(status: &str) -> Tone {
    let s = status.to_lowercase();
    if s == "error" {
        Tone::Bad
    } else if s.contains("up") || s.contains("running") {
        Tone::Good
    } else if s.contains("paused") {
        Tone::Warn
    } else if s.contains("exit") || s.contains("dead") || s.contains("stopped") {
        Tone::Bad
    } else {
        Tone::Plain
    }
}

/// Width for the flexible column: what the terminal leaves after the other columns,
/// clamped to 12..=60, or `fallback` when the width is unknown.
fn fit_width(
    headers: &[&str],
    rows: &[Vec<Cell>],
    flex: usize,
    terminal: Option<u16>,
    fallback: usize,
) -> usize {
    let Some(terminal) = terminal else {
        return fallback;
    };
    let fixed: usize = column_widths(headers, rows)
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != flex)
        .map(|(_, w)| w + GAP.len())
        .sum();
    (terminal as usize).saturating_sub(fixed).clamp(12, 60)
}

fn column_widths(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.text.chars().count());
        }
    }
    widths
}

fn write_grid<W: Write>(
    w: &mut W,
    headers: &[&str],
    right: &[bool],
    rows: &[Vec<Cell>],
    color: bool,
) -> io::Result<()> {
    let widths = column_widths(headers, rows);
    let header: Vec<Cell> = headers.iter().map(|h| Cell::plain(*h)).collect();
    write_line(w, &header, &widths, right, color, true)?;
    for row in rows {
        write_line(w, row, &widths, right, color, false)?;
    }
    Ok(())
}

fn write_line<W: Write>(
    w: &mut W,
    cells: &[Cell],
    widths: &[usize],
    right: &[bool],
    color: bool,
    bold: bool,
) -> io::Result<()> {
    let last = cells.len().saturating_sub(1);
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        // pad before styling: escape codes would skew the width
        let padded = if right.get(i).copied().unwrap_or(false) {
            format!("{:>width$}", cell.text, width = width)
        } else if i == last {
            cell.text.clone()
        } else {
            format!("{:<width$}", cell.text, width = width)
        };
        line.push_str(&paint(&padded, cell.tone, color, bold));
        if i != last {
            line.push_str(GAP);
        }
    }
    writeln!(w, "{}", line.trim_end())
}

fn paint(text: &str, tone: Tone, color: bool, bold: bool) -> String {
    if !color {
        return text.to_string();
    }
    let styled = match tone {
        Tone::Plain => text.stylize(),
        Tone::Good => text.green(),
        Tone::Warn => text.yellow(),
        Tone::Bad => text.red(),
        Tone::Accent => text.cyan(),
    };
    if bold {
        styled.bold().to_string()
    } else {
        styled.to_string()
    }
}

fn now_kitchen() -> String {
    chrono::Local::now().format("%-I:%M%p").to_string()
}
