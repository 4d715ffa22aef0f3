use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;
use whale::collector::Collector;
use whale::config::AppConfig;
use whale::docker_repo::DockerRepo;
use whale::networks::group_by_network;
use whale::render::{self, OutputFormat, SortKey, TableOptions};
use whale::source::ContainerLister;
use whale::watch::{WatchOptions, watch};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser, Debug)]
#[command(name = "whale", version, about = "Resource stats for Docker containers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Include stopped containers in the list
    #[arg(long, global = true)]
    all: bool,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortKey::Cpu, global = true)]
    sort: SortKey,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Do not truncate container IDs and names
    #[arg(long, global = true)]
    no_trunc: bool,

    /// Continuously refresh until interrupted
    #[arg(long, global = true)]
    watch: bool,

    /// Refresh interval for --watch (e.g. "2s", "500ms")
    #[arg(long, value_parser = parse_interval, global = true)]
    interval: Option<Duration>,
}

/// humantime duration that must be non-zero.
fn parse_interval(s: &str) -> Result<Duration, String> {
    let d = humantime::parse_duration(s).map_err(|e| e.to_string())?;
    if d.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(d)
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Group containers by the networks they are attached to
    Net,
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.watch && cli.format == OutputFormat::Json {
        eprintln!("Error: --watch is not supported with --format=json");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let msg = format!("{:#}", e);
            let msg = msg.trim();
            eprintln!(
                "Error: {}",
                if msg.is_empty() { "unknown error" } else { msg }
            );
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load()?;
    tracing::debug!(version = %whale::version::tag(), ?config, "starting");

    let cancel = CancellationToken::new();
    if cli.watch {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            tracing::debug!("Received shutdown signal");
            cancel.cancel();
        });
    } else {
        // One-shot runs are bounded overall; stalled fetches past this report ERROR.
        let cancel = cancel.clone();
        let deadline = config.collector.oneshot_timeout();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            tracing::warn!(?deadline, "one-shot deadline reached, cancelling");
            cancel.cancel();
        });
    }

    let repo = Arc::new(DockerRepo::connect().context("connecting to Docker")?);
    tokio::select! {
        biased;
        _ = cancel.cancelled() => anyhow::bail!("cancelled before the Docker daemon answered"),
        res = repo.ping() => res.context("Docker daemon unreachable")?,
    }

    let interval = cli.interval.unwrap_or_else(|| config.watch.interval());

    if cli.command == Some(Command::Net) {
        return if cli.watch {
            watch_networks(repo.as_ref(), &cli, interval, cancel).await
        } else {
            print_networks(repo.as_ref(), &cli, &cancel).await
        };
    }

    let collector = Collector::new(repo.clone(), repo, config.collector.fetcher());

    if cli.watch {
        let table = TableOptions::for_stdout(cli.no_trunc);
        let options = WatchOptions {
            include_stopped: cli.all,
            interval,
        };
        return watch(&collector, options, cancel, |mut snaps| {
            render::sort_snapshots(&mut snaps, cli.sort);
            let mut out = std::io::stdout().lock();
            render::clear_screen(&mut out)?;
            render::render_table(&snaps, &table, &mut out)?;
            out.flush()?;
            Ok(())
        })
        .await;
    }

    let mut snaps = collector.collect(cli.all, &cancel).await?;
    render::sort_snapshots(&mut snaps, cli.sort);
    let mut out = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Json => render::render_json(&snaps, &mut out)?,
        OutputFormat::Table => {
            render::render_table(&snaps, &TableOptions::for_stdout(cli.no_trunc), &mut out)?
        }
    }
    Ok(())
}

async fn print_networks(
    lister: &dyn ContainerLister,
    cli: &Cli,
    cancel: &CancellationToken,
) -> Result<()> {
    let containers = tokio::select! {
        biased;
        _ = cancel.cancelled() => anyhow::bail!("cancelled before containers were listed"),
        listed = lister.list(cli.all) => listed?,
    };
    let groups = group_by_network(&containers);
    let mut out = std::io::stdout().lock();
    match cli.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &groups)?;
            writeln!(out)?;
        }
        OutputFormat::Table => {
            render::render_networks(&groups, &TableOptions::for_stdout(cli.no_trunc), &mut out)?
        }
    }
    Ok(())
}

async fn watch_networks(
    lister: &dyn ContainerLister,
    cli: &Cli,
    period: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let table = TableOptions::for_stdout(cli.no_trunc);
    let mut tick = interval(period.max(Duration::from_millis(1)));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tick.tick().await;
    loop {
        let containers = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            listed = lister.list(cli.all) => listed?,
        };
        let groups = group_by_network(&containers);
        {
            let mut out = std::io::stdout().lock();
            render::clear_screen(&mut out)?;
            render::render_networks(&groups, &table, &mut out)?;
            out.flush()?;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            _ = tick.tick() => {}
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_flag_rejects_zero() {
        assert!(parse_interval("0s").is_err());
        assert!(parse_interval("0ms").is_err());
        assert!(parse_interval("soon").is_err());
        assert_eq!(parse_interval("500ms"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn cli_rejects_zero_interval() {
        let err = Cli::try_parse_from(["whale", "--watch", "--interval", "0s"]).unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        let cli = Cli::try_parse_from(["whale", "net", "--interval", "2s"]).unwrap();
        assert_eq!(cli.interval, Some(Duration::from_secs(2)));
        assert_eq!(cli.command, Some(Command::Net));
    }
}
