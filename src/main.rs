use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use procsnap::config::{self, Config, load_config, load_config_from_path};
use procsnap::pipeline::{Query, SortField, Thresholds};
use procsnap::render::{AnomaliesResponse, ProcessesResponse, render_table};
use procsnap::system::collector::{self, Collector};
use procsnap::{Monitor, logging};
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "procsnap",
    about = "Process snapshots with sorting, filtering, and anomaly marking"
)]
struct Cli {
    /// Path to config file (TOML, or JSON with a .json extension)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter such as `info` or `procsnap=debug`; defaults to RUST_LOG, then `warn`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List live processes
    List(ListArgs),
    /// List processes at or above the CPU or memory threshold
    Anomalies(AnomalyArgs),
    /// Print the effective configuration
    Config {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Sort by: pid, name, cpu_percent, memory_percent
    #[arg(long)]
    sort: Option<String>,

    /// Sort in descending order
    #[arg(long, default_value_t = false)]
    desc: bool,

    /// Filter by process name substring (case-insensitive)
    #[arg(long)]
    filter: Option<String>,

    /// Keep only processes over a threshold
    #[arg(long, default_value_t = false)]
    anomalies: bool,

    #[command(flatten)]
    thresholds: ThresholdArgs,

    /// Print as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Keep polling until Ctrl+C
    #[arg(long, default_value_t = false)]
    watch: bool,

    /// Seconds between polls in watch mode; defaults to the configured refresh_interval
    #[arg(long)]
    interval: Option<f64>,
}

#[derive(Args)]
struct AnomalyArgs {
    #[command(flatten)]
    thresholds: ThresholdArgs,

    /// Print as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args)]
struct ThresholdArgs {
    /// CPU usage threshold percentage (0-100); defaults to the configured cpu_threshold
    #[arg(long)]
    cpu_threshold: Option<f64>,

    /// Memory usage threshold percentage (0-100); defaults to the configured mem_threshold
    #[arg(long)]
    mem_threshold: Option<f64>,
}

impl ThresholdArgs {
    fn resolve(&self, config: &Config) -> procsnap::Result<Thresholds> {
        Thresholds::new(
            self.cpu_threshold.unwrap_or(config.cpu_threshold),
            self.mem_threshold.unwrap_or(config.mem_threshold),
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.log_json).map_err(|e| eyre!(e))?;
    let config = load_config_for_cli(&cli);

    match &cli.command {
        Command::List(args) => run_list(args, &config).await,
        Command::Anomalies(args) => run_anomalies(args, &config).await,
        Command::Config { json } => {
            let source = cli.config.clone().or_else(config::config_path);
            print_config(&config, source.as_deref(), *json)
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    match loaded {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "using default configuration");
            Config::default()
        }
    }
}

fn build_list_query(args: &ListArgs, config: &Config) -> procsnap::Result<Query> {
    let mut query = Query::new();
    if let Some(keyword) = &args.filter {
        query = query.with_filter(keyword.as_str());
    }
    if let Some(field) = &args.sort {
        query = query.with_sort(field.parse::<SortField>()?, args.desc);
    }
    if args.anomalies {
        query = query.with_anomalies(args.thresholds.resolve(config)?);
    }
    Ok(query)
}

fn watch_interval(args: &ListArgs, config: &Config) -> Result<Duration> {
    match args.interval {
        Some(secs) => Duration::try_from_secs_f64(secs)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| eyre!("--interval must be a positive number of seconds")),
        None => Ok(config.refresh_duration()),
    }
}

async fn warmed_monitor() -> Monitor<Collector> {
    let collector = Collector::new();
    tokio::time::sleep(collector::WARMUP).await;
    Monitor::new(collector)
}

async fn run_list(args: &ListArgs, config: &Config) -> Result<()> {
    // Reject bad input before touching the process table.
    let query = build_list_query(args, config)?;
    let interval = watch_interval(args, config)?;
    let mut monitor = warmed_monitor().await;

    if !args.watch {
        let snapshot = monitor.snapshot(&query)?;
        return print_processes(&snapshot, args.json);
    }

    info!(interval_secs = interval.as_secs_f64(), "watching processes");
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    monitor
        .watch(&query, interval, ctrl_c, |snapshot| -> Result<()> {
            if !args.json {
                execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
                println!(
                    "Fetching process stats every {} seconds... Press Ctrl+C to stop.\n",
                    interval.as_secs_f64()
                );
            }
            print_processes(snapshot, args.json)?;
            stdout().flush()?;
            Ok(())
        })
        .await?;

    eprintln!("\nStopped monitoring.");
    Ok(())
}

async fn run_anomalies(args: &AnomalyArgs, config: &Config) -> Result<()> {
    let thresholds = args.thresholds.resolve(config)?;
    let mut monitor = warmed_monitor().await;
    let snapshot = monitor.snapshot(&Query::new().with_anomalies(thresholds))?;

    if args.json {
        let body = AnomaliesResponse {
            anomalies: &snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_table(&snapshot));
    }
    Ok(())
}

fn print_processes(snapshot: &procsnap::Snapshot, json: bool) -> Result<()> {
    if json {
        let body = ProcessesResponse {
            processes: snapshot,
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_table(snapshot));
    }
    Ok(())
}

fn print_config(config: &Config, source: Option<&Path>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        if let Some(path) = source {
            println!("# {}", path.display());
        }
        print!("{}", toml::to_string(config)?);
    }
    Ok(())
}
