//! keyshift - input event replay
//!
//! Replays a script of input events through the interception point and the
//! output queue, logging every record on the way.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyshift::config::Config;
use keyshift::{AllocationTracker, EventOutputQueue, Interceptor, LogSink, PassThroughPolicy, Script};

/// Command-line arguments for keyshift
#[derive(Parser, Debug)]
#[command(name = "keyshift")]
#[command(version, about = "Input event record replay", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "KEYSHIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,

    /// Write logs to file (in addition to stdout)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Clamp wait records to this many milliseconds
    #[arg(long)]
    pub max_wait_ms: Option<u32>,

    /// Script to replay (JSON or TOML); the built-in demo when omitted
    pub script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let level = match args.verbose {
        0 => None,
        1 => Some("debug".to_string()),
        _ => Some("trace".to_string()),
    };
    let config = config.with_overrides(level, args.max_wait_ms);
    config.validate()?;

    init_logging(&args, &config)?;

    info!("════════════════════════════════════════════════════════");
    info!("  keyshift v{}", env!("CARGO_PKG_VERSION"));
    info!("  Built: {} {}", env!("BUILD_DATE"), env!("BUILD_TIME"));
    info!("  Commit: {}", env!("GIT_HASH"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");
    debug!("Config: {:?}", config);

    let script = match &args.script {
        Some(path) => Script::load(path)
            .with_context(|| format!("Failed to load script: {}", path.display()))?,
        None => {
            info!("No script given, replaying built-in demo");
            Script::demo()
        }
    };
    info!("Replaying {} scripted events", script.events.len());

    let tracker = AllocationTracker::new();
    let queue = EventOutputQueue::new(LogSink::new(), config.queue.clone())?;
    let mut interceptor = Interceptor::new(PassThroughPolicy, tracker.clone(), queue);

    let threshold = config.tracker.warn_live_threshold;
    let mut threshold_warned = false;

    for event in &script.events {
        for record in event.build(&tracker) {
            interceptor.handle(record)?;
        }

        if threshold > 0 && !threshold_warned && tracker.count() > threshold as i64 {
            warn!(
                "{} records live, above warn threshold of {}",
                tracker.count(),
                threshold
            );
            threshold_warned = true;
        }
    }

    let caught = interceptor.stats();
    let stats = interceptor.into_queue().shutdown().await?;
    let tracker_stats = tracker.stats();

    info!(
        "Caught {} events: {} passed, {} suppressed, {} substituted",
        caught.caught, caught.passed, caught.suppressed, caught.substituted
    );
    info!(
        "Replayed {} records, {} waits ({}ms), {} delivery errors",
        stats.replayed, stats.waits, stats.waited_ms, stats.delivery_errors
    );
    info!(
        "Records: {} allocated, {} released, peak {} live",
        tracker_stats.total_allocated, tracker_stats.total_released, tracker_stats.peak
    );

    if config.tracker.leak_check {
        tracker
            .check_balanced()
            .context("Records still live after replay")?;
        info!("Allocation count balanced");
    }

    Ok(())
}

/// EnvFilter directives for the configured level and record targets
fn filter_directives(config: &Config) -> String {
    let level = config.logging.level.to_lowercase();
    let record_level = |enabled: bool| {
        if !enabled {
            "info"
        } else if level == "trace" {
            "trace"
        } else {
            "debug"
        }
    };

    format!(
        "keyshift={level},{params}={params_level},{pointing}={pointing_level},warn",
        level = level,
        params = keyshift::params::LOG_TARGET,
        params_level = record_level(config.logging.debug),
        pointing = keyshift::params::POINTING_LOG_TARGET,
        pointing_level = record_level(config.logging.debug_pointing),
    )
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    use std::fs::File;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter_directives(config)));

    let log_file_path = args.log_file.as_ref().or(config.logging.log_file.as_ref());

    // If log file is specified, write to both stdout and file
    if let Some(log_file_path) = log_file_path {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path.display()))?;

        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stdout),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path.display());
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json())
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact())
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty())
                    .init();
            }
        }
    }

    Ok(())
}
