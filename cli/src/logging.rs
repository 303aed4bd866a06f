// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Tracing subscriber setup for the `llm-switch` binary.
//!
//! Every run logs to stderr at the requested level and, at debug level, to a
//! timestamped file under `~/.llm-switch/logs`. Only the newest
//! [`MAX_LOG_FILES`] files in that directory are kept.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// HTTP client internals are only interesting when they fail.
const QUIET_TARGETS: &[&str] = &["hyper=warn", "hyper_util=warn", "reqwest=warn", "h2=warn"];

/// Number of log files retained in the log directory
pub const MAX_LOG_FILES: usize = 10;

/// Overrides the per-run log file path
pub const LOG_FILE_ENV: &str = "LOG_FILE_NAME";

/// Output format for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Compact human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Build the filter directive string for a base level.
pub fn filter_directives(level: &str) -> String {
    let mut directives = vec![level.trim().to_lowercase()];
    directives.extend(QUIET_TARGETS.iter().map(|t| t.to_string()));
    directives.join(",")
}

/// Directory for per-run log files
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".llm-switch")
        .join("logs")
}

/// Path of this run's log file: `LOG_FILE_NAME` if set, else a start-time name.
pub fn log_file_path(override_path: Option<String>, log_dir: &Path) -> PathBuf {
    match override_path.filter(|p| !p.trim().is_empty()) {
        Some(path) => PathBuf::from(path),
        None => {
            let started = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
            log_dir.join(format!("{}.log", started))
        }
    }
}

/// Delete `.log` files in `dir` beyond the newest `keep`, returning what was removed.
///
/// Newest is by modification time, with the file name breaking ties.
pub fn prune_old_logs(dir: &Path, keep: usize) -> std::io::Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if metadata.is_file() && path.extension().is_some_and(|ext| ext == "log") {
            logs.push((metadata.modified()?, path));
        }
    }

    logs.sort_by(|a, b| b.cmp(a));

    let mut removed = Vec::new();
    for (_, path) in logs.into_iter().skip(keep) {
        std::fs::remove_file(&path)?;
        removed.push(path);
    }
    Ok(removed)
}

/// Create the log file for this run and trim old ones from its directory.
fn open_log_file() -> Result<(std::fs::File, PathBuf, Vec<PathBuf>)> {
    let path = log_file_path(std::env::var(LOG_FILE_ENV).ok(), &default_log_dir());
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {:?}", dir))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    let removed = prune_old_logs(&dir, MAX_LOG_FILES)
        .with_context(|| format!("Failed to prune logs in {:?}", dir))?;

    Ok((file, path, removed))
}

/// Initialize tracing subscriber for logging
///
/// `RUST_LOG` takes precedence over `level` for stderr output. The returned
/// guard flushes the file writer on drop and must live until exit.
pub fn init_logging(level: &str, format: LogFormat) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(level)))
        .context("Failed to create log filter")?;

    let stderr_layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .boxed(),
    };

    let log_file = open_log_file();
    let (file_layer, guard) = match &log_file {
        Ok((file, _, _)) => {
            let file = file.try_clone().context("Failed to clone log file handle")?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new(filter_directives("debug")));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer.with_filter(filter))
        .with(file_layer)
        .init();

    match log_file {
        Ok((_, path, removed)) => {
            tracing::debug!("Writing logs to {:?}", path);
            for old in removed {
                tracing::debug!("Deleted old log file: {:?}", old);
            }
        }
        Err(e) => tracing::warn!("File logging disabled: {:#}", e),
    }

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "Logging initialized"
    );

    Ok(guard)
}
