//! Log sink setup
//!
//! Called once from `main`; library code only emits `tracing` events.

use crate::config::LoggingConfig;
use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Layer, Registry, fmt};

const CRATE_TARGET: &str = "bleeding_edge_bot";

/// Install the global subscriber
///
/// The console receives the configured level (or `RUST_LOG`, raised by
/// `verbosity`). The optional debug file receives everything from debug up,
/// the optional error file receives info and up. Other crates are only
/// logged from warn up.
pub fn init(config: &LoggingConfig, base_dir: &Path, verbosity: u8) -> Result<()> {
    let console_level = match verbosity {
        0 => config.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let console_filter = if verbosity == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| crate_filter(console_level))
    } else {
        crate_filter(console_level)
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed(),
    ];

    if let Some(path) = config.debug_file.as_deref() {
        layers.push(file_layer(open_log_file(&resolve(base_dir, path))?, "debug"));
    }
    if let Some(path) = config.error_file.as_deref() {
        layers.push(file_layer(open_log_file(&resolve(base_dir, path))?, "info"));
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Config(format!("failed to initialize logging: {e}")))
}

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,{CRATE_TARGET}={level}"))
}

fn file_layer(file: File, level: &str) -> Box<dyn Layer<Registry> + Send + Sync> {
    fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(crate_filter(level))
        .boxed()
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Config(format!("failed to open log file {}: {e}", path.display())))
}
