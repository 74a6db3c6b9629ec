//! File-backed tracing setup. The terminal belongs to the TUI, so logs go to
//! `<config dir>/flockwatch.log`, filtered by `FLOCKWATCH_LOG` (default `info`).

use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::profiles::config_dir;

pub const LOG_ENV: &str = "FLOCKWATCH_LOG";

pub fn log_path() -> PathBuf {
    config_dir().join("flockwatch.log")
}

pub fn init() -> anyhow::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing tracing subscriber")?;
    Ok(path)
}
