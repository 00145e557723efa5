// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup: compact stderr output plus `<workdir>/bohra.log`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Run log kept next to the job logs, appended across runs.
pub const LOG_FILE: &str = "bohra.log";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not open log file in {}: {source}", path.display())]
    File { path: PathBuf, source: tracing_appender::rolling::InitError },
    #[error("could not install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the file writer flushing until dropped at the end of `main`.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

/// Filter from `BOHRA_LOG`, falling back to `info` when unset or invalid.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. The file layer is only added when
/// `workdir` exists; setup reports a missing working directory itself.
pub fn init(workdir: Option<&Path>, directives: Option<&str>) -> Result<LogGuard, LoggingError> {
    let (file_layer, guard) = match workdir.filter(|w| w.is_dir()) {
        Some(dir) => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE)
                .build(dir)
                .map_err(|source| LoggingError::File { path: dir.to_path_buf(), source })?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_target(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };
    let stderr_layer = fmt::layer().compact().with_target(false).with_writer(std::io::stderr);

    Registry::default()
        .with(env_filter(directives))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(LogGuard { _file: guard })
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
