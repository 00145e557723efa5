// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variables, read once at startup.
//!
//! Nothing below `main` reads the process environment; everything it
//! needs is captured here and passed down as plain values.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Default species classification database
pub const KRAKEN_DB_VAR: &str = "KRAKEN2_DEFAULT_DB";
/// Settings file override
pub const SETTINGS_VAR: &str = "BOHRA_SETTINGS";
/// Log filter directives, e.g. `debug` or `bohra_engine=trace`
pub const LOG_VAR: &str = "BOHRA_LOG";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Env {
    pub kraken_db: Option<PathBuf>,
    /// Search path for external tools
    pub path: OsString,
    pub user: String,
    pub settings: Option<PathBuf>,
    pub log_filter: Option<String>,
    /// Directory the command was started from
    pub cwd: PathBuf,
}

impl Env {
    pub fn capture() -> Self {
        let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            kraken_db: non_empty(KRAKEN_DB_VAR).map(PathBuf::from),
            path: std::env::var_os("PATH").unwrap_or_default(),
            user: non_empty("USER").or_else(|| non_empty("LOGNAME")).unwrap_or_default(),
            settings: non_empty(SETTINGS_VAR).map(PathBuf::from),
            log_filter: non_empty(LOG_VAR),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// `path` made absolute against the starting directory, without `.`
    /// components.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() { path.to_path_buf() } else { self.cwd.join(path) };
        joined.components().collect()
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
