// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML settings file with site defaults.
//!
//! ```toml
//! resources = "/opt/bohra/resources"
//! cpus = 36
//! assembler = "skesa"
//! kraken_db = "/db/kraken2/standard"
//! ```
//!
//! Command-line flags win over the file, and the file wins over built-in
//! defaults.

use std::path::{Path, PathBuf};

use bohra_core::Assembler;
use serde::Deserialize;
use thiserror::Error;

use crate::env::Env;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file {} does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("could not read settings file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("settings file {} is invalid: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub resources: Option<PathBuf>,
    pub cpus: Option<u32>,
    pub assembler: Option<Assembler>,
    pub minaln: Option<u32>,
    pub kraken_db: Option<PathBuf>,
    pub singularity_path: Option<String>,
    pub prefill_path: Option<String>,
}

impl Settings {
    /// Load settings from `--settings`, then `BOHRA_SETTINGS`, then the
    /// per-user config directory. An explicitly named file must exist; the
    /// per-user one is optional.
    pub fn discover(flag: Option<&Path>, env: &Env) -> Result<Self, SettingsError> {
        if let Some(path) = flag.or(env.settings.as_deref()) {
            if !path.exists() {
                return Err(SettingsError::Missing { path: path.to_path_buf() });
            }
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read { path: path.to_path_buf(), source })?;
        let settings: Settings = toml::from_str(&text)
            .map_err(|source| SettingsError::Parse { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}

/// `<config dir>/bohra/settings.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bohra").join("settings.toml"))
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
