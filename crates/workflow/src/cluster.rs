// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration and cluster submission strings.
//!
//! The configuration file is the JSON document the workflow engine reads
//! through `--cluster-config`. Only its `__default__` block matters here:
//! each key becomes a scheduler flag whose value the engine fills in per
//! rule via `{cluster.<key>}`.
//!
//! ```json
//! { "__default__": { "account": "lab", "time": "01:00:00", "mem": "8G" } }
//! ```

use std::path::{Path, PathBuf};

use bohra_core::Scheduler;
use serde_json::{Map, Value};
use thiserror::Error;

/// Block holding the submission parameters applied to every rule.
pub const DEFAULT_SECTION: &str = "__default__";

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("cluster config {} does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("could not read cluster config {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cluster config {} is not valid JSON (check for single quotes): {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("cluster config {} has no {DEFAULT_SECTION} section", path.display())]
    NoDefaults { path: PathBuf },
    #[error("'{key}' is not a valid {scheduler} option")]
    UnknownKey { key: String, scheduler: Scheduler },
}

/// Parsed scheduler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    path: PathBuf,
    defaults: Map<String, Value>,
}

impl ClusterConfig {
    /// Load and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self, ClusterError> {
        if !path.exists() {
            return Err(ClusterError::Missing { path: path.to_path_buf() });
        }
        let text = std::fs::read_to_string(path)
            .map_err(|source| ClusterError::Read { path: path.to_path_buf(), source })?;
        Self::parse(path, &text)
    }

    /// Parse configuration text; `path` is only used for messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ClusterError> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|source| ClusterError::Parse { path: path.to_path_buf(), source })?;
        let defaults = doc
            .get(DEFAULT_SECTION)
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| ClusterError::NoDefaults { path: path.to_path_buf() })?;
        Ok(Self { path: path.to_path_buf(), defaults })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Submission command for `scheduler`, e.g.
    /// `sbatch -A {cluster.account} --time {cluster.time}`.
    ///
    /// Keys keep the order they have in the file.
    pub fn submit_command(&self, scheduler: Scheduler) -> Result<String, ClusterError> {
        let mut parts = vec![scheduler.as_str().to_string()];
        for key in self.defaults.keys() {
            let flag = flag_for(scheduler, key).ok_or_else(|| ClusterError::UnknownKey {
                key: key.clone(),
                scheduler,
            })?;
            parts.push(format!("{flag}{{cluster.{key}}}"));
        }
        Ok(parts.join(" "))
    }
}

/// Scheduler flag for a `__default__` key, including the separator that
/// precedes the value.
pub fn flag_for(scheduler: Scheduler, key: &str) -> Option<&'static str> {
    let flag = match (scheduler, key) {
        (Scheduler::Sbatch, "account") => "-A ",
        (Scheduler::Sbatch, "cpus-per-task") => "-c ",
        (Scheduler::Sbatch, "time") => "--time ",
        (Scheduler::Sbatch, "partition") => "--partition ",
        (Scheduler::Sbatch, "mem") => "--mem ",
        (Scheduler::Sbatch, "job") => "-J ",
        // resource lists are `-l name=value`, no space before the value
        (Scheduler::Qsub, "account") => "-P ",
        (Scheduler::Qsub, "cpus-per-task") => "-l ncpus=",
        (Scheduler::Qsub, "time") => "-l walltime=",
        (Scheduler::Qsub, "partition") => "-q ",
        (Scheduler::Qsub, "mem") => "-l mem=",
        (Scheduler::Qsub, "job") => "-N ",
        _ => return None,
    };
    Some(flag)
}

#[cfg(test)]
#[path = "cluster_tests.rs"]
mod tests;
