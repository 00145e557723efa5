// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prior-run detection and isolate history.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bohra_core::{IsolateId, IsolateRecord, IsolateStatus};

use crate::logs::{IsolateLogEntry, LogTable, LogTableError};

/// Guards a working directory against overwriting an earlier job.
///
/// A directory holding `source.log` has been run in before.
#[derive(Debug, Clone)]
pub struct RerunGuard {
    workdir: PathBuf,
}

impl RerunGuard {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self { workdir: workdir.into() }
    }

    /// Whether an earlier run left its source log behind.
    pub fn prior_run(&self) -> bool {
        LogTable::source(&self.workdir).exists()
    }

    /// Remove the source and isolate logs so a forced run starts over.
    /// Every other artifact is kept.
    pub fn clear_history(&self) -> Result<(), LogTableError> {
        tracing::warn!(workdir = %self.workdir.display(), "forcing a new run, removing previous logs");
        LogTable::source(&self.workdir).remove()?;
        LogTable::isolates(&self.workdir).remove()?;
        Ok(())
    }
}

/// What the isolate log says about earlier runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum History {
    Fresh,
    Rerun { previous_isolates: HashSet<IsolateId> },
}

impl History {
    /// Load the isolates that were active in any earlier run. A missing
    /// isolate log means there is no history.
    pub fn load(workdir: &Path) -> Result<Self, LogTableError> {
        let log = LogTable::isolates(workdir);
        if !log.exists() {
            return Ok(History::Fresh);
        }
        let mut previous_isolates = HashSet::new();
        for row in log.read()? {
            let entry = IsolateLogEntry::from_row(&row)?;
            if entry.status.is_active() {
                previous_isolates.insert(entry.isolate);
            }
        }
        Ok(History::Rerun { previous_isolates })
    }

    /// Status to log for `record` in this run.
    pub fn status_of(&self, record: &IsolateRecord) -> IsolateStatus {
        match self {
            _ if record.excluded => IsolateStatus::Removed,
            History::Rerun { previous_isolates } if !previous_isolates.contains(&record.id) => {
                IsolateStatus::Added
            }
            _ => IsolateStatus::Included,
        }
    }
}

/// Decide which mask a rerun uses.
///
/// `previous` is the staged mask name from the last source log row (empty
/// when none was used). A requested mask with that same file name, or no
/// requested mask at all, keeps the staged one. Anything else is returned
/// for staging.
pub fn resolve_rerun_mask(
    previous: &str,
    requested: Option<&Path>,
    workdir: &Path,
) -> Option<PathBuf> {
    let kept = (!previous.is_empty()).then(|| workdir.join(previous));
    match requested {
        None => kept,
        Some(path) if path.as_os_str().is_empty() => kept,
        Some(path) if path.file_name().is_some_and(|n| n == previous) => {
            tracing::info!(mask = previous, "reusing mask from the previous run");
            kept
        }
        Some(path) => Some(path.to_path_buf()),
    }
}

#[cfg(test)]
#[path = "rerun_tests.rs"]
mod tests;
