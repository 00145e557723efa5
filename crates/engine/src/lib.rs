// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bohra-engine: job setup, rerun tracking and workflow execution
//!
//! Everything that touches the filesystem or spawns processes lives here.
//! Every operation takes its paths and settings explicitly; nothing reads
//! the process working directory or environment.

pub mod deps;
pub mod error;
pub mod logs;
pub mod manifest;
pub mod rerun;
pub mod runner;
pub mod setup;
pub mod species_db;
pub mod staging;

#[cfg(test)]
mod test_helpers;

pub use deps::{parse_version, required_tools, DependencyChecker, DependencyError, SystemProbe, ToolProbe, ToolReport};
pub use error::{ErrorKind, SetupError};
pub use logs::{
    ClusterRecord, IsolateLogEntry, LogTable, LogTableError, SourceRecord, CLUSTER_LOG, ISOLATE_LOG,
    SOURCE_LOG,
};
pub use manifest::{check_reads_exist, included_isolates, Manifest, ManifestError, MIN_ISOLATES};
pub use rerun::{resolve_rerun_mask, History, RerunGuard};
pub use runner::{run_workflow, ProcessRunner, RunnerError, SystemRunner};
pub use setup::{JobOutcome, JobSetup, SetupMode};
pub use species_db::SpeciesDb;
pub use staging::{link_if_absent, stage_file, stage_reads, StageError, READ1, READ2};
