// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job setup errors and their categories.

use std::path::PathBuf;

use bohra_core::{IdError, PhaseError};
use bohra_workflow::{ArtifactError, ClusterError};
use thiserror::Error;

use crate::deps::DependencyError;
use crate::logs::LogTableError;
use crate::manifest::ManifestError;
use crate::runner::RunnerError;
use crate::staging::StageError;

/// Broad failure category, one per exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing paths and settings
    Configuration,
    /// Malformed manifest
    Structural,
    /// Missing external tool
    Dependency,
    /// Prior run present without force
    RerunConflict,
    /// Workflow failure or I/O failure while preparing it
    Execution,
}

impl ErrorKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Execution => 1,
            ErrorKind::Configuration => 2,
            ErrorKind::Structural => 3,
            ErrorKind::Dependency => 4,
            ErrorKind::RerunConflict => 5,
        }
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "{} already holds a job, run again with --force to overwrite it or use rerun instead",
        workdir.display()
    )]
    RerunConflict { workdir: PathBuf },
    #[error("{} has no previous run to rerun, use run instead", workdir.display())]
    NoPreviousRun { workdir: PathBuf },
    #[error("working directory {} does not exist", path.display())]
    MissingWorkdir { path: PathBuf },
    #[error("resources directory {} does not exist", path.display())]
    MissingResources { path: PathBuf },
    #[error("a reference is required to call SNPs, pass one with --reference")]
    MissingReference,
    #[error(transparent)]
    InvalidId(#[from] IdError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Cluster(#[from] ClusterError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error(transparent)]
    Log(#[from] LogTableError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Runner(#[from] RunnerError),
    #[error(transparent)]
    Phase(#[from] PhaseError),
}

impl SetupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetupError::RerunConflict { .. } => ErrorKind::RerunConflict,
            SetupError::NoPreviousRun { .. }
            | SetupError::MissingWorkdir { .. }
            | SetupError::MissingResources { .. }
            | SetupError::MissingReference
            | SetupError::InvalidId(_)
            | SetupError::Cluster(_) => ErrorKind::Configuration,
            SetupError::Manifest(e) if e.is_structural() => ErrorKind::Structural,
            SetupError::Manifest(_) => ErrorKind::Configuration,
            SetupError::Stage(StageError::MissingSource { .. } | StageError::BadName { .. }) => {
                ErrorKind::Configuration
            }
            SetupError::Artifact(ArtifactError::ReadTemplate { .. }) => ErrorKind::Configuration,
            SetupError::Dependency(_) => ErrorKind::Dependency,
            SetupError::Stage(_)
            | SetupError::Log(_)
            | SetupError::Artifact(_)
            | SetupError::Runner(_)
            | SetupError::Phase(_) => ErrorKind::Execution,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
