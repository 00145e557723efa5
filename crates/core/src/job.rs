// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job configuration: what to run, where, and with which tools.

use crate::id::JobId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid pipeline, choose one of s, a, sa, all")]
pub struct ParseModeError(pub String);

impl From<String> for ParseModeError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a supported assembler, choose one of shovill, skesa, spades")]
pub struct ParseAssemblerError(pub String);

impl From<String> for ParseAssemblerError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a supported queue, choose either sbatch or qsub")]
pub struct ParseSchedulerError(pub String);

impl From<String> for ParseSchedulerError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which halves of the pipeline a job runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineMode {
    /// Read mapping and SNP calling only
    Snippy,
    /// De novo assembly and typing only
    Assembly,
    /// SNP calling plus assembly
    #[default]
    Combined,
    /// Everything, including the pan-genome
    All,
}

crate::str_enum! {
    PipelineMode, ParseModeError {
        Snippy => "s",
        Assembly => "a",
        Combined => "sa",
        All => "all",
    }
}

impl PipelineMode {
    pub fn runs_snippy(&self) -> bool {
        !matches!(self, PipelineMode::Assembly)
    }

    pub fn runs_assembly(&self) -> bool {
        !matches!(self, PipelineMode::Snippy)
    }

    pub fn runs_pangenome(&self) -> bool {
        matches!(self, PipelineMode::All)
    }

    /// A reference genome is needed whenever SNPs are called.
    pub fn requires_reference(&self) -> bool {
        self.runs_snippy()
    }

    /// Name of the workflow definition template in the resources directory.
    pub fn snakefile_template(&self) -> &'static str {
        match self {
            PipelineMode::Snippy => "Snakefile_snippy",
            PipelineMode::Assembly => "Snakefile_assembly",
            PipelineMode::Combined => "Snakefile_default",
            PipelineMode::All => "Snakefile_all",
        }
    }
}

/// De novo assembler used by the assembly half of the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assembler {
    #[default]
    Shovill,
    Skesa,
    Spades,
}

crate::str_enum! {
    Assembler, ParseAssemblerError {
        Shovill => "shovill",
        Skesa => "skesa",
        Spades => "spades",
    }
}

impl Assembler {
    /// Executable the assembler is installed as.
    pub fn executable(&self) -> &'static str {
        match self {
            Assembler::Shovill => "shovill",
            Assembler::Skesa => "skesa",
            Assembler::Spades => "spades.py",
        }
    }
}

/// HPC scheduler used to submit workflow jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheduler {
    Sbatch,
    Qsub,
}

crate::str_enum! {
    Scheduler, ParseSchedulerError {
        Sbatch => "sbatch",
        Qsub => "qsub",
    }
}

/// Cluster submission settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// JSON file with a `__default__` block of submission parameters
    pub config: PathBuf,
    pub scheduler: Scheduler,
}

/// Everything a single invocation needs, resolved up front.
///
/// Paths are taken as given; the engine resolves relative paths against
/// `workdir` rather than the process working directory.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub job_id: JobId,
    pub workdir: PathBuf,
    /// Directory holding the workflow and parameter templates
    pub resources: PathBuf,
    pub input_file: PathBuf,
    pub pipeline: PipelineMode,
    pub assembler: Assembler,
    pub cpus: u32,
    /// Minimum alignment percentage handed to the SNP caller
    pub minaln: u32,
    /// Directory prefix where previously computed per-isolate results live
    pub prefill_path: String,
    /// Run every tool inside containers instead of checking the host
    pub use_singularity: bool,
    pub singularity_path: String,
    /// Remove prior logs before running and pass `-F` to the workflow engine
    pub force: bool,
    pub dry_run: bool,
    pub reference: Option<PathBuf>,
    pub mask: Option<PathBuf>,
    pub kraken_db: Option<PathBuf>,
    pub cluster: Option<ClusterSettings>,
}

crate::builder! {
    pub struct JobConfigBuilder => JobConfig {
        into {
            workdir: PathBuf = "/tmp/bohra",
            resources: PathBuf = "/tmp/bohra/templates",
            input_file: PathBuf = "isolates.tab",
            prefill_path: String = "",
            singularity_path: String = "",
        }
        set {
            job_id: JobId = JobId::fixture("job1"),
            pipeline: PipelineMode = PipelineMode::Combined,
            assembler: Assembler = Assembler::Shovill,
            cpus: u32 = 8,
            minaln: u32 = 0,
            use_singularity: bool = false,
            force: bool = false,
            dry_run: bool = false,
        }
        option {
            reference: PathBuf = None,
            mask: PathBuf = None,
            kraken_db: PathBuf = None,
            cluster: ClusterSettings = None,
        }
    }
}

impl JobConfig {
    /// `<workdir>/<job_id>`, where reads, the Snakefile and the config live.
    pub fn job_dir(&self) -> PathBuf {
        self.workdir.join(self.job_id.as_str())
    }

    /// `<workdir>/<job_id>/READS`
    pub fn reads_dir(&self) -> PathBuf {
        self.job_dir().join("READS")
    }

    /// Resolve a user-supplied path: absolute paths are kept, relative ones
    /// are taken relative to the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workdir.join(path)
        }
    }

    pub fn is_cluster(&self) -> bool {
        self.cluster.is_some()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
