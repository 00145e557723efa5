// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod rerun;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::Result;
use bohra_core::{ClusterSettings, JobConfig, Scheduler, SystemClock};
use bohra_engine::{JobOutcome, JobSetup, SetupMode, SystemProbe, SystemRunner};
use clap::Args;

use crate::env::Env;
use crate::exit_error::ExitError;
use crate::settings::Settings;

/// Resources shipped alongside the source tree, used when neither a flag
/// nor the settings file names a directory.
pub const BUNDLED_RESOURCES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../resources");

/// Everything a command needs from startup.
pub struct Context {
    pub env: Env,
    pub settings: Settings,
}

impl Context {
    pub fn resources(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(|p| self.env.absolute(p))
            .or_else(|| self.settings.resources.clone())
            .unwrap_or_else(|| PathBuf::from(BUNDLED_RESOURCES))
    }

    /// Flag, then settings file, then `KRAKEN2_DEFAULT_DB`.
    pub fn kraken_db(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(|p| self.env.absolute(p))
            .or_else(|| self.settings.kraken_db.clone())
            .or_else(|| self.env.kraken_db.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Submit workflow jobs through an HPC scheduler
    #[arg(long, requires = "cluster_config")]
    pub cluster: bool,
    /// Scheduler config (JSON with a __default__ block)
    #[arg(long, value_name = "JSON")]
    pub cluster_config: Option<PathBuf>,
    /// Scheduler used to submit jobs
    #[arg(long, default_value_t = Scheduler::Sbatch)]
    pub queue: Scheduler,
}

impl ClusterArgs {
    pub fn settings(&self, env: &Env) -> Option<ClusterSettings> {
        match (&self.cluster_config, self.cluster) {
            (Some(config), true) => {
                Some(ClusterSettings { config: env.absolute(config), scheduler: self.queue })
            }
            _ => None,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct ContainerArgs {
    /// Run every tool in singularity containers
    #[arg(long)]
    pub singularity: bool,
    /// Where container images live
    #[arg(long, value_name = "PATH")]
    pub singularity_path: Option<String>,
}

/// Drive a job through setup and execution with the real clock, tool
/// probe and process runner.
pub fn launch(config: JobConfig, env: &Env, mode: SetupMode) -> Result<JobOutcome> {
    let mut job = JobSetup::new(
        config,
        SystemClock,
        SystemProbe::new(env.path.clone()),
        SystemRunner::new(env.path.clone()),
    )
    .user(env.user.clone())
    .mode(mode);
    let outcome = job.execute().map_err(ExitError::from)?;
    tracing::info!(
        job_dir = %outcome.job_dir.display(),
        isolates = outcome.isolates.len(),
        "bohra is done"
    );
    Ok(outcome)
}
