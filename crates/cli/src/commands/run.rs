// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bohra run`: start a new job in a working directory.

use std::path::PathBuf;

use anyhow::Result;
use bohra_core::{Assembler, JobConfig, JobId, PipelineMode};
use bohra_engine::SetupMode;
use clap::Args;

use super::{launch, ClusterArgs, ContainerArgs, Context};
use crate::exit_error::ExitError;

const DEFAULT_CPUS: u32 = 36;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Manifest with three columns: isolate, read 1, read 2
    #[arg(short, long)]
    pub input_file: PathBuf,
    /// Job name, also the job's directory inside the working directory
    #[arg(short, long)]
    pub job_id: String,
    /// Reference genome, required unless the pipeline is assembly-only
    #[arg(short, long)]
    pub reference: Option<PathBuf>,
    /// Regions to exclude from the core alignment
    #[arg(short, long)]
    pub mask: Option<PathBuf>,
    /// Working directory
    #[arg(short, long, default_value = ".")]
    pub workdir: PathBuf,
    /// s (snippy), a (assembly), sa (both) or all (adds the pan-genome)
    #[arg(short, long, default_value_t = PipelineMode::Combined)]
    pub pipeline: PipelineMode,
    /// shovill, skesa or spades
    #[arg(short, long)]
    pub assembler: Option<Assembler>,
    /// Cores handed to the workflow engine
    #[arg(long)]
    pub cpus: Option<u32>,
    /// Minimum alignment percentage for an isolate to stay in the core
    #[arg(long)]
    pub minaln: Option<u32>,
    /// Directory prefix holding previously computed per-isolate results
    #[arg(long)]
    pub prefill_path: Option<String>,
    /// Species classification database
    #[arg(long)]
    pub kraken_db: Option<PathBuf>,
    /// Workflow and parameter templates
    #[arg(long)]
    pub resources: Option<PathBuf>,
    #[command(flatten)]
    pub cluster: ClusterArgs,
    #[command(flatten)]
    pub container: ContainerArgs,
    /// Overwrite the history of an earlier job in the working directory
    #[arg(short, long)]
    pub force: bool,
    /// Show what the workflow engine would do without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl RunArgs {
    pub fn job_config(&self, ctx: &Context) -> Result<JobConfig, ExitError> {
        let env = &ctx.env;
        let settings = &ctx.settings;
        let job_id = JobId::parse(&self.job_id).map_err(|e| {
            ExitError::configuration(format!("{e}, please set -j job_id to try again"))
        })?;
        Ok(JobConfig {
            job_id,
            workdir: env.absolute(&self.workdir),
            resources: ctx.resources(self.resources.as_deref()),
            input_file: env.absolute(&self.input_file),
            pipeline: self.pipeline,
            assembler: self.assembler.or(settings.assembler).unwrap_or_default(),
            cpus: self.cpus.or(settings.cpus).unwrap_or(DEFAULT_CPUS),
            minaln: self.minaln.or(settings.minaln).unwrap_or(0),
            prefill_path: self
                .prefill_path
                .clone()
                .or_else(|| settings.prefill_path.clone())
                .unwrap_or_default(),
            use_singularity: self.container.singularity,
            singularity_path: self
                .container
                .singularity_path
                .clone()
                .or_else(|| settings.singularity_path.clone())
                .unwrap_or_default(),
            force: self.force,
            dry_run: self.dry_run,
            reference: self.reference.as_deref().map(|p| env.absolute(p)),
            mask: self.mask.as_deref().map(|p| env.absolute(p)),
            kraken_db: ctx.kraken_db(self.kraken_db.as_deref()),
            cluster: self.cluster.settings(env),
        })
    }
}

pub fn handle(args: RunArgs, ctx: &Context) -> Result<()> {
    let config = args.job_config(ctx)?;
    launch(config, &ctx.env, SetupMode::Run)?;
    Ok(())
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
