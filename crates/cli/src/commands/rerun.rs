// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bohra rerun`: run an existing job again with the settings it was
//! started with, picking up new isolates from the manifest.

use std::path::{Path, PathBuf};

use anyhow::Result;
use bohra_core::{ClusterSettings, JobConfig};
use bohra_engine::{
    resolve_rerun_mask, ClusterRecord, LogTable, RerunGuard, SetupError, SetupMode, SourceRecord,
};
use clap::Args;

use super::{launch, ClusterArgs, ContainerArgs, Context};
use crate::exit_error::ExitError;

#[derive(Args, Debug, Clone)]
pub struct RerunArgs {
    /// Working directory of the earlier job
    #[arg(short, long, default_value = ".")]
    pub workdir: PathBuf,
    /// Replacement manifest, e.g. with isolates added or excluded
    #[arg(short, long)]
    pub input_file: Option<PathBuf>,
    /// Replacement mask; an empty value keeps the previous one
    #[arg(short, long)]
    pub mask: Option<String>,
    #[arg(long)]
    pub cpus: Option<u32>,
    #[arg(long)]
    pub minaln: Option<u32>,
    #[arg(long)]
    pub kraken_db: Option<PathBuf>,
    #[arg(long)]
    pub resources: Option<PathBuf>,
    #[command(flatten)]
    pub cluster: ClusterArgs,
    #[command(flatten)]
    pub container: ContainerArgs,
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl RerunArgs {
    /// Settings from the last `source.log` row with any overrides applied.
    pub fn job_config(&self, ctx: &Context) -> Result<JobConfig, ExitError> {
        let env = &ctx.env;
        let workdir = env.absolute(&self.workdir);
        if !RerunGuard::new(&workdir).prior_run() {
            return Err(SetupError::NoPreviousRun { workdir }.into());
        }
        let previous = last_source(&workdir)?;
        tracing::info!(
            job_id = %previous.job_id,
            date = %previous.date,
            "rerunning with settings from the previous run"
        );

        let requested_mask = self.mask.as_deref().map(|m| match m.trim() {
            "" => PathBuf::new(),
            m => env.absolute(Path::new(m)),
        });
        let cluster = match self.cluster.settings(env) {
            Some(cluster) => Some(cluster),
            None if previous.cluster => previous_cluster(&workdir)?,
            None => None,
        };

        Ok(JobConfig {
            job_id: previous.job_id,
            resources: ctx.resources(self.resources.as_deref()),
            input_file: match &self.input_file {
                Some(path) => env.absolute(path),
                None => PathBuf::from(&previous.input_file),
            },
            pipeline: previous.pipeline,
            assembler: previous.assembler,
            cpus: self.cpus.unwrap_or(previous.cpus),
            minaln: self.minaln.unwrap_or(previous.minaln),
            prefill_path: previous.prefill_path,
            use_singularity: self.container.singularity || previous.singularity,
            singularity_path: self
                .container
                .singularity_path
                .clone()
                .or_else(|| ctx.settings.singularity_path.clone())
                .unwrap_or_default(),
            force: false,
            dry_run: self.dry_run,
            reference: (!previous.reference.is_empty()).then(|| workdir.join(&previous.reference)),
            mask: resolve_rerun_mask(&previous.mask, requested_mask.as_deref(), &workdir),
            kraken_db: ctx.kraken_db(self.kraken_db.as_deref()),
            cluster,
            workdir,
        })
    }
}

fn last_source(workdir: &Path) -> Result<SourceRecord, ExitError> {
    let row = LogTable::source(workdir).last().map_err(SetupError::from)?;
    Ok(SourceRecord::from_row(&row).map_err(SetupError::from)?)
}

/// Cluster settings of the last run that used a scheduler, if the cluster
/// log still has them.
fn previous_cluster(workdir: &Path) -> Result<Option<ClusterSettings>, ExitError> {
    let log = LogTable::cluster(workdir);
    if !log.exists() {
        tracing::warn!("previous run used a cluster but cluster.log is missing, running locally");
        return Ok(None);
    }
    let row = log.last().map_err(SetupError::from)?;
    let record = ClusterRecord::from_row(&row).map_err(SetupError::from)?;
    Ok(Some(ClusterSettings { config: PathBuf::from(record.cluster_json), scheduler: record.queue }))
}

pub fn handle(args: RerunArgs, ctx: &Context) -> Result<()> {
    let config = args.job_config(ctx)?;
    launch(config, &ctx.env, SetupMode::Rerun)?;
    Ok(())
}

#[cfg(test)]
#[path = "rerun_tests.rs"]
mod tests;
