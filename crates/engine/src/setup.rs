// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job setup: guard, validate, record, configure, execute.
//!
//! A [`JobSetup`] drives one invocation through the job phases:
//!
//! ```text
//! fresh ──► checks-passed ──► configured ──► executing ──► done
//!   │              └──────────────┴──────────────┴───────► failed
//!   └──► rerun-blocked ──(--force)──► fresh
//! ```
//!
//! Nothing is written to the logs until every check has passed, so a
//! rejected invocation leaves the working directory as it found it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bohra_core::{Clock, IsolateId, IsolateRecord, JobConfig, JobPhase};
use bohra_workflow::{
    mask_flag, ClusterConfig, ConfigParams, RenderedArtifacts, SnakefileParams, SpeciesRules,
    WorkflowCommand, SNAKEFILE,
};

use crate::deps::{DependencyChecker, ToolProbe};
use crate::error::SetupError;
use crate::logs::{ClusterRecord, IsolateLogEntry, LogTable, SourceRecord};
use crate::manifest::{check_reads_exist, included_isolates, Manifest};
use crate::rerun::{History, RerunGuard};
use crate::runner::{run_workflow, ProcessRunner};
use crate::species_db::SpeciesDb;
use crate::staging::{stage_file, stage_reads};

/// Whether an invocation starts a job or continues one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetupMode {
    #[default]
    Run,
    /// Continue the job recorded in the working directory's logs
    Rerun,
}

/// What a completed invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub phase: JobPhase,
    pub job_dir: PathBuf,
    pub snakefile: PathBuf,
    pub config_file: PathBuf,
    pub command: WorkflowCommand,
    /// Included isolates in manifest order
    pub isolates: Vec<IsolateId>,
    pub snippy_version: String,
    pub species_enabled: bool,
}

/// Everything the checks established.
struct Validated {
    records: Vec<IsolateRecord>,
    isolates: Vec<IsolateId>,
    reference: Option<PathBuf>,
    mask: Option<PathBuf>,
    snippy_version: String,
    species: SpeciesDb,
    species_enabled: bool,
    submit: Option<String>,
}

/// Drives a single job invocation.
pub struct JobSetup<C: Clock, P: ToolProbe, R: ProcessRunner> {
    config: JobConfig,
    clock: C,
    probe: P,
    runner: R,
    user: String,
    mode: SetupMode,
    phase: JobPhase,
}

impl<C: Clock, P: ToolProbe, R: ProcessRunner> JobSetup<C, P, R> {
    pub fn new(config: JobConfig, clock: C, probe: P, runner: R) -> Self {
        Self {
            config,
            clock,
            probe,
            runner,
            user: String::new(),
            mode: SetupMode::Run,
            phase: JobPhase::Fresh,
        }
    }

    /// User name recorded in the source log.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn mode(mut self, mode: SetupMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    /// Run every step. On error the job is left `failed`, or
    /// `rerun-blocked` when the guard stopped it.
    pub fn execute(&mut self) -> Result<JobOutcome, SetupError> {
        let job_id = self.config.job_id.clone();
        let result = self.try_execute();
        if let Err(e) = &result {
            if let Ok(next) = self.phase.advance(JobPhase::Failed) {
                self.phase = next;
            }
            tracing::warn!(job_id = %job_id, phase = %self.phase, error = %e, "job stopped");
        }
        result
    }

    fn try_execute(&mut self) -> Result<JobOutcome, SetupError> {
        tracing::info!(
            job_id = %self.config.job_id,
            workdir = %self.config.workdir.display(),
            pipeline = %self.config.pipeline,
            "starting job setup"
        );
        self.guard()?;
        let validated = self.validate()?;
        self.transition(JobPhase::ChecksPassed)?;

        if self.config.dry_run {
            tracing::info!("dry run, logs are left untouched");
        } else {
            self.record(&validated)?;
        }

        let (snakefile, config_file) = self.configure(&validated)?;
        self.transition(JobPhase::Configured)?;

        let command = self.command(&validated);
        let job_dir = self.config.job_dir();
        self.transition(JobPhase::Executing)?;
        run_workflow(&self.runner, &command, &job_dir)?;
        self.transition(JobPhase::Done)?;
        tracing::info!(job_id = %self.config.job_id, "job complete");

        Ok(JobOutcome {
            phase: self.phase,
            job_dir,
            snakefile,
            config_file,
            command,
            isolates: validated.isolates,
            snippy_version: validated.snippy_version,
            species_enabled: validated.species_enabled,
        })
    }

    fn transition(&mut self, next: JobPhase) -> Result<(), SetupError> {
        self.phase = self.phase.advance(next)?;
        tracing::debug!(phase = %self.phase, "job phase");
        Ok(())
    }

    fn guard(&mut self) -> Result<(), SetupError> {
        let workdir = &self.config.workdir;
        if !workdir.is_dir() {
            return Err(SetupError::MissingWorkdir { path: workdir.clone() });
        }
        let guard = RerunGuard::new(workdir);
        match self.mode {
            SetupMode::Rerun if !guard.prior_run() => {
                Err(SetupError::NoPreviousRun { workdir: workdir.clone() })
            }
            SetupMode::Rerun => Ok(()),
            SetupMode::Run if !guard.prior_run() => Ok(()),
            SetupMode::Run => {
                self.phase = self.phase.advance(JobPhase::RerunBlocked)?;
                if !self.config.force {
                    tracing::warn!(
                        workdir = %workdir.display(),
                        "this may be a rerun of an existing job"
                    );
                    return Err(SetupError::RerunConflict { workdir: workdir.clone() });
                }
                guard.clear_history()?;
                self.phase = self.phase.force_reset()?;
                Ok(())
            }
        }
    }

    fn validate(&self) -> Result<Validated, SetupError> {
        let config = &self.config;
        if !config.resources.is_dir() {
            return Err(SetupError::MissingResources { path: config.resources.clone() });
        }

        let submit = match &config.cluster {
            Some(cluster) => {
                let loaded = ClusterConfig::load(&config.resolve(&cluster.config))?;
                Some(loaded.submit_command(cluster.scheduler)?)
            }
            None => None,
        };

        let snippy_version = if config.use_singularity {
            tracing::info!("using containers, skipping dependency checks");
            format!("singularity_{}", self.clock.day())
        } else {
            DependencyChecker::new(&self.probe)
                .check(config.pipeline, config.assembler)?
                .snippy_version
        };

        let species = SpeciesDb::probe(config.kraken_db.as_deref());
        let species_enabled = species.is_usable()
            && (config.use_singularity || self.probe.locate("kraken2").is_some());
        if species.is_usable() && !species_enabled {
            tracing::warn!("kraken2 is not installed, speciation will not be performed");
        }

        let resolve = |p: &Path| config.resolve(p);
        let records = Manifest::load(&resolve(&config.input_file))?.validate()?;
        check_reads_exist(&records, resolve)?;

        let reference = if config.pipeline.requires_reference() {
            let reference = config.reference.as_deref().ok_or(SetupError::MissingReference)?;
            Some(stage_file(&config.workdir, &resolve(reference))?)
        } else {
            None
        };
        let mask = match &config.mask {
            Some(mask) => Some(stage_file(&config.workdir, &resolve(mask))?),
            None => None,
        };

        stage_reads(&config.reads_dir(), &records, resolve)?;
        let isolates = included_isolates(&records);

        Ok(Validated {
            records,
            isolates,
            reference,
            mask,
            snippy_version,
            species,
            species_enabled,
            submit,
        })
    }

    fn record(&self, validated: &Validated) -> Result<(), SetupError> {
        let config = &self.config;
        let workdir = &config.workdir;
        let day = self.clock.day();
        tracing::info!(job_id = %config.job_id, "recording job settings");

        let history = match self.mode {
            SetupMode::Rerun => History::load(workdir)?,
            SetupMode::Run => History::Fresh,
        };
        // An id listed both with and without the marker is included.
        let included: HashSet<&IsolateId> =
            validated.records.iter().filter(|r| !r.excluded).map(|r| &r.id).collect();
        let mut seen = HashSet::new();
        let isolate_rows: Vec<Vec<String>> = validated
            .records
            .iter()
            .filter(|r| !r.excluded || !included.contains(&r.id))
            .filter(|r| seen.insert(r.id.clone()))
            .map(|r| {
                IsolateLogEntry { isolate: r.id.clone(), status: history.status_of(r), date: day.clone() }
                    .to_row()
            })
            .collect();

        let source = SourceRecord {
            job_id: config.job_id.clone(),
            reference: file_name(validated.reference.as_deref()),
            mask: file_name(validated.mask.as_deref()),
            minaln: config.minaln,
            pipeline: config.pipeline,
            cpus: config.cpus,
            assembler: config.assembler,
            date: day.clone(),
            user: self.user.clone(),
            snippy_version: validated.snippy_version.clone(),
            input_file: config.resolve(&config.input_file).display().to_string(),
            prefill_path: config.prefill_path.clone(),
            cluster: config.is_cluster(),
            singularity: config.use_singularity,
            kraken_db: if validated.species_enabled {
                validated.species.logged_path()
            } else {
                String::new()
            },
        };
        LogTable::source(workdir).append(&[source.to_row()])?;
        LogTable::isolates(workdir).append(&isolate_rows)?;

        if let Some(cluster) = &config.cluster {
            let record = ClusterRecord {
                cluster_json: config.resolve(&cluster.config).display().to_string(),
                date: day,
                queue: cluster.scheduler,
            };
            LogTable::cluster(workdir).append(&[record.to_row()])?;
        }
        Ok(())
    }

    fn configure(&self, validated: &Validated) -> Result<(PathBuf, PathBuf), SetupError> {
        let config = &self.config;
        let maskstring = mask_flag(validated.mask.as_deref());
        let params = ConfigParams {
            reference: validated
                .reference
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            cpus: config.cpus,
            job_id: config.job_id.clone(),
            minaln: config.minaln,
            now: self.clock.hour(),
            day: self.clock.day(),
            maskstring: maskstring.clone(),
            isolates: validated.isolates.clone(),
        };
        let species = if validated.species_enabled {
            SpeciesRules::enabled(&config.prefill_path, config.is_cluster())
        } else {
            SpeciesRules::disabled()
        };
        let snakefile = SnakefileParams {
            pipeline: config.pipeline,
            workdir: config.job_dir(),
            resources: config.resources.clone(),
            prefill_path: config.prefill_path.clone(),
            singularity_dir: config.singularity_path.clone(),
            job_id: config.job_id.clone(),
            assembler: config.assembler,
            maskstring,
            species,
        };
        let rendered = RenderedArtifacts::render(&config.resources, &params, &snakefile)?;
        Ok(rendered.write(&config.job_dir())?)
    }

    fn command(&self, validated: &Validated) -> WorkflowCommand {
        let config = &self.config;
        let command = match (&config.cluster, &validated.submit) {
            (Some(cluster), Some(submit)) => {
                WorkflowCommand::cluster(SNAKEFILE, config.resolve(&cluster.config), submit.clone())
            }
            _ => WorkflowCommand::local(SNAKEFILE, config.cpus),
        };
        command
            .dry_run(config.dry_run)
            .force(config.force || self.mode == SetupMode::Rerun)
            .singularity(config.use_singularity)
    }
}

fn file_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "setup_tests.rs"]
mod tests;
