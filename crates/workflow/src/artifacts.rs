// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snakefile and config.yaml rendering.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use bohra_core::{Assembler, IsolateId, JobId, PipelineMode};
use thiserror::Error;

use crate::species::SpeciesRules;
use crate::template::{interpolate, unresolved_placeholders};

/// Parameter file template in the resources directory.
pub const CONFIG_TEMPLATE: &str = "config_snippy.yaml";
/// Rendered parameter file name inside the job directory.
pub const CONFIG_FILE: &str = "config.yaml";
/// Rendered workflow definition name inside the job directory.
pub const SNAKEFILE: &str = "Snakefile";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not read template {}: {source}", path.display())]
    ReadTemplate { path: PathBuf, source: std::io::Error },
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
}

/// Values substituted into the parameter file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigParams {
    /// Absolute path of the staged reference (empty for assembly-only jobs)
    pub reference: String,
    pub cpus: u32,
    pub job_id: JobId,
    pub minaln: u32,
    pub now: String,
    pub day: String,
    pub maskstring: String,
    pub isolates: Vec<IsolateId>,
}

impl ConfigParams {
    pub fn vars(&self) -> HashMap<String, String> {
        let isolates: Vec<&str> = self.isolates.iter().map(|i| i.as_str()).collect();
        HashMap::from([
            ("reference".to_string(), self.reference.clone()),
            ("cpus".to_string(), self.cpus.to_string()),
            ("name".to_string(), self.job_id.to_string()),
            ("minperc".to_string(), self.minaln.to_string()),
            ("now".to_string(), self.now.clone()),
            ("day".to_string(), self.day.clone()),
            ("maskstring".to_string(), self.maskstring.clone()),
            ("isolates".to_string(), isolates.join(" ")),
        ])
    }
}

/// Values substituted into the workflow definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakefileParams {
    pub pipeline: PipelineMode,
    /// The job directory the workflow runs in
    pub workdir: PathBuf,
    pub resources: PathBuf,
    pub prefill_path: String,
    pub singularity_dir: String,
    pub job_id: JobId,
    pub assembler: Assembler,
    pub maskstring: String,
    pub species: SpeciesRules,
}

impl SnakefileParams {
    pub fn vars(&self) -> HashMap<String, String> {
        let assembler = if self.pipeline.runs_assembly() {
            self.assembler.as_str()
        } else {
            "no_assembler"
        };
        let run_kraken = if self.species.is_enabled() { "True" } else { "False" };
        HashMap::from([
            ("workdir".to_string(), self.workdir.display().to_string()),
            ("script_path".to_string(), self.resources.join("utils").display().to_string()),
            ("template_path".to_string(), self.resources.join("templates").display().to_string()),
            ("prefill_path".to_string(), self.prefill_path.clone()),
            ("singularity_dir".to_string(), self.singularity_dir.clone()),
            ("job_id".to_string(), self.job_id.to_string()),
            ("assembler".to_string(), assembler.to_string()),
            ("run_kraken".to_string(), run_kraken.to_string()),
            ("maskstring".to_string(), self.maskstring.clone()),
            ("kraken_output".to_string(), self.species.output.clone()),
            ("kraken_rule".to_string(), self.species.rule.clone()),
            ("kraken_summary".to_string(), self.species.summary.clone()),
            ("species_report".to_string(), self.species.report.clone()),
            ("species_summary".to_string(), self.species.summary_target.clone()),
            ("copy_species_id".to_string(), self.species.copy.clone()),
        ])
    }
}

/// `--mask <path>` for the core alignment step, or empty without a mask.
pub fn mask_flag(mask: Option<&Path>) -> String {
    match mask {
        Some(path) => format!("--mask {}", path.display()),
        None => String::new(),
    }
}

/// Rendered workflow inputs, ready to be written into the job directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    pub snakefile: String,
    pub config: String,
}

impl RenderedArtifacts {
    /// Render both templates from `resources`.
    pub fn render(
        resources: &Path,
        config: &ConfigParams,
        snakefile: &SnakefileParams,
    ) -> Result<Self, ArtifactError> {
        let config_text = render_file(&resources.join(CONFIG_TEMPLATE), &config.vars())?;
        let snakefile_text =
            render_file(&resources.join(snakefile.pipeline.snakefile_template()), &snakefile.vars())?;
        Ok(Self { snakefile: snakefile_text, config: config_text })
    }

    /// Write `Snakefile` and `config.yaml` into `job_dir`, creating it if
    /// needed. Existing files are replaced.
    pub fn write(&self, job_dir: &Path) -> Result<(PathBuf, PathBuf), ArtifactError> {
        fs::create_dir_all(job_dir)
            .map_err(|source| ArtifactError::Write { path: job_dir.to_path_buf(), source })?;
        let snakefile = job_dir.join(SNAKEFILE);
        let config = job_dir.join(CONFIG_FILE);
        fs::write(&config, &self.config)
            .map_err(|source| ArtifactError::Write { path: config.clone(), source })?;
        tracing::info!(path = %config.display(), "config file written");
        fs::write(&snakefile, &self.snakefile)
            .map_err(|source| ArtifactError::Write { path: snakefile.clone(), source })?;
        tracing::info!(path = %snakefile.display(), "Snakefile written");
        Ok((snakefile, config))
    }
}

fn render_file(path: &Path, vars: &HashMap<String, String>) -> Result<String, ArtifactError> {
    let template = fs::read_to_string(path)
        .map_err(|source| ArtifactError::ReadTemplate { path: path.to_path_buf(), source })?;
    let unresolved = unresolved_placeholders(&template, vars);
    if !unresolved.is_empty() {
        tracing::debug!(
            template = %path.display(),
            names = ?unresolved,
            "placeholders left for the workflow engine"
        );
    }
    Ok(interpolate(&template, vars))
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
