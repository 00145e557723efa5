// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External tool dependency checks.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::sync::LazyLock;

use bohra_core::{Assembler, PipelineMode};
use regex::Regex;
use thiserror::Error;

/// Tools every SNP-calling mode needs, `snippy` itself first.
const SNIPPY_TOOLS: &[&str] = &["snippy", "snippy-core", "snp-dists", "iqtree"];
/// Tools every assembly mode needs besides the assembler.
const ASSEMBLY_TOOLS: &[&str] = &["mlst", "kraken2", "abricate", "prokka"];
const PANGENOME_TOOL: &str = "roary";

#[allow(clippy::expect_used)]
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bv?(\d+)\.(\d+)\.(\d+)(?:\.(\d+))?\b").expect("constant regex pattern is valid")
});

#[derive(Debug, Error)]
pub enum DependencyError {
    #[error("{tool} is not installed, please check dependencies and try again")]
    Missing { tool: String },
    #[error("{tool} is installed but could not be run: {source}")]
    Unrunnable { tool: String, source: io::Error },
}

/// Finds executables and asks them for their version.
pub trait ToolProbe {
    /// Full path of `tool` if it is installed.
    fn locate(&self, tool: &str) -> Option<PathBuf>;

    /// Combined output of `tool --version`, stderr first.
    fn version_output(&self, tool: &str) -> io::Result<String>;
}

/// Probe against a search path captured at startup.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    search_path: OsString,
}

impl SystemProbe {
    pub fn new(search_path: impl Into<OsString>) -> Self {
        Self { search_path: search_path.into() }
    }
}

impl ToolProbe for SystemProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        std::env::split_paths(&self.search_path)
            .map(|dir| dir.join(tool))
            .find(|candidate| is_executable(candidate))
    }

    fn version_output(&self, tool: &str) -> io::Result<String> {
        let path = self
            .locate(tool)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, tool.to_string()))?;
        let output = Command::new(path)
            .arg("--version")
            .env("PATH", &self.search_path)
            .output()?;
        Ok(format!(
            "{}\n{}",
            String::from_utf8_lossy(&output.stderr),
            String::from_utf8_lossy(&output.stdout)
        ))
    }
}

fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// First `major.minor.patch[.build]` version in `output`.
pub fn parse_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .find(output)
        .map(|m| m.as_str().trim_start_matches('v').to_string())
}

/// Tools a pipeline needs, each listed once, in checking order.
pub fn required_tools(pipeline: PipelineMode, assembler: Assembler) -> Vec<&'static str> {
    let mut tools = Vec::new();
    if pipeline.runs_snippy() {
        tools.extend_from_slice(SNIPPY_TOOLS);
    }
    if pipeline.runs_assembly() {
        tools.push(assembler.executable());
        tools.extend_from_slice(ASSEMBLY_TOOLS);
    }
    if pipeline.runs_pangenome() {
        tools.push(PANGENOME_TOOL);
    }
    let mut seen = std::collections::HashSet::new();
    tools.retain(|t| seen.insert(*t));
    tools
}

/// Installed tools and the snippy version they were checked with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolReport {
    /// Empty when the pipeline does not call SNPs
    pub snippy_version: String,
    pub tools: Vec<(String, PathBuf)>,
}

impl ToolReport {
    pub fn has(&self, tool: &str) -> bool {
        self.tools.iter().any(|(name, _)| name == tool)
    }
}

/// Checks that a pipeline's tools are installed.
pub struct DependencyChecker<'a, P: ToolProbe> {
    probe: &'a P,
}

impl<'a, P: ToolProbe> DependencyChecker<'a, P> {
    pub fn new(probe: &'a P) -> Self {
        Self { probe }
    }

    /// Locate every required tool, failing on the first one missing, then
    /// record the snippy version.
    pub fn check(
        &self,
        pipeline: PipelineMode,
        assembler: Assembler,
    ) -> Result<ToolReport, DependencyError> {
        tracing::info!(pipeline = %pipeline, "checking software dependencies");
        let mut report = ToolReport::default();
        for tool in required_tools(pipeline, assembler) {
            let Some(path) = self.probe.locate(tool) else {
                tracing::warn!(tool, "not installed");
                return Err(DependencyError::Missing { tool: tool.to_string() });
            };
            tracing::info!(tool, path = %path.display(), "installed");
            report.tools.push((tool.to_string(), path));
        }
        if pipeline.runs_snippy() {
            report.snippy_version = self.snippy_version()?;
        }
        Ok(report)
    }

    fn snippy_version(&self) -> Result<String, DependencyError> {
        let output = self
            .probe
            .version_output("snippy")
            .map_err(|source| DependencyError::Unrunnable { tool: "snippy".to_string(), source })?;
        match parse_version(&output) {
            Some(version) => {
                tracing::info!(version = %version, "snippy found");
                Ok(version)
            }
            None => {
                tracing::warn!(output = %output.trim(), "could not read the snippy version");
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
#[path = "deps_tests.rs"]
mod tests;
