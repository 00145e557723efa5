// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow engine command line.

use std::path::PathBuf;

/// Concurrent cluster jobs the engine may have queued.
pub const CLUSTER_JOBS: u32 = 999;
/// Seconds the engine waits for outputs to appear on shared filesystems.
pub const LATENCY_WAIT_SECS: u32 = 1200;

const PROGRAM: &str = "snakemake";

/// How the engine dispatches work.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Dispatch {
    Local { cores: u32 },
    Cluster { config: PathBuf, submit: String },
}

/// A `snakemake` invocation, built up then turned into argv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCommand {
    snakefile: String,
    dispatch: Dispatch,
    dry_run: bool,
    force: bool,
    singularity: bool,
}

impl WorkflowCommand {
    /// Run locally on `cores` cores.
    pub fn local(snakefile: impl Into<String>, cores: u32) -> Self {
        Self {
            snakefile: snakefile.into(),
            dispatch: Dispatch::Local { cores },
            dry_run: false,
            force: false,
            singularity: false,
        }
    }

    /// Submit each rule through a scheduler.
    ///
    /// `submit` is the scheduler command with its flags, see
    /// [`ClusterConfig::submit_command`](crate::ClusterConfig::submit_command).
    pub fn cluster(snakefile: impl Into<String>, config: PathBuf, submit: impl Into<String>) -> Self {
        Self {
            snakefile: snakefile.into(),
            dispatch: Dispatch::Cluster { config, submit: submit.into() },
            dry_run: false,
            force: false,
            singularity: false,
        }
    }

    /// Print what would run without running it. Ignored on a cluster.
    pub fn dry_run(mut self, on: bool) -> Self {
        self.dry_run = on;
        self
    }

    /// Rerun every rule regardless of existing outputs.
    pub fn force(mut self, on: bool) -> Self {
        self.force = on;
        self
    }

    /// Run rules in their containers.
    pub fn singularity(mut self, on: bool) -> Self {
        self.singularity = on;
        self
    }

    pub fn program(&self) -> &'static str {
        PROGRAM
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self.dispatch, Dispatch::Cluster { .. })
    }

    /// Arguments after the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match &self.dispatch {
            Dispatch::Local { cores } => {
                if self.dry_run {
                    args.push("-np".to_string());
                }
                args.extend(["-s".to_string(), self.snakefile.clone()]);
                args.extend(["--cores".to_string(), cores.to_string()]);
            }
            Dispatch::Cluster { config, submit } => {
                args.extend(["-j".to_string(), CLUSTER_JOBS.to_string()]);
                args.extend(["--cluster-config".to_string(), config.display().to_string()]);
                args.extend(["--cluster".to_string(), submit.clone()]);
                args.extend(["-s".to_string(), self.snakefile.clone()]);
            }
        }
        if self.force {
            args.push("-F".to_string());
        }
        if self.singularity {
            args.push("--use-singularity".to_string());
            args.extend(["--singularity-args".to_string(), "--bind /home".to_string()]);
        }
        if self.is_cluster() {
            args.extend(["--latency-wait".to_string(), LATENCY_WAIT_SECS.to_string()]);
        }
        args
    }

    /// Shell-like rendering for logs. Arguments containing spaces are
    /// single-quoted.
    pub fn display(&self) -> String {
        let mut out = PROGRAM.to_string();
        for arg in self.args() {
            out.push(' ');
            if arg.contains(' ') {
                out.push('\'');
                out.push_str(&arg);
                out.push('\'');
            } else {
                out.push_str(&arg);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
