// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow engine invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use bohra_workflow::WorkflowCommand;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("could not start {program}: {source}")]
    Spawn { program: String, source: io::Error },
    #[error("{program} exited with status {code}")]
    Failed { program: String, code: i32 },
    #[error("{program} was terminated by a signal")]
    Killed { program: String },
}

/// Runs an external program to completion.
pub trait ProcessRunner {
    /// Run `program` in `cwd` with inherited stdio. Returns the exit code,
    /// or `None` when the process was killed by a signal.
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<Option<i32>>;
}

/// Spawns real processes with an explicit search path.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    search_path: Option<std::ffi::OsString>,
}

impl SystemRunner {
    pub fn new(search_path: impl Into<std::ffi::OsString>) -> Self {
        Self { search_path: Some(search_path.into()) }
    }

    fn resolve(&self, program: &str) -> PathBuf {
        let found = self.search_path.as_ref().and_then(|sp| {
            std::env::split_paths(sp).map(|d| d.join(program)).find(|p| p.is_file())
        });
        found.unwrap_or_else(|| PathBuf::from(program))
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<Option<i32>> {
        let mut command = Command::new(self.resolve(program));
        command.args(args).current_dir(cwd);
        if let Some(search_path) = &self.search_path {
            command.env("PATH", search_path);
        }
        let status = command.status()?;
        Ok(status.code())
    }
}

/// Run the workflow engine in `cwd` and map its exit status.
pub fn run_workflow<R: ProcessRunner>(
    runner: &R,
    command: &WorkflowCommand,
    cwd: &Path,
) -> Result<(), RunnerError> {
    let program = command.program();
    tracing::info!(cwd = %cwd.display(), command = %command.display(), "running workflow");
    let code = runner
        .run(program, &command.args(), cwd)
        .map_err(|source| RunnerError::Spawn { program: program.to_string(), source })?;
    match code {
        Some(0) => {
            tracing::info!(program, "workflow finished");
            Ok(())
        }
        Some(code) => {
            tracing::warn!(program, code, "workflow failed");
            Err(RunnerError::Failed { program: program.to_string(), code })
        }
        None => {
            tracing::warn!(program, "workflow killed");
            Err(RunnerError::Killed { program: program.to_string() })
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
