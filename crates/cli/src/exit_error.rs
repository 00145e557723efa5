// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! so that `main()` owns process termination.

use std::fmt;

use bohra_engine::SetupError;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Bad flags, settings or paths.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(bohra_engine::ErrorKind::Configuration.exit_code(), message)
    }
}

impl From<SetupError> for ExitError {
    fn from(err: SetupError) -> Self {
        Self::new(err.kind().exit_code(), err.to_string())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
