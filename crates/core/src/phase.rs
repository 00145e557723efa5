// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job phase state machine.
//!
//! ```text
//! fresh ──validate──▶ checks-passed ──render──▶ configured ──launch──▶ executing ──▶ done
//!   │                     │                        │                     └─────────▶ failed
//!   ▼                     └────────────────────────┴──────────────────────────────▶ failed
//! rerun-blocked ──force──▶ fresh
//! ```

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JobPhase {
    #[default]
    Fresh,
    ChecksPassed,
    Configured,
    Executing,
    Done,
    Failed,
    /// A previous run's source log exists and force was not given
    RerunBlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job can not move from {from} to {to}")]
pub struct PhaseError {
    pub from: JobPhase,
    pub to: JobPhase,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Done | JobPhase::Failed | JobPhase::RerunBlocked)
    }

    /// Move to `next` if the edge exists.
    pub fn advance(self, next: JobPhase) -> Result<JobPhase, PhaseError> {
        use JobPhase::*;
        let allowed = match (self, next) {
            (Fresh, ChecksPassed) | (Fresh, RerunBlocked) => true,
            (ChecksPassed, Configured) => true,
            (Configured, Executing) => true,
            (Executing, Done) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        };
        if allowed {
            Ok(next)
        } else {
            Err(PhaseError { from: self, to: next })
        }
    }

    /// Leave `rerun-blocked` after prior history has been cleared.
    pub fn force_reset(self) -> Result<JobPhase, PhaseError> {
        match self {
            JobPhase::RerunBlocked | JobPhase::Fresh => Ok(JobPhase::Fresh),
            other => Err(PhaseError { from: other, to: JobPhase::Fresh }),
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobPhase::Fresh => "fresh",
            JobPhase::ChecksPassed => "checks-passed",
            JobPhase::Configured => "configured",
            JobPhase::Executing => "executing",
            JobPhase::Done => "done",
            JobPhase::Failed => "failed",
            JobPhase::RerunBlocked => "rerun-blocked",
        })
    }
}

#[cfg(test)]
#[path = "phase_tests.rs"]
mod tests;
