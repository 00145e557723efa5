// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn happy_path_reaches_done() {
    let phase = JobPhase::Fresh
        .advance(JobPhase::ChecksPassed)
        .and_then(|p| p.advance(JobPhase::Configured))
        .and_then(|p| p.advance(JobPhase::Executing))
        .and_then(|p| p.advance(JobPhase::Done))
        .unwrap();
    assert_eq!(phase, JobPhase::Done);
    assert!(phase.is_terminal());
}

#[yare::parameterized(
    skip_checks     = { JobPhase::Fresh,        JobPhase::Configured },
    skip_render     = { JobPhase::ChecksPassed, JobPhase::Executing },
    back_to_fresh   = { JobPhase::Configured,   JobPhase::Fresh },
    done_to_failed  = { JobPhase::Done,         JobPhase::Failed },
    blocked_onwards = { JobPhase::RerunBlocked, JobPhase::ChecksPassed },
    failed_to_done  = { JobPhase::Failed,       JobPhase::Done },
)]
fn invalid_edges_are_rejected(from: JobPhase, to: JobPhase) {
    assert_eq!(from.advance(to), Err(PhaseError { from, to }));
}

#[yare::parameterized(
    fresh      = { JobPhase::Fresh },
    checked    = { JobPhase::ChecksPassed },
    configured = { JobPhase::Configured },
    executing  = { JobPhase::Executing },
)]
fn any_live_phase_can_fail(from: JobPhase) {
    assert_eq!(from.advance(JobPhase::Failed), Ok(JobPhase::Failed));
}

#[test]
fn rerun_blocked_is_terminal_until_forced() {
    let blocked = JobPhase::Fresh.advance(JobPhase::RerunBlocked).unwrap();
    assert!(blocked.is_terminal());
    assert_eq!(blocked.force_reset(), Ok(JobPhase::Fresh));
}

#[test]
fn force_reset_refuses_mid_run() {
    assert!(JobPhase::Executing.force_reset().is_err());
}

#[test]
fn display_uses_kebab_names() {
    assert_eq!(JobPhase::ChecksPassed.to_string(), "checks-passed");
    assert_eq!(JobPhase::RerunBlocked.to_string(), "rerun-blocked");
    let err = JobPhase::Done.advance(JobPhase::Executing).unwrap_err();
    assert_eq!(err.to_string(), "job can not move from done to executing");
}
