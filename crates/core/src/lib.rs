// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bohra-core: domain vocabulary for the bohra pipeline coordinator

pub mod macros;

pub mod clock;
pub mod id;
pub mod isolate;
pub mod job;
pub mod phase;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdError, IsolateId, JobId};
pub use isolate::{IsolateRecord, IsolateStatus, ParseStatusError, EXCLUSION_MARKER};
#[cfg(any(test, feature = "test-support"))]
pub use job::JobConfigBuilder;
pub use job::{
    Assembler, ClusterSettings, JobConfig, ParseAssemblerError, ParseModeError,
    ParseSchedulerError, PipelineMode, Scheduler,
};
pub use phase::{JobPhase, PhaseError};
