// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bohra-workflow: renders the workflow engine's inputs
//!
//! Everything here is pure text generation: templates in, Snakefile,
//! config.yaml and command lines out. Nothing is executed.

pub mod artifacts;
pub mod cluster;
pub mod command;
pub mod species;
pub mod template;

pub use artifacts::{
    mask_flag, ArtifactError, ConfigParams, RenderedArtifacts, SnakefileParams, CONFIG_FILE,
    CONFIG_TEMPLATE, SNAKEFILE,
};
pub use cluster::{ClusterConfig, ClusterError, DEFAULT_SECTION};
pub use command::{WorkflowCommand, CLUSTER_JOBS, LATENCY_WAIT_SECS};
pub use species::SpeciesRules;
pub use template::{interpolate, unresolved_placeholders};
