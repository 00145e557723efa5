// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Isolate records parsed from the input manifest.

use crate::id::{IdError, IsolateId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// An isolate id containing this character is excluded from the run.
pub const EXCLUSION_MARKER: char = '#';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not an isolate status")]
pub struct ParseStatusError(pub String);

impl From<String> for ParseStatusError {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Inclusion status written to the isolate log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IsolateStatus {
    Included,
    /// New since the previous run (rerun only)
    Added,
    Removed,
}

crate::str_enum! {
    IsolateStatus, ParseStatusError {
        Included => "INCLUDED",
        Added => "ADDED",
        Removed => "REMOVED",
    }
}

impl IsolateStatus {
    /// Whether an isolate with this status takes part in the run.
    pub fn is_active(&self) -> bool {
        !matches!(self, IsolateStatus::Removed)
    }
}

/// One manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolateRecord {
    pub id: IsolateId,
    pub read1: PathBuf,
    pub read2: PathBuf,
    /// The raw id carried the exclusion marker
    pub excluded: bool,
}

impl IsolateRecord {
    /// Build a record from raw manifest cells. The exclusion marker is
    /// stripped from the id wherever it appears. An excluded row whose id is
    /// nothing but markers keeps the raw text as a placeholder id.
    pub fn from_cells(raw_id: &str, read1: &str, read2: &str) -> Result<Self, IdError> {
        let excluded = raw_id.contains(EXCLUSION_MARKER);
        let cleaned: String = raw_id.chars().filter(|c| *c != EXCLUSION_MARKER).collect();
        let id = if excluded && cleaned.trim().is_empty() { raw_id } else { cleaned.as_str() };
        Ok(Self {
            id: IsolateId::parse(id)?,
            read1: PathBuf::from(read1.trim()),
            read2: PathBuf::from(read2.trim()),
            excluded,
        })
    }

    /// Status for a fresh run.
    pub fn status(&self) -> IsolateStatus {
        if self.excluded {
            IsolateStatus::Removed
        } else {
            IsolateStatus::Included
        }
    }
}

#[cfg(test)]
#[path = "isolate_tests.rs"]
mod tests;
