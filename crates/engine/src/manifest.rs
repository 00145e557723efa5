// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input manifest parsing and validation.
//!
//! A manifest has no header and one isolate per line:
//!
//! ```text
//! 2026-0001	/seq/2026-0001_R1.fq.gz	/seq/2026-0001_R2.fq.gz
//! #2026-0002	/seq/2026-0002_R1.fq.gz	/seq/2026-0002_R2.fq.gz
//! ```
//!
//! Cells are tab-separated, or comma-separated when the first line has no
//! tab. An id containing `#` excludes the isolate from the run; excluded
//! rows still count towards the minimum.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bohra_core::{IdError, IsolateId, IsolateRecord};
use thiserror::Error;

/// Fewest isolates a job may contain.
pub const MIN_ISOLATES: usize = 4;

const COLUMNS: usize = 3;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read input file {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{} has {found} columns, expected 3 (isolate, read 1, read 2)", path.display())]
    Columns { path: PathBuf, found: usize },
    #[error("{} contains {found} isolates, the minimum is {MIN_ISOLATES}", path.display())]
    TooFewIsolates { path: PathBuf, found: usize },
    #[error("{} is missing data on line {line}", path.display())]
    Incomplete { path: PathBuf, line: usize },
    #[error("{} line {line}: {source}", path.display())]
    BadIsolateId { path: PathBuf, line: usize, source: IdError },
    #[error("read file {} does not exist", path.display())]
    MissingRead { path: PathBuf },
}

impl ManifestError {
    /// True for errors about the table's shape and content, as opposed to
    /// the files it points at.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ManifestError::Columns { .. }
                | ManifestError::TooFewIsolates { .. }
                | ManifestError::Incomplete { .. }
                | ManifestError::BadIsolateId { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    /// 1-based line number in the file
    line: usize,
    cells: Vec<String>,
}

/// A parsed, not yet validated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    source: PathBuf,
    rows: Vec<Row>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
        Ok(Self::parse(path, &text))
    }

    /// Split `text` into rows; `source` is only used for messages.
    pub fn parse(source: &Path, text: &str) -> Self {
        let delimiter = text
            .lines()
            .find(|l| !l.trim().is_empty())
            .map(|l| if l.contains('\t') { '\t' } else { ',' })
            .unwrap_or('\t');
        let rows = text
            .lines()
            .enumerate()
            .filter(|(_, l)| !l.trim().is_empty())
            .map(|(i, l)| Row {
                line: i + 1,
                cells: l.split(delimiter).map(|c| c.trim().to_string()).collect(),
            })
            .collect();
        Self { source: source.to_path_buf(), rows }
    }

    /// Table width: the widest row.
    pub fn columns(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check shape and content, in order: column count, isolate count,
    /// empty cells. Returns every row, excluded ones included.
    pub fn validate(&self) -> Result<Vec<IsolateRecord>, ManifestError> {
        tracing::info!(path = %self.source.display(), "checking input file structure");
        let columns = self.columns();
        if columns != COLUMNS {
            return Err(ManifestError::Columns { path: self.source.clone(), found: columns });
        }
        if self.rows.len() < MIN_ISOLATES {
            return Err(ManifestError::TooFewIsolates {
                path: self.source.clone(),
                found: self.rows.len(),
            });
        }
        if let Some(row) = self
            .rows
            .iter()
            .find(|r| r.cells.len() < COLUMNS || r.cells.iter().any(|c| c.is_empty()))
        {
            return Err(ManifestError::Incomplete { path: self.source.clone(), line: row.line });
        }

        self.rows
            .iter()
            .map(|row| {
                IsolateRecord::from_cells(&row.cells[0], &row.cells[1], &row.cells[2]).map_err(
                    |source| ManifestError::BadIsolateId {
                        path: self.source.clone(),
                        line: row.line,
                        source,
                    },
                )
            })
            .collect()
    }
}

/// Every read of every included isolate must exist. Checked before anything
/// is staged.
pub fn check_reads_exist(
    records: &[IsolateRecord],
    resolve: impl Fn(&Path) -> PathBuf,
) -> Result<(), ManifestError> {
    tracing::info!("checking that all read files exist");
    for record in records.iter().filter(|r| !r.excluded) {
        for read in [&record.read1, &record.read2] {
            let path = resolve(read);
            if !path.exists() {
                tracing::warn!(isolate = %record.id, path = %path.display(), "read file missing");
                return Err(ManifestError::MissingRead { path });
            }
        }
    }
    Ok(())
}

/// Ids of included isolates in manifest order. A repeated id keeps its
/// first occurrence.
pub fn included_isolates(records: &[IsolateRecord]) -> Vec<IsolateId> {
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for record in records.iter().filter(|r| !r.excluded) {
        if seen.insert(record.id.clone()) {
            ids.push(record.id.clone());
        } else {
            tracing::warn!(isolate = %record.id, "isolate listed more than once, keeping the first entry");
        }
    }
    ids
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
