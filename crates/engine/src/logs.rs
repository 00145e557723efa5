// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only run logs kept in the working directory.
//!
//! Each log is a tab-separated table. The header is written when the file
//! is created, and every run appends rows without touching earlier ones.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use bohra_core::{Assembler, IsolateId, IsolateStatus, JobId, PipelineMode, Scheduler};
use thiserror::Error;

/// One row per run; its presence marks the working directory as used.
pub const SOURCE_LOG: &str = "source.log";
/// One row per manifest isolate per run.
pub const ISOLATE_LOG: &str = "isolates.log";
/// One row per cluster run.
pub const CLUSTER_LOG: &str = "cluster.log";

const SOURCE_COLUMNS: &[&str] = &[
    "JobID",
    "Reference",
    "Mask",
    "MinAln",
    "Pipeline",
    "CPUS",
    "Assembler",
    "Date",
    "User",
    "snippy_version",
    "input_file",
    "prefillpath",
    "cluster",
    "singularity",
    "kraken_db",
];
const ISOLATE_COLUMNS: &[&str] = &["Isolate", "Status", "Date"];
const CLUSTER_COLUMNS: &[&str] = &["cluster_json", "Date", "queue"];

#[derive(Debug, Error)]
pub enum LogTableError {
    #[error("could not write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("could not read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: std::io::Error },
    #[error("{} row has {found} cells, expected {expected}", path.display())]
    Width { path: PathBuf, expected: usize, found: usize },
    #[error("{} has no rows", path.display())]
    Empty { path: PathBuf },
    #[error("log column {column} is missing")]
    MissingColumn { column: &'static str },
    #[error("log column {column} has invalid value '{value}'")]
    BadValue { column: &'static str, value: String },
}

/// A tab-separated log with a fixed header.
#[derive(Debug, Clone)]
pub struct LogTable {
    path: PathBuf,
    columns: &'static [&'static str],
}

impl LogTable {
    pub fn source(workdir: &Path) -> Self {
        Self { path: workdir.join(SOURCE_LOG), columns: SOURCE_COLUMNS }
    }

    pub fn isolates(workdir: &Path) -> Self {
        Self { path: workdir.join(ISOLATE_LOG), columns: ISOLATE_COLUMNS }
    }

    pub fn cluster(workdir: &Path) -> Self {
        Self { path: workdir.join(CLUSTER_LOG), columns: CLUSTER_COLUMNS }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append rows, writing the header first if the file is new or empty.
    pub fn append(&self, rows: &[Vec<String>]) -> Result<(), LogTableError> {
        for row in rows {
            if row.len() != self.columns.len() {
                return Err(LogTableError::Width {
                    path: self.path.clone(),
                    expected: self.columns.len(),
                    found: row.len(),
                });
            }
        }
        self.write_rows(rows)
            .map_err(|source| LogTableError::Write { path: self.path.clone(), source })?;
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "log appended");
        Ok(())
    }

    fn write_rows(&self, rows: &[Vec<String>]) -> std::io::Result<()> {
        let needs_header = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if needs_header {
            writeln!(file, "{}", self.columns.join("\t"))?;
        }
        for row in rows {
            let cells: Vec<String> = row.iter().map(|c| sanitize(c)).collect();
            writeln!(file, "{}", cells.join("\t"))?;
        }
        Ok(())
    }

    /// Every data row keyed by the file's own header. Rows shorter than the
    /// header leave the trailing columns absent.
    pub fn read(&self) -> Result<Vec<HashMap<String, String>>, LogTableError> {
        let text = fs::read_to_string(&self.path)
            .map_err(|source| LogTableError::Read { path: self.path.clone(), source })?;
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());
        let Some(header) = lines.next() else {
            return Ok(Vec::new());
        };
        let header: Vec<&str> = header.split('\t').collect();
        Ok(lines
            .map(|line| {
                header
                    .iter()
                    .zip(line.split('\t'))
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .collect())
    }

    /// The most recent row.
    pub fn last(&self) -> Result<HashMap<String, String>, LogTableError> {
        self.read()?
            .pop()
            .ok_or_else(|| LogTableError::Empty { path: self.path.clone() })
    }

    /// Delete the log. Returns whether it existed.
    pub fn remove(&self) -> Result<bool, LogTableError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "log removed");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LogTableError::Remove { path: self.path.clone(), source }),
        }
    }
}

/// Tabs and newlines would break the row structure.
fn sanitize(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}

fn bool_cell(value: bool) -> String {
    let cell = if value { "True" } else { "False" };
    cell.to_string()
}

fn parse_bool(column: &'static str, value: &str) -> Result<bool, LogTableError> {
    match value {
        "True" | "true" => Ok(true),
        "False" | "false" | "" => Ok(false),
        other => Err(LogTableError::BadValue { column, value: other.to_string() }),
    }
}

fn required<'a>(
    row: &'a HashMap<String, String>,
    column: &'static str,
) -> Result<&'a str, LogTableError> {
    row.get(column).map(String::as_str).ok_or(LogTableError::MissingColumn { column })
}

fn optional<'a>(row: &'a HashMap<String, String>, column: &'static str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

fn parsed<T: std::str::FromStr>(
    row: &HashMap<String, String>,
    column: &'static str,
) -> Result<T, LogTableError> {
    let value = required(row, column)?;
    value
        .parse()
        .map_err(|_| LogTableError::BadValue { column, value: value.to_string() })
}

/// A `source.log` row: the settings a run was started with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRecord {
    pub job_id: JobId,
    /// Staged reference file name, empty for assembly-only runs
    pub reference: String,
    /// Staged mask file name, empty without a mask
    pub mask: String,
    pub minaln: u32,
    pub pipeline: PipelineMode,
    pub cpus: u32,
    pub assembler: Assembler,
    pub date: String,
    pub user: String,
    pub snippy_version: String,
    pub input_file: String,
    pub prefill_path: String,
    pub cluster: bool,
    pub singularity: bool,
    pub kraken_db: String,
}

impl SourceRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.job_id.to_string(),
            self.reference.clone(),
            self.mask.clone(),
            self.minaln.to_string(),
            self.pipeline.to_string(),
            self.cpus.to_string(),
            self.assembler.to_string(),
            self.date.clone(),
            self.user.clone(),
            self.snippy_version.clone(),
            self.input_file.clone(),
            self.prefill_path.clone(),
            bool_cell(self.cluster),
            bool_cell(self.singularity),
            self.kraken_db.clone(),
        ]
    }

    pub fn from_row(row: &HashMap<String, String>) -> Result<Self, LogTableError> {
        Ok(Self {
            job_id: parsed(row, "JobID")?,
            reference: optional(row, "Reference").to_string(),
            mask: optional(row, "Mask").to_string(),
            minaln: parsed(row, "MinAln")?,
            pipeline: parsed(row, "Pipeline")?,
            cpus: parsed(row, "CPUS")?,
            assembler: parsed(row, "Assembler")?,
            date: optional(row, "Date").to_string(),
            user: optional(row, "User").to_string(),
            snippy_version: optional(row, "snippy_version").to_string(),
            input_file: required(row, "input_file")?.to_string(),
            prefill_path: optional(row, "prefillpath").to_string(),
            cluster: parse_bool("cluster", optional(row, "cluster"))?,
            singularity: parse_bool("singularity", optional(row, "singularity"))?,
            kraken_db: optional(row, "kraken_db").to_string(),
        })
    }
}

/// An `isolates.log` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsolateLogEntry {
    pub isolate: IsolateId,
    pub status: IsolateStatus,
    pub date: String,
}

impl IsolateLogEntry {
    pub fn to_row(&self) -> Vec<String> {
        vec![self.isolate.to_string(), self.status.to_string(), self.date.clone()]
    }

    pub fn from_row(row: &HashMap<String, String>) -> Result<Self, LogTableError> {
        Ok(Self {
            isolate: parsed(row, "Isolate")?,
            status: parsed(row, "Status")?,
            date: optional(row, "Date").to_string(),
        })
    }
}

/// A `cluster.log` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRecord {
    pub cluster_json: String,
    pub date: String,
    pub queue: Scheduler,
}

impl ClusterRecord {
    pub fn to_row(&self) -> Vec<String> {
        vec![self.cluster_json.clone(), self.date.clone(), self.queue.to_string()]
    }

    pub fn from_row(row: &HashMap<String, String>) -> Result<Self, LogTableError> {
        Ok(Self {
            cluster_json: required(row, "cluster_json")?.to_string(),
            date: optional(row, "Date").to_string(),
            queue: parsed(row, "queue")?,
        })
    }
}

#[cfg(test)]
#[path = "logs_tests.rs"]
mod tests;
