// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Species classification database probe.

use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of inspecting a kraken2 database directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesDb {
    /// No database was configured.
    Unset,
    /// A directory with at least one file and no empty files.
    Usable(PathBuf),
    /// Configured but not usable; species identification is skipped.
    Unusable { path: PathBuf, reason: &'static str },
}

impl SpeciesDb {
    /// Inspect `path`. Never fails: problems only disable species
    /// identification.
    pub fn probe(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("no kraken2 database configured, speciation will not be performed");
            return SpeciesDb::Unset;
        };
        tracing::info!(path = %path.display(), "searching for kraken2 database");
        let db = match Self::inspect(path) {
            Ok(()) => SpeciesDb::Usable(path.to_path_buf()),
            Err(reason) => SpeciesDb::Unusable { path: path.to_path_buf(), reason },
        };
        match &db {
            SpeciesDb::Usable(_) => tracing::info!("kraken2 database is present"),
            SpeciesDb::Unusable { reason, .. } => tracing::warn!(
                path = %path.display(),
                reason,
                "kraken2 database is not usable, speciation will not be performed"
            ),
            SpeciesDb::Unset => {}
        }
        db
    }

    fn inspect(path: &Path) -> Result<(), &'static str> {
        if !path.is_dir() {
            return Err("not a directory");
        }
        let entries = fs::read_dir(path).map_err(|_| "directory can not be read")?;
        let mut files = 0;
        for entry in entries {
            let entry = entry.map_err(|_| "directory can not be read")?;
            let meta = entry.metadata().map_err(|_| "file can not be read")?;
            if meta.is_file() {
                if meta.len() == 0 {
                    return Err("contains an empty file");
                }
                files += 1;
            }
        }
        if files == 0 {
            return Err("contains no files");
        }
        Ok(())
    }

    pub fn is_usable(&self) -> bool {
        matches!(self, SpeciesDb::Usable(_))
    }

    /// Path recorded in the source log; empty unless usable.
    pub fn logged_path(&self) -> String {
        match self {
            SpeciesDb::Usable(path) => path.display().to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
#[path = "species_db_tests.rs"]
mod tests;
