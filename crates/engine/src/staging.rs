// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Staging inputs into the working directory.
//!
//! Reads are linked, never copied, into `<job>/READS/<isolate>/R{1,2}.fq.gz`.
//! The reference and mask land directly in the working directory: compressed
//! files are expanded, anything else is linked.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use bohra_core::IsolateRecord;
use flate2::read::MultiGzDecoder;
use thiserror::Error;

/// Staged name of the first read of a pair.
pub const READ1: &str = "R1.fq.gz";
/// Staged name of the second read of a pair.
pub const READ2: &str = "R2.fq.gz";

#[derive(Debug, Error)]
pub enum StageError {
    #[error("{} does not exist, please provide a valid path", path.display())]
    MissingSource { path: PathBuf },
    #[error("could not create {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("could not link {} to {}: {source}", target.display(), source_path.display())]
    Link { source_path: PathBuf, target: PathBuf, source: io::Error },
    #[error("{} can not be decompressed, check permissions or provide an uncompressed file: {source}", path.display())]
    Decompress { path: PathBuf, source: io::Error },
    #[error("{} contains no files", path.display())]
    EmptyArchive { path: PathBuf },
    #[error("expected {} after decompressing, but it is missing", path.display())]
    NotDecompressed { path: PathBuf },
    #[error("{} has no usable file name", path.display())]
    BadName { path: PathBuf },
}

/// Compression formats recognised by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    Gzip,
    Zip,
}

impl Compression {
    fn detect(name: &str) -> Option<(Compression, &str)> {
        if let Some(stem) = name.strip_suffix(".gz") {
            Some((Compression::Gzip, stem))
        } else if let Some(stem) = name.strip_suffix(".zip") {
            Some((Compression::Zip, stem))
        } else {
            None
        }
    }
}

/// Create a symlink at `target` pointing to `source` unless something is
/// already there. Returns whether a link was created.
pub fn link_if_absent(source: &Path, target: &Path) -> Result<bool, StageError> {
    // symlink_metadata also sees dangling links
    if fs::symlink_metadata(target).is_ok() {
        tracing::debug!(target = %target.display(), "already staged");
        return Ok(false);
    }
    std::os::unix::fs::symlink(source, target).map_err(|e| StageError::Link {
        source_path: source.to_path_buf(),
        target: target.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

/// Link both reads of every included isolate into `reads_dir`.
///
/// Returns the number of links created; already staged reads are left
/// untouched.
pub fn stage_reads(
    reads_dir: &Path,
    records: &[IsolateRecord],
    resolve: impl Fn(&Path) -> PathBuf,
) -> Result<usize, StageError> {
    let mut created = 0;
    for record in records.iter().filter(|r| !r.excluded) {
        let isolate_dir = reads_dir.join(record.id.as_str());
        fs::create_dir_all(&isolate_dir)
            .map_err(|source| StageError::CreateDir { path: isolate_dir.clone(), source })?;
        for (read, name) in [(&record.read1, READ1), (&record.read2, READ2)] {
            let source = resolve(read);
            if !source.exists() {
                return Err(StageError::MissingSource { path: source });
            }
            if link_if_absent(&source, &isolate_dir.join(name))? {
                created += 1;
            }
        }
    }
    tracing::info!(reads_dir = %reads_dir.display(), created, "reads staged");
    Ok(created)
}

/// Make `source` available as a file directly inside `workdir`.
///
/// `.gz` and `.zip` files are expanded to the name without the suffix,
/// replacing any earlier expansion. Other files are linked under their own
/// name unless that name is already taken. Returns the staged path.
pub fn stage_file(workdir: &Path, source: &Path) -> Result<PathBuf, StageError> {
    if !source.exists() {
        tracing::warn!(path = %source.display(), "input file does not exist");
        return Err(StageError::MissingSource { path: source.to_path_buf() });
    }
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| StageError::BadName { path: source.to_path_buf() })?;

    match Compression::detect(name) {
        Some((_, "")) => Err(StageError::BadName { path: source.to_path_buf() }),
        Some((format, stem)) => {
            let target = workdir.join(stem);
            tracing::info!(from = %source.display(), to = %target.display(), "decompressing");
            let result = match format {
                Compression::Gzip => gunzip(source, &target),
                Compression::Zip => unzip_first(source, &target),
            };
            if let Err(e) = result {
                let _ = fs::remove_file(&target);
                return Err(e);
            }
            if !target.is_file() {
                return Err(StageError::NotDecompressed { path: target });
            }
            Ok(target)
        }
        None => {
            let target = workdir.join(name);
            if target != source && link_if_absent(source, &target)? {
                tracing::info!(name, workdir = %workdir.display(), "linked into working directory");
            }
            Ok(target)
        }
    }
}

fn gunzip(source: &Path, target: &Path) -> Result<(), StageError> {
    let decompress = |e: io::Error| StageError::Decompress { path: source.to_path_buf(), source: e };
    let input = File::open(source).map_err(decompress)?;
    let mut decoder = MultiGzDecoder::new(input);
    let mut output = File::create(target).map_err(decompress)?;
    io::copy(&mut decoder, &mut output).map_err(decompress)?;
    Ok(())
}

fn unzip_first(source: &Path, target: &Path) -> Result<(), StageError> {
    let decompress = |e: io::Error| StageError::Decompress { path: source.to_path_buf(), source: e };
    let input = File::open(source).map_err(decompress)?;
    let mut archive = zip::ZipArchive::new(input).map_err(|e| decompress(io::Error::other(e)))?;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| decompress(io::Error::other(e)))?;
        if entry.is_file() {
            let mut output = File::create(target).map_err(decompress)?;
            io::copy(&mut entry, &mut output).map_err(decompress)?;
            return Ok(());
        }
    }
    Err(StageError::EmptyArchive { path: source.to_path_buf() })
}

#[cfg(test)]
#[path = "staging_tests.rs"]
mod tests;
