// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bohra_core::{JobConfig, JobId};
use parking_lot::Mutex;

use crate::deps::ToolProbe;
use crate::runner::ProcessRunner;

/// Create `<dir>/reads/<id>_R{1,2}.fq.gz` for each id and return the
/// manifest text listing them (tab separated).
pub fn write_reads(dir: &Path, ids: &[&str]) -> String {
    let reads = dir.join("reads");
    fs::create_dir_all(&reads).unwrap();
    let mut text = String::new();
    for raw in ids {
        let clean = raw.trim_start_matches('#');
        let r1 = reads.join(format!("{clean}_R1.fq.gz"));
        let r2 = reads.join(format!("{clean}_R2.fq.gz"));
        fs::write(&r1, b"@read\nACGT\n+\nIIII\n").unwrap();
        fs::write(&r2, b"@read\nTGCA\n+\nIIII\n").unwrap();
        text.push_str(&format!("{raw}\t{}\t{}\n", r1.display(), r2.display()));
    }
    text
}

/// Minimal templates exercising every placeholder family.
pub fn write_resources(dir: &Path) -> PathBuf {
    let resources = dir.join("resources");
    fs::create_dir_all(&resources).unwrap();
    fs::write(
        resources.join("config_snippy.yaml"),
        "name: ${name}\nreference: ${reference}\ncpus: ${cpus}\nmask: '${maskstring}'\nisolates: ${isolates}\n",
    )
    .unwrap();
    for name in ["Snakefile_snippy", "Snakefile_default", "Snakefile_assembly", "Snakefile_all"] {
        fs::write(
            resources.join(name),
            format!("# {name}\nworkdir: '${{workdir}}'\nASSEMBLER = '${{assembler}}'\n${{kraken_rule}}\n"),
        )
        .unwrap();
    }
    resources
}

/// A job rooted in a fresh working directory with reads, manifest,
/// reference and templates in place.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub workdir: PathBuf,
    pub config: JobConfig,
}

impl Fixture {
    pub fn new(ids: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let workdir = dir.path().join("work");
        fs::create_dir_all(&workdir).unwrap();
        let manifest = write_reads(dir.path(), ids);
        let input = dir.path().join("isolates.tab");
        fs::write(&input, manifest).unwrap();
        let reference = dir.path().join("ref.fa");
        fs::write(&reference, ">chr\nACGTACGT\n").unwrap();
        let resources = write_resources(dir.path());
        let config = JobConfig::builder()
            .workdir(workdir.clone())
            .resources(resources)
            .input_file(input)
            .job_id(JobId::fixture("job1"))
            .reference(reference)
            .build();
        Self { dir, workdir, config }
    }

    pub fn default_ids() -> &'static [&'static str] {
        &["s1", "s2", "s3", "#s4"]
    }
}

/// Tool probe answering from a fixed table.
#[derive(Clone, Default)]
pub struct FakeProbe {
    pub tools: HashMap<String, PathBuf>,
    pub versions: HashMap<String, String>,
}

impl FakeProbe {
    pub fn with_tools(tools: &[&str]) -> Self {
        let mut probe = Self::default();
        for tool in tools {
            probe.tools.insert(tool.to_string(), PathBuf::from(format!("/opt/bin/{tool}")));
        }
        probe
    }

    pub fn version(mut self, tool: &str, output: &str) -> Self {
        self.versions.insert(tool.to_string(), output.to_string());
        self
    }

    /// Every tool any pipeline mode can require.
    pub fn everything() -> Self {
        Self::with_tools(&[
            "snippy", "snippy-core", "snp-dists", "iqtree", "shovill", "skesa", "spades.py",
            "mlst", "kraken2", "abricate", "prokka", "roary",
        ])
        .version("snippy", "snippy 4.6.0")
    }
}

impl ToolProbe for FakeProbe {
    fn locate(&self, tool: &str) -> Option<PathBuf> {
        self.tools.get(tool).cloned()
    }

    fn version_output(&self, tool: &str) -> io::Result<String> {
        self.versions
            .get(tool)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, tool.to_string()))
    }
}

/// A recorded process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Runner that records invocations and exits with a fixed code.
#[derive(Clone)]
pub struct FakeRunner {
    pub code: Option<i32>,
    pub calls: Arc<Mutex<Vec<Invocation>>>,
}

impl FakeRunner {
    pub fn exiting(code: i32) -> Self {
        Self { code: Some(code), calls: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> io::Result<Option<i32>> {
        self.calls.lock().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            cwd: cwd.to_path_buf(),
        });
        Ok(self.code)
    }
}
