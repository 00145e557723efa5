//! Shared helpers for the CLI specs.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Tools the snippy-only pipeline checks for.
pub const SNIPPY_TOOLS: &[&str] = &["snippy-core", "snp-dists", "iqtree"];

/// Command builder around the `bohra` binary.
pub struct Cli {
    cmd: Command,
}

/// The binary with no project: clean environment, empty tool path.
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("bohra").unwrap();
    cmd.env_clear().env("PATH", "").env("NO_COLOR", "1");
    Cli { cmd }
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn pwd(mut self, dir: &Path) -> Self {
        self.cmd.current_dir(dir);
        self
    }

    /// Run and expect exit status 0.
    pub fn passes(mut self) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome::from(output);
        assert_eq!(outcome.code, 0, "expected success\nstderr:\n{}", outcome.stderr);
        outcome
    }

    /// Run and expect a specific non-zero exit status.
    pub fn fails_with(mut self, code: i32) -> Outcome {
        let output = self.cmd.output().unwrap();
        let outcome = Outcome::from(output);
        assert_eq!(outcome.code, code, "unexpected exit status\nstderr:\n{}", outcome.stderr);
        outcome
    }
}

pub struct Outcome {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for Outcome {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Outcome {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout lacks {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr lacks {needle:?}:\n{}", self.stderr);
        self
    }
}

/// A temporary working directory with reads, a manifest and fake tools.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        let project = Self { dir: TempDir::new().unwrap() };
        fs::create_dir_all(project.bin()).unwrap();
        fs::create_dir_all(project.path().join("home")).unwrap();
        project
    }

    /// Four isolates with reads, a reference, and every snippy-mode tool.
    /// The fake workflow engine records its arguments.
    pub fn snippy_ready() -> Self {
        let project = Self::empty();
        project.isolates(&["s1", "s2", "s3", "s4"]);
        project.file("ref.fa", ">chr\nACGT\n");
        project.snippy("snippy 4.6.0");
        for tool in SNIPPY_TOOLS {
            project.tool(tool, "exit 0");
        }
        project.snakemake(0);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn bin(&self) -> PathBuf {
        self.path().join("bin")
    }

    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path().join(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }

    /// Write reads for each id under `reads/` and a tab-separated manifest
    /// `isolates.tab` listing them.
    pub fn isolates(&self, ids: &[&str]) {
        let mut manifest = String::new();
        for id in ids {
            let clean = id.trim_start_matches('#');
            let r1 = self.file(&format!("reads/{clean}_1.fq.gz"), "@r\nACGT\n+\nIIII\n");
            let r2 = self.file(&format!("reads/{clean}_2.fq.gz"), "@r\nACGT\n+\nIIII\n");
            manifest.push_str(&format!("{id}\t{}\t{}\n", r1.display(), r2.display()));
        }
        self.file("isolates.tab", &manifest);
    }

    /// An executable shell script in `bin/`.
    pub fn tool(&self, name: &str, body: &str) {
        let path = self.bin().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn snippy(&self, version_line: &str) {
        self.tool("snippy", &format!("echo '{version_line}' >&2"));
    }

    /// A workflow engine that appends its arguments to `snakemake.args`
    /// and exits with `code`.
    pub fn snakemake(&self, code: i32) {
        let log = self.path().join("snakemake.args");
        self.tool("snakemake", &format!("echo \"$*\" >> '{}'\nexit {code}", log.display()));
    }

    /// Lines the fake workflow engine recorded, one per invocation.
    pub fn snakemake_calls(&self) -> Vec<String> {
        if !self.exists("snakemake.args") {
            return Vec::new();
        }
        self.read("snakemake.args").lines().map(str::to_string).collect()
    }

    /// `bohra` run from the project with `bin/` as the only tool path and
    /// a home directory without settings.
    pub fn bohra(&self) -> Cli {
        cli()
            .pwd(self.path())
            .env("PATH", self.bin())
            .env("HOME", self.path().join("home"))
            .env("XDG_CONFIG_HOME", self.path().join("home"))
            .env("USER", "tester")
    }

    /// `bohra run` for job `outbreak` in snippy mode.
    pub fn run_snippy(&self, extra: &[&str]) -> Cli {
        let mut args = vec!["run", "-i", "isolates.tab", "-j", "outbreak", "-r", "ref.fa", "-p", "s"];
        args.extend_from_slice(extra);
        self.bohra().args(&args)
    }
}
