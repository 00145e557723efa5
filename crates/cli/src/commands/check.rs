// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bohra check`: report which tools a pipeline needs and whether they are
//! installed, without setting up a job.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use bohra_core::{Assembler, PipelineMode};
use bohra_engine::{parse_version, required_tools, ErrorKind, SpeciesDb, SystemProbe, ToolProbe};
use clap::Args;

use super::Context;
use crate::color;
use crate::exit_error::ExitError;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[arg(short, long, default_value_t = PipelineMode::Combined)]
    pub pipeline: PipelineMode,
    #[arg(short, long)]
    pub assembler: Option<Assembler>,
    #[arg(long)]
    pub kraken_db: Option<PathBuf>,
}

/// What `check` found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub tools: Vec<(&'static str, Option<PathBuf>)>,
    /// `None` when the pipeline does not call SNPs
    pub snippy_version: Option<String>,
    pub species_db: SpeciesDb,
}

impl CheckReport {
    pub fn gather(
        probe: &impl ToolProbe,
        pipeline: PipelineMode,
        assembler: Assembler,
        kraken_db: Option<&Path>,
    ) -> Self {
        let tools: Vec<_> =
            required_tools(pipeline, assembler).into_iter().map(|t| (t, probe.locate(t))).collect();
        let snippy_installed = tools.iter().any(|(t, p)| *t == "snippy" && p.is_some());
        let snippy_version = snippy_installed.then(|| {
            probe.version_output("snippy").ok().and_then(|out| parse_version(&out)).unwrap_or_default()
        });
        Self { tools, snippy_version, species_db: SpeciesDb::probe(kraken_db) }
    }

    pub fn missing(&self) -> Vec<&'static str> {
        self.tools.iter().filter(|(_, p)| p.is_none()).map(|(t, _)| *t).collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", color::header("Tools:"));
        let width = self.tools.iter().map(|(t, _)| t.len()).max().unwrap_or(0);
        for (tool, path) in &self.tools {
            let status = match path {
                Some(path) => color::context(&path.display().to_string()),
                None => color::missing("not installed"),
            };
            let _ = writeln!(out, "  {}  {status}", color::literal(&format!("{tool:<width$}")));
        }
        if let Some(version) = &self.snippy_version {
            let shown = if version.is_empty() { color::missing("unknown") } else { color::literal(version) };
            let _ = writeln!(out, "{} {shown}", color::header("Snippy version:"));
        }
        let db = match &self.species_db {
            SpeciesDb::Unset => color::missing("not configured"),
            SpeciesDb::Usable(path) => color::literal(&path.display().to_string()),
            SpeciesDb::Unusable { path, reason } => {
                format!("{} {}", color::literal(&path.display().to_string()), color::missing(reason))
            }
        };
        let _ = writeln!(out, "{} {db}", color::header("Kraken2 database:"));
        out
    }
}

pub fn handle(args: CheckArgs, ctx: &Context) -> Result<()> {
    let assembler = args.assembler.or(ctx.settings.assembler).unwrap_or_default();
    let probe = SystemProbe::new(ctx.env.path.clone());
    let kraken_db = ctx.kraken_db(args.kraken_db.as_deref());
    let report = CheckReport::gather(&probe, args.pipeline, assembler, kraken_db.as_deref());
    print!("{}", report.render());

    let missing = report.missing();
    if !missing.is_empty() {
        return Err(ExitError::new(
            ErrorKind::Dependency.exit_code(),
            format!("missing tools: {}", missing.join(", ")),
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
