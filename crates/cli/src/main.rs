// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! bohra: sets up and launches bacterial genomics pipeline jobs

mod color;
mod commands;
mod env;
mod exit_error;
mod logging;
mod settings;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{check, rerun, run, Context};
use crate::env::Env;
use crate::exit_error::ExitError;
use crate::settings::Settings;

#[derive(Parser)]
#[command(
    name = "bohra",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Bacterial genomics pipeline coordinator",
    styles = color::styles(),
)]
struct Cli {
    /// Settings file with site defaults
    #[arg(long, global = true, value_name = "TOML")]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Set up and run a new job
    Run(run::RunArgs),
    /// Run an existing job again, adding or removing isolates
    Rerun(rerun::RerunArgs),
    /// Report which tools are installed
    Check(check::CheckArgs),
}

impl Command {
    /// Directory whose `bohra.log` receives this command's log.
    fn workdir(&self) -> Option<&Path> {
        match self {
            Command::Run(args) => Some(args.workdir.as_path()),
            Command::Rerun(args) => Some(args.workdir.as_path()),
            Command::Check(_) => None,
        }
    }
}

fn main() {
    let code = real_main();
    std::process::exit(code);
}

/// Returns the exit code so the log guard flushes before the process ends.
fn real_main() -> i32 {
    let cli = Cli::parse();
    let env = Env::capture();
    let workdir = cli.command.workdir().map(|w| env.absolute(w));

    let guard = match logging::init(workdir.as_deref(), env.log_filter.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: {e}");
            None
        }
    };

    match dispatch(cli, env) {
        Ok(()) => 0,
        Err(err) => {
            let code = err.downcast_ref::<ExitError>().map_or(1, |e| e.code);
            if guard.is_some() {
                tracing::error!("{err:#}");
            } else {
                eprintln!("error: {err:#}");
            }
            code
        }
    }
}

fn dispatch(cli: Cli, env: Env) -> Result<()> {
    let settings = Settings::discover(cli.settings.as_deref(), &env)
        .map_err(|e| ExitError::configuration(e.to_string()))?;
    let ctx = Context { env, settings };
    match cli.command {
        Command::Run(args) => run::handle(args, &ctx),
        Command::Rerun(args) => rerun::handle(args, &ctx),
        Command::Check(args) => check::handle(args, &ctx),
    }
}
