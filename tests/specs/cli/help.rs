//! Help and version output.

use crate::prelude::*;

#[test]
fn help_lists_every_command() {
    let out = cli().args(&["--help"]).passes();
    out.stdout_has("run").stdout_has("rerun").stdout_has("check");
}

#[test]
fn no_args_shows_usage_and_fails() {
    cli().fails_with(2).stderr_has("Usage:");
}

#[test]
fn run_help_shows_flags() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--input-file")
        .stdout_has("--job-id")
        .stdout_has("--force");
}

#[test]
fn version_includes_package_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn unknown_pipeline_is_a_usage_error() {
    cli().args(&["run", "-i", "x.tab", "-j", "j", "-p", "nope"]).fails_with(2);
}
