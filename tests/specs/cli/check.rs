//! `bohra check`: tool report.

use crate::prelude::*;

#[test]
fn complete_install_passes() {
    let temp = Project::snippy_ready();
    temp.bohra()
        .args(&["check", "-p", "s"])
        .passes()
        .stdout_has("snippy-core")
        .stdout_has("Snippy version: 4.6.0")
        .stdout_has("Kraken2 database: not configured");
}

#[test]
fn missing_tools_exit_with_dependency_code() {
    let temp = Project::snippy_ready();
    temp.bohra()
        .args(&["check", "-p", "a"])
        .fails_with(4)
        .stdout_has("not installed")
        .stderr_has("missing tools: shovill");
}

#[test]
fn unusable_database_is_reported() {
    let temp = Project::snippy_ready();
    std::fs::create_dir_all(temp.path().join("k2")).unwrap();
    temp.bohra()
        .args(&["check", "-p", "s", "--kraken-db", "k2"])
        .passes()
        .stdout_has("contains no files");
}
