// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::fs;

#[test]
fn full_file_parses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(
        &path,
        r#"
resources = "/opt/bohra/resources"
cpus = 36
assembler = "spades"
minaln = 80
kraken_db = "/db/k2"
singularity_path = "/containers"
prefill_path = "/seq/QC/"
"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();

    assert_eq!(
        settings,
        Settings {
            resources: Some("/opt/bohra/resources".into()),
            cpus: Some(36),
            assembler: Some(Assembler::Spades),
            minaln: Some(80),
            kraken_db: Some("/db/k2".into()),
            singularity_path: Some("/containers".into()),
            prefill_path: Some("/seq/QC/".into()),
        }
    );
}

#[test]
fn partial_file_leaves_the_rest_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, "cpus = 4\n").unwrap();
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings, Settings { cpus: Some(4), ..Settings::default() });
}

#[yare::parameterized(
    unknown_key   = { "threads = 4\n" },
    bad_assembler = { "assembler = \"velvet\"\n" },
    not_toml      = { "cpus = = 4\n" },
)]
fn invalid_files_are_rejected(text: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    fs::write(&path, text).unwrap();
    assert!(matches!(Settings::load(&path), Err(SettingsError::Parse { .. })));
}

#[test]
fn flag_wins_over_environment() {
    let dir = tempfile::tempdir().unwrap();
    let flagged = dir.path().join("flag.toml");
    let from_env = dir.path().join("env.toml");
    fs::write(&flagged, "cpus = 1\n").unwrap();
    fs::write(&from_env, "cpus = 2\n").unwrap();
    let env = Env { settings: Some(from_env), ..Env::default() };

    assert_eq!(Settings::discover(Some(&flagged), &env).unwrap().cpus, Some(1));
    assert_eq!(Settings::discover(None, &env).unwrap().cpus, Some(2));
}

#[test]
fn named_file_must_exist() {
    let env = Env { settings: Some("/no/such/settings.toml".into()), ..Env::default() };
    assert!(matches!(Settings::discover(None, &env), Err(SettingsError::Missing { .. })));
}

#[test]
fn default_path_is_under_bohra() {
    if let Some(path) = default_path() {
        assert!(path.ends_with("bohra/settings.toml"));
    }
}
