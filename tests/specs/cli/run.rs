//! `bohra run`: guard, setup and workflow hand-off.

use crate::prelude::*;

#[test]
fn fresh_run_writes_logs_and_artifacts() {
    let temp = Project::snippy_ready();

    temp.run_snippy(&[]).passes();

    let source = temp.read("source.log");
    assert!(source.starts_with("JobID\t"), "{source}");
    assert!(source.contains("outbreak\tref.fa\t"), "{source}");
    assert!(source.contains("\t4.6.0\t"), "{source}");
    let isolates = temp.read("isolates.log");
    assert_eq!(isolates.lines().filter(|l| l.contains("INCLUDED")).count(), 4);
    assert!(temp.exists("outbreak/Snakefile"));
    assert!(temp.exists("outbreak/config.yaml"));
    assert!(temp.exists("outbreak/READS/s1/R1.fq.gz"));
    assert!(temp.exists("bohra.log"));

    let calls = temp.snakemake_calls();
    assert_eq!(calls, vec!["-s Snakefile --cores 36".to_string()]);
}

#[test]
fn config_names_isolates_and_reference() {
    let temp = Project::snippy_ready();
    temp.run_snippy(&["--cpus", "4", "--minaln", "70"]).passes();

    let config = temp.read("outbreak/config.yaml");
    assert!(config.contains("isolates: s1 s2 s3 s4"), "{config}");
    assert!(config.contains("cpus: 4"), "{config}");
    assert!(config.contains("minperc: 70"), "{config}");
    assert!(config.contains(&format!("reference: {}", temp.path().join("ref.fa").display())));
}

#[test]
fn excluded_isolates_are_logged_as_removed() {
    let temp = Project::snippy_ready();
    temp.isolates(&["s1", "s2", "s3", "s4", "#s5"]);

    temp.run_snippy(&[]).passes();

    assert!(temp.read("isolates.log").contains("s5\tREMOVED"));
    assert!(!temp.read("outbreak/config.yaml").contains("s5"));
}

#[test]
fn second_run_is_blocked_without_force() {
    let temp = Project::snippy_ready();
    temp.run_snippy(&[]).passes();
    let before = temp.read("source.log");

    temp.run_snippy(&[]).fails_with(5).stderr_has("--force");

    assert_eq!(temp.read("source.log"), before);
    assert_eq!(temp.snakemake_calls().len(), 1);
}

#[test]
fn force_starts_the_history_over() {
    let temp = Project::snippy_ready();
    temp.run_snippy(&[]).passes();

    temp.run_snippy(&["-f"]).passes();

    assert_eq!(temp.read("source.log").lines().count(), 2);
    assert_eq!(temp.snakemake_calls().last().map(String::as_str), Some("-s Snakefile --cores 36 -F"));
}

#[test]
fn dry_run_leaves_no_history() {
    let temp = Project::snippy_ready();

    temp.run_snippy(&["-n"]).passes();

    assert!(!temp.exists("source.log"));
    assert!(temp.exists("outbreak/Snakefile"));
    assert_eq!(temp.snakemake_calls(), vec!["-np -s Snakefile --cores 36".to_string()]);
}

#[test]
fn missing_tool_exits_with_dependency_code() {
    let temp = Project::snippy_ready();
    std::fs::remove_file(temp.bin().join("iqtree")).unwrap();

    temp.run_snippy(&[]).fails_with(4).stderr_has("iqtree is not installed");

    assert!(!temp.exists("source.log"));
}

#[test]
fn missing_manifest_is_a_configuration_error() {
    let temp = Project::snippy_ready();
    std::fs::remove_file(temp.path().join("isolates.tab")).unwrap();
    temp.run_snippy(&[]).fails_with(2);
}

#[test]
fn too_few_isolates_is_a_structural_error() {
    let temp = Project::snippy_ready();
    temp.isolates(&["s1", "s2", "s3"]);
    temp.run_snippy(&[]).fails_with(3);
}

#[test]
fn blank_job_id_is_rejected() {
    let temp = Project::snippy_ready();
    temp.bohra()
        .args(&["run", "-i", "isolates.tab", "-j", " ", "-r", "ref.fa"])
        .fails_with(2)
        .stderr_has("-j job_id");
}

#[test]
fn failed_workflow_exits_with_execution_code() {
    let temp = Project::snippy_ready();
    temp.snakemake(1);
    temp.run_snippy(&[]).fails_with(1).stderr_has("snakemake exited with status 1");
}
