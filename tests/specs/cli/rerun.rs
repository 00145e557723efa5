//! `bohra rerun`: reuse a job's settings and mark new isolates.

use crate::prelude::*;

#[test]
fn rerun_needs_an_earlier_run() {
    let temp = Project::snippy_ready();
    temp.bohra().args(&["rerun"]).fails_with(2).stderr_has("use run instead");
}

#[test]
fn rerun_marks_new_isolates_and_forces_the_workflow() {
    let temp = Project::snippy_ready();
    temp.run_snippy(&["--cpus", "8"]).passes();
    temp.isolates(&["s1", "s2", "s3", "s4", "s5"]);

    temp.bohra().args(&["rerun"]).passes();

    let isolates = temp.read("isolates.log");
    assert!(isolates.contains("s5\tADDED"), "{isolates}");
    assert_eq!(isolates.lines().filter(|l| l.contains("\tINCLUDED\t")).count(), 8);
    assert_eq!(temp.read("source.log").lines().count(), 3);
    similar_asserts::assert_eq!(temp.snakemake_calls().last().map(String::as_str), Some("-s Snakefile --cores 8 -F"));
}

#[test]
fn rerun_accepts_overrides() {
    let temp = Project::snippy_ready();
    temp.run_snippy(&[]).passes();

    temp.bohra().args(&["rerun", "--cpus", "2", "--minaln", "90"]).passes();

    assert!(temp.read("outbreak/config.yaml").contains("minperc: 90"));
    assert_eq!(temp.snakemake_calls().last().map(String::as_str), Some("-s Snakefile --cores 2 -F"));
}
