// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn source_record() -> SourceRecord {
    SourceRecord {
        job_id: JobId::fixture("job1"),
        reference: "ref.fa".to_string(),
        mask: String::new(),
        minaln: 0,
        pipeline: PipelineMode::Combined,
        cpus: 8,
        assembler: Assembler::Shovill,
        date: "16_10_26".to_string(),
        user: "kristy".to_string(),
        snippy_version: "snippy 4.6.0".to_string(),
        input_file: "/data/isolates.tab".to_string(),
        prefill_path: String::new(),
        cluster: false,
        singularity: false,
        kraken_db: "/db/kraken2".to_string(),
    }
}

#[test]
fn header_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::isolates(dir.path());
    log.append(&[vec!["s1".into(), "INCLUDED".into(), "16_10_26".into()]]).unwrap();
    log.append(&[vec!["s1".into(), "INCLUDED".into(), "17_10_26".into()]]).unwrap();

    let text = fs::read_to_string(dir.path().join(ISOLATE_LOG)).unwrap();
    assert_eq!(
        text,
        "Isolate\tStatus\tDate\ns1\tINCLUDED\t16_10_26\ns1\tINCLUDED\t17_10_26\n"
    );
}

#[test]
fn empty_existing_file_gets_a_header() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CLUSTER_LOG), "").unwrap();
    let log = LogTable::cluster(dir.path());
    log.append(&[vec!["c.json".into(), "16_10_26".into(), "sbatch".into()]]).unwrap();
    let text = fs::read_to_string(log.path()).unwrap();
    assert!(text.starts_with("cluster_json\tDate\tqueue\n"));
}

#[test]
fn wrong_width_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::isolates(dir.path());
    let err = log.append(&[vec!["s1".into()]]).unwrap_err();
    assert!(matches!(err, LogTableError::Width { expected: 3, found: 1, .. }));
    assert!(!log.exists());
}

#[test]
fn cells_with_tabs_are_flattened() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::isolates(dir.path());
    log.append(&[vec!["s1".into(), "INCLUDED".into(), "a\tb\nc".into()]]).unwrap();
    let rows = log.read().unwrap();
    assert_eq!(rows[0]["Date"], "a b c");
}

#[test]
fn source_record_survives_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::source(dir.path());
    let first = source_record();
    let mut second = source_record();
    second.cpus = 16;
    second.mask = "mask.bed".to_string();
    second.singularity = true;
    log.append(&[first.to_row()]).unwrap();
    log.append(&[second.to_row()]).unwrap();

    let last = SourceRecord::from_row(&log.last().unwrap()).unwrap();
    assert_eq!(last, second);
    assert_eq!(log.read().unwrap().len(), 2);
}

#[test]
fn source_header_matches_column_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::source(dir.path());
    log.append(&[source_record().to_row()]).unwrap();
    let text = fs::read_to_string(log.path()).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(
        header,
        "JobID\tReference\tMask\tMinAln\tPipeline\tCPUS\tAssembler\tDate\tUser\tsnippy_version\tinput_file\tprefillpath\tcluster\tsingularity\tkraken_db"
    );
    let row = text.lines().nth(1).unwrap();
    assert!(row.starts_with("job1\tref.fa\t\t0\tsa\t8\tshovill\t16_10_26\t"));
    assert!(row.ends_with("\tFalse\tFalse\t/db/kraken2"));
}

#[test]
fn older_source_rows_without_trailing_columns_still_parse() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(SOURCE_LOG),
        "JobID\tReference\tMask\tMinAln\tPipeline\tCPUS\tAssembler\tDate\tUser\tsnippy_version\tinput_file\n\
         old\tref.fa\t\t80\ts\t4\tskesa\t01_01_26\tu\tsnippy 4.4.0\tisolates.tab\n",
    )
    .unwrap();
    let record = SourceRecord::from_row(&LogTable::source(dir.path()).last().unwrap()).unwrap();
    assert_eq!(record.job_id, "old");
    assert_eq!(record.minaln, 80);
    assert_eq!(record.pipeline, PipelineMode::Snippy);
    assert_eq!(record.assembler, Assembler::Skesa);
    assert!(!record.cluster);
    assert_eq!(record.kraken_db, "");
}

#[yare::parameterized(
    bad_pipeline = { "Pipeline", "xyz" },
    bad_cpus     = { "CPUS", "many" },
    bad_flag     = { "cluster", "maybe" },
)]
fn bad_source_values_are_reported(column: &str, value: &str) {
    let mut row: HashMap<String, String> = SOURCE_COLUMNS
        .iter()
        .zip(source_record().to_row())
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    row.insert(column.to_string(), value.to_string());
    let err = SourceRecord::from_row(&row).unwrap_err();
    assert!(matches!(err, LogTableError::BadValue { .. }), "{err}");
    assert!(err.to_string().contains(value));
}

#[test]
fn missing_required_column_is_reported() {
    let row = HashMap::from([("JobID".to_string(), "job1".to_string())]);
    let err = SourceRecord::from_row(&row).unwrap_err();
    assert!(matches!(err, LogTableError::MissingColumn { column: "MinAln" }));
}

#[test]
fn isolate_and_cluster_entries_parse() {
    let dir = tempfile::tempdir().unwrap();
    let isolates = LogTable::isolates(dir.path());
    let entry = IsolateLogEntry {
        isolate: IsolateId::fixture("s4"),
        status: IsolateStatus::Removed,
        date: "16_10_26".to_string(),
    };
    isolates.append(&[entry.to_row()]).unwrap();
    assert_eq!(IsolateLogEntry::from_row(&isolates.last().unwrap()).unwrap(), entry);

    let cluster = LogTable::cluster(dir.path());
    let record = ClusterRecord {
        cluster_json: "/hpc/cluster.json".to_string(),
        date: "16_10_26".to_string(),
        queue: Scheduler::Qsub,
    };
    cluster.append(&[record.to_row()]).unwrap();
    assert_eq!(ClusterRecord::from_row(&cluster.last().unwrap()).unwrap(), record);
}

#[test]
fn last_of_header_only_log_is_empty_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(SOURCE_LOG), "JobID\tReference\n").unwrap();
    let err = LogTable::source(dir.path()).last().unwrap_err();
    assert!(matches!(err, LogTableError::Empty { .. }));
}

#[test]
fn remove_reports_whether_anything_was_there() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogTable::source(dir.path());
    assert!(!log.remove().unwrap());
    log.append(&[source_record().to_row()]).unwrap();
    assert!(log.remove().unwrap());
    assert!(!log.exists());
}
