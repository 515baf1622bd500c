//! Property-based tests for ErrorLog.
//!
//! Each property is checked against arbitrary sequences of records with
//! every severity and category mixed in.

use proptest::prelude::*;
use xml_error_log::{Category, DiagnosticRecord, Error, ErrorLog, Severity};

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
        Just(Severity::Fatal),
    ]
}

fn category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Internal),
        Just(Category::System),
        Just(Category::Xml),
        Just(Category::Schema),
        "[a-z]{1,8}".prop_map(Category::from),
    ]
}

fn record() -> impl Strategy<Value = DiagnosticRecord> {
    (
        any::<u32>(),
        severity(),
        "[ -~]{0,40}",
        0u32..10_000,
        0u32..500,
        category(),
    )
        .prop_map(|(id, severity, message, line, column, category)| {
            DiagnosticRecord::new(id, severity, message)
                .at(line, column)
                .with_category(category)
        })
}

fn log_from(records: &[DiagnosticRecord]) -> ErrorLog {
    let mut log = ErrorLog::new();
    for r in records {
        log.add(r.clone()).unwrap();
    }
    log
}

proptest! {
    #[test]
    fn size_counts_every_add(records in prop::collection::vec(record(), 0..64)) {
        let log = log_from(&records);
        prop_assert_eq!(log.size(), records.len());
    }

    #[test]
    fn get_returns_records_unchanged(records in prop::collection::vec(record(), 0..64)) {
        let log = log_from(&records);
        for (i, expected) in records.iter().enumerate() {
            let stored = log.get(i as i64).unwrap();
            prop_assert_eq!(stored, expected);
            prop_assert_eq!(stored.category(), expected.category());
            prop_assert_eq!(stored.message(), expected.message());
        }
    }

    #[test]
    fn get_outside_bounds_fails(records in prop::collection::vec(record(), 0..32)) {
        let log = log_from(&records);
        let size = log.size();
        prop_assert_eq!(
            log.get(size as i64),
            Err(Error::OutOfRange { index: size as i64, size })
        );
        prop_assert_eq!(log.get(-1), Err(Error::OutOfRange { index: -1, size }));
    }

    #[test]
    fn clear_empties_any_log(records in prop::collection::vec(record(), 0..64)) {
        let mut log = log_from(&records);
        log.clear();
        prop_assert_eq!(log.size(), 0);
        prop_assert_eq!(log.error_count(Severity::Info), 0);
    }

    #[test]
    fn error_count_is_monotonic(records in prop::collection::vec(record(), 0..64)) {
        let log = log_from(&records);
        let counts: Vec<usize> = Severity::ALL.iter().map(|s| log.error_count(*s)).collect();
        for pair in counts.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
        prop_assert_eq!(counts[0], records.len());
    }

    #[test]
    fn error_count_matches_scan(
        records in prop::collection::vec(record(), 0..64),
        min in severity(),
    ) {
        let log = log_from(&records);
        let scanned = records.iter().filter(|r| r.severity() >= min).count();
        prop_assert_eq!(log.error_count(min), scanned);
    }

    #[test]
    fn to_list_preserves_order(records in prop::collection::vec(record(), 0..64)) {
        let log = log_from(&records);
        prop_assert_eq!(log.to_list(), records);
    }

    #[test]
    fn report_has_one_line_per_record(records in prop::collection::vec(record(), 0..32)) {
        let log = log_from(&records);
        let report = log.report();
        prop_assert_eq!(report.lines().count(), records.len());
        for (line, r) in report.lines().zip(&records) {
            let expected_prefix = format!("{} ({}) at line", r.severity(), r.id());
            prop_assert!(line.starts_with(&expected_prefix));
        }
    }
}

#[test]
fn interleaved_clear_and_add() {
    let mut log = ErrorLog::new();
    log.add(DiagnosticRecord::new(1, Severity::Fatal, "first pass")).unwrap();
    log.clear();
    log.add(DiagnosticRecord::new(2, Severity::Info, "second pass")).unwrap();

    assert_eq!(log.size(), 1);
    assert_eq!(log.error_count(Severity::Fatal), 0);
    assert_eq!(log.error_count(Severity::Info), 1);
    assert_eq!(log.get(0).unwrap().message(), "second pass");
}
