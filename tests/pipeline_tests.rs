use testrail_reporter::api::models::Status;
use testrail_reporter::report::pipeline::{
    PlanReportOutcome, ReportOptions, run_plan_report,
};

use crate::common::mock_api::{
    RecordingApi, make_entry, make_plan, make_result, make_run, make_test,
};

mod common;

// ============================================================================
// Fixtures
// ============================================================================

/// Plan with two runs, every automated case tested.
fn fully_tested_api() -> RecordingApi {
    let run_a = make_run(
        10,
        "Run A",
        Some("ATM_MB serial: 001"),
        &[("passed_count", 2), ("failed_count", 0)],
    );
    let run_b = make_run(
        11,
        "Run B",
        Some("ATM_MB serial: 002"),
        &[("passed_count", 1), ("failed_count", 1)],
    );
    let plan = make_plan(
        77,
        "[Suite] 1.0.0",
        vec![make_entry("e-1", vec![run_a]), make_entry("e-2", vec![run_b])],
    );

    let mut api = RecordingApi::with_plan(plan);
    api.add_run_data(
        10,
        vec![
            make_result(1, 100, Status::Passed, Some("1m")),
            make_result(2, 101, Status::Passed, Some("30s")),
        ],
        vec![
            make_test(100, 500, Status::Passed, true),
            make_test(101, 501, Status::Passed, true),
        ],
    );
    api.add_run_data(
        11,
        vec![
            make_result(3, 102, Status::Passed, Some("2m")),
            make_result(4, 103, Status::Failed, Some("10s")),
        ],
        vec![
            make_test(102, 502, Status::Passed, true),
            make_test(103, 503, Status::Failed, true),
        ],
    );
    api
}

// ============================================================================
// Close path
// ============================================================================

#[test]
fn fully_tested_plan_is_published_and_closed() {
    let api = fully_tested_api();
    let outcome = run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    let description = match outcome {
        PlanReportOutcome::Closed { description } => description,
        PlanReportOutcome::Blocked { untested_cases } => {
            panic!("plan unexpectedly blocked by {:?}", untested_cases)
        }
    };

    assert_eq!(api.count_calls("update_plan_description"), 1);
    assert_eq!(api.count_calls("close_plan"), 1);

    // Description update strictly precedes closing
    let calls = api.call_names();
    let update_pos = calls.iter().position(|c| c == "update_plan_description").unwrap();
    let close_pos = calls.iter().position(|c| c == "close_plan").unwrap();
    assert!(update_pos < close_pos);

    // Both tables made it into the published description
    assert!(description.contains("# Time spent:"));
    assert!(description.contains("# Executed tests:"));
    assert!(description.contains("|||:Device serial"));
    assert!(description.contains("ATM_MB serial: 001"));
    assert!(description.contains("ATM_MB serial: 002"));
    assert!(description.contains("Longest single device check:"));
}

#[test]
fn every_entry_is_narrowed_to_meaningful_cases() {
    let api = fully_tested_api();
    run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    let updates = api.entry_updates.borrow();
    assert_eq!(updates.len(), 2);

    let (entry_id, update) = &updates[0];
    assert_eq!(entry_id, "e-1");
    assert!(!update.include_all);
    assert_eq!(update.case_ids, vec![500, 501]);
    assert_eq!(update.name, "Run A");
    // Description re-fetched from the run, not dropped
    assert_eq!(update.description.as_deref(), Some("ATM_MB serial: 001"));

    let (entry_id, update) = &updates[1];
    assert_eq!(entry_id, "e-2");
    assert_eq!(update.case_ids, vec![502, 503]);
}

#[test]
fn blocked_cases_are_excluded_from_narrowed_selection() {
    let run = make_run(10, "Run A", None, &[]);
    let plan = make_plan(77, "[Suite] 1.0.0", vec![make_entry("e-1", vec![run])]);
    let mut api = RecordingApi::with_plan(plan);
    api.add_run_data(
        10,
        vec![make_result(1, 100, Status::Passed, Some("1m"))],
        vec![
            make_test(100, 500, Status::Passed, true),
            make_test(101, 501, Status::Blocked, true),
            make_test(102, 502, Status::Passed, false),
        ],
    );

    run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    let updates = api.entry_updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1.case_ids, vec![500]);
}

// ============================================================================
// Untested gating
// ============================================================================

#[test]
fn untested_automated_case_blocks_the_plan() {
    let mut api = fully_tested_api();
    api.add_run_data(
        11,
        vec![make_result(3, 102, Status::Passed, Some("2m"))],
        vec![
            make_test(102, 502, Status::Passed, true),
            make_test(103, 503, Status::Untested, true),
        ],
    );

    let outcome = run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    match outcome {
        PlanReportOutcome::Blocked { untested_cases } => {
            assert_eq!(untested_cases, vec![503]);
        }
        PlanReportOutcome::Closed { .. } => panic!("plan must not close with untested cases"),
    }

    assert_eq!(api.count_calls("update_plan_description"), 0);
    assert_eq!(api.count_calls("close_plan"), 0);
}

#[test]
fn untested_manual_case_does_not_block() {
    let mut api = fully_tested_api();
    api.add_run_data(
        11,
        vec![make_result(3, 102, Status::Passed, Some("2m"))],
        vec![
            make_test(102, 502, Status::Passed, true),
            make_test(103, 503, Status::Untested, false),
        ],
    );

    let outcome = run_plan_report(&api, 77, &ReportOptions::default()).unwrap();
    assert!(matches!(outcome, PlanReportOutcome::Closed { .. }));
}

#[test]
fn narrowing_stops_at_the_first_untested_run() {
    // Run A (entry e-1) is fine; run B (entry e-2) has an untested case.
    let mut api = fully_tested_api();
    api.add_run_data(
        11,
        Vec::new(),
        vec![make_test(103, 503, Status::Untested, true)],
    );

    run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    // Only the clean run processed before the untested one was narrowed
    let updates = api.entry_updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, "e-1");
}

#[test]
fn runs_after_an_untested_run_are_not_narrowed() {
    // The untested case sits in the FIRST run; the second run is clean
    // but must keep its full selection anyway.
    let run_a = make_run(10, "Run A", None, &[]);
    let run_b = make_run(11, "Run B", None, &[]);
    let plan = make_plan(
        77,
        "[Suite] 1.0.0",
        vec![make_entry("e-1", vec![run_a]), make_entry("e-2", vec![run_b])],
    );
    let mut api = RecordingApi::with_plan(plan);
    api.add_run_data(10, Vec::new(), vec![make_test(100, 500, Status::Untested, true)]);
    api.add_run_data(
        11,
        vec![make_result(1, 101, Status::Passed, Some("1m"))],
        vec![make_test(101, 501, Status::Passed, true)],
    );

    let outcome = run_plan_report(&api, 77, &ReportOptions::default()).unwrap();

    assert!(api.entry_updates.borrow().is_empty());
    assert!(matches!(outcome, PlanReportOutcome::Blocked { .. }));
}

// ============================================================================
// Report content details
// ============================================================================

#[test]
fn report_includes_very_failed_percentage() {
    let run = make_run(10, "Run A", None, &[]);
    let plan = make_plan(77, "[Suite] 1.0.0", vec![make_entry("e-1", vec![run])]);
    let mut api = RecordingApi::with_plan(plan);
    api.add_run_data(
        10,
        vec![
            make_result(1, 100, Status::Failed, Some("1m")),
            make_result(2, 100, Status::Failed, Some("1m")),
            make_result(3, 100, Status::Passed, Some("1m")),
            make_result(4, 101, Status::Passed, Some("1m")),
        ],
        vec![
            make_test(100, 500, Status::Passed, true),
            make_test(101, 501, Status::Passed, true),
        ],
    );

    let outcome = run_plan_report(&api, 77, &ReportOptions::default()).unwrap();
    let description = match outcome {
        PlanReportOutcome::Closed { description } => description,
        _ => panic!("expected the plan to close"),
    };

    // 1 repeatedly-failed test out of 2 meaningful cases, comma separator
    assert!(description.contains("Tests with more than 2 failures: 50,0 %"));
}
