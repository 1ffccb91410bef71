use std::collections::BTreeMap;

use crate::api::models::{ResultRecord, Run, Status, TestInstance};
use crate::report::duration::parse_elapsed;

// ============================================================================
// Per-run aggregates
// ============================================================================

/// Estimated network overhead per submitted result, in seconds.
pub const SEND_RESULT_OVERHEAD_SECS: f64 = 3.5;

/// Fallback device-serial label when the run description carries no marker.
pub const UNKNOWN_SERIAL: &str = "Device serial: unknown";

/// Numeric aggregates for one run, keyed by the device serial extracted
/// from the run description. Recomputed on every pipeline execution,
/// never persisted.
#[derive(Debug, Clone)]
pub struct RunAggregate {
    pub device_serial: String,
    pub run_name: String,
    pub send_result_time: f64,
    pub elapsed: f64,
    pub downtime: f64,
    pub dev_wait: f64,
    pub settings_loading_time: f64,
    pub base_state_time: f64,
    /// Elapsed minus every overhead bucket. May go negative when the
    /// upstream data is inconsistent; deliberately not clamped.
    pub test_time: f64,
    pub very_failed_count: usize,
    pub all_tests_count: usize,
    /// Backend-supplied `*_count` fields, copied through unchanged.
    pub status_counts: BTreeMap<String, i64>,
}

impl RunAggregate {
    pub fn count_field(&self, name: &str) -> i64 {
        self.status_counts.get(name).copied().unwrap_or(0)
    }
}

/// Extract the device-serial line from a run description: the last line
/// containing the marker substring, or the unknown label.
pub fn extract_device_serial(description: Option<&str>, marker: &str) -> String {
    let mut serial = UNKNOWN_SERIAL.to_string();
    if let Some(text) = description {
        for line in text.lines() {
            if line.contains(marker) {
                serial = line.to_string();
            }
        }
    }
    serial
}

/// Compute the aggregates for one run from its raw results and tests.
pub fn compute_run_aggregate(
    run: &Run,
    results: &[ResultRecord],
    tests: &[TestInstance],
    serial_marker: &str,
) -> RunAggregate {
    let send_result_time = results.len() as f64 * SEND_RESULT_OVERHEAD_SECS;

    let elapsed = sum_parsed(results, |r| r.elapsed.as_deref()) + send_result_time;
    let downtime = sum_parsed(results, |r| r.custom_downtime.as_deref());
    let dev_wait = sum_parsed(results, |r| r.custom_dev_wait.as_deref());
    let settings_loading_time = sum_parsed(results, |r| r.custom_settings_loading_time.as_deref());
    let base_state_time = sum_parsed(results, |r| r.custom_base_state_time.as_deref());

    let test_time = elapsed
        - downtime
        - dev_wait
        - settings_loading_time
        - base_state_time
        - send_result_time;

    RunAggregate {
        device_serial: extract_device_serial(run.description.as_deref(), serial_marker),
        run_name: run.name.clone(),
        send_result_time,
        elapsed,
        downtime,
        dev_wait,
        settings_loading_time,
        base_state_time,
        test_time,
        very_failed_count: count_very_failed(results),
        all_tests_count: tests.len(),
        status_counts: run.status_counts().into_iter().collect(),
    }
}

fn sum_parsed<'a, F>(results: &'a [ResultRecord], field: F) -> f64
where
    F: Fn(&'a ResultRecord) -> Option<&'a str>,
{
    results
        .iter()
        .map(|record| parse_elapsed(field(record)) as f64)
        .sum()
}

/// Count tests that were retried and failed repeatedly: a test counts
/// when it has more than one result and more than one of them is Failed.
pub fn count_very_failed(results: &[ResultRecord]) -> usize {
    let mut per_test: BTreeMap<u64, (usize, usize)> = BTreeMap::new();
    for record in results {
        let entry = per_test.entry(record.test_id).or_insert((0, 0));
        entry.0 += 1;
        if record.status_id == Some(Status::Failed.id()) {
            entry.1 += 1;
        }
    }
    per_test
        .values()
        .filter(|(total, failed)| *total > 1 && *failed > 1)
        .count()
}

// ============================================================================
// Case filtering
// ============================================================================

/// Result of scanning one run's tests for the entry-narrowing step.
#[derive(Debug, Clone, Default)]
pub struct CaseSelection {
    /// Automated, non-blocked cases — the narrowed selection for the entry.
    pub meaningful_cases: Vec<u64>,
    /// Subset of the above still sitting at Untested.
    pub untested_cases: Vec<u64>,
}

/// Drop blocked tests entirely; keep only automated cases; flag the
/// automated ones that are still untested.
pub fn select_meaningful_cases(tests: &[TestInstance]) -> CaseSelection {
    let mut selection = CaseSelection::default();
    for test in tests {
        if test.status_id == Status::Blocked.id() {
            continue;
        }
        if test.custom_automatization == Some(true) {
            selection.meaningful_cases.push(test.case_id);
            if test.status_id == Status::Untested.id() {
                selection.untested_cases.push(test.case_id);
            }
        }
    }
    selection
}

// ============================================================================
// Plan-wide counters
// ============================================================================

/// Accumulators carried across all runs of one pipeline execution.
#[derive(Debug, Clone, Default)]
pub struct PlanCounters {
    /// Total count of meaningful (automated, non-blocked) cases.
    pub all_results_count: usize,
    /// Tests failed more than once, summed over all runs.
    pub very_failed_count: usize,
    /// Case ids still untested — blocks narrowing and plan closure.
    pub untested_cases: Vec<u64>,
}

impl PlanCounters {
    /// Percentage of repeatedly-failed tests over all meaningful cases,
    /// rendered with a comma decimal separator as the report expects.
    pub fn very_failed_percent(&self) -> String {
        let percent = if self.all_results_count == 0 {
            0.0
        } else {
            self.very_failed_count as f64 / self.all_results_count as f64 * 100.0
        };
        crate::report::duration::format_rounded(percent).replace('.', ",")
    }
}
