use crate::api::TestRailApi;
use crate::api::error::ApiError;
use crate::api::models::PlanEntryUpdate;
use crate::report::aggregate::{
    PlanCounters, RunAggregate, compute_run_aggregate, select_meaningful_cases,
};
use crate::report::duration::format_timespan;
use crate::report::render::render_table;
use crate::report::table::SummaryTable;

// ============================================================================
// Plan aggregation & closure pipeline
// ============================================================================

pub const DEFAULT_SERIAL_MARKER: &str = "ATM_MB";

const DEVICE_SERIAL_COLUMN: &str = "Device serial";

const ANSI_RED: &str = "\u{1b}[31m";
const ANSI_RESET: &str = "\u{1b}[0m";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Substring marking the device-serial line in a run description.
    pub serial_marker: String,
    pub verbose: u8,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            serial_marker: DEFAULT_SERIAL_MARKER.to_string(),
            verbose: 0,
        }
    }
}

/// What the pipeline did with the plan.
#[derive(Debug, Clone)]
pub enum PlanReportOutcome {
    /// Report published into the plan description and the plan closed.
    Closed { description: String },
    /// Untested automated cases remain; nothing was published or closed.
    Blocked { untested_cases: Vec<u64> },
}

/// Walk every run of every plan entry, aggregate timings and counts,
/// narrow entries to their meaningful cases, and close the plan with a
/// published summary once nothing is left untested.
///
/// Runs are processed in backend order and entry updates happen
/// immediately per run, so an interrupted execution leaves earlier
/// entries narrowed and later ones untouched.
pub fn run_plan_report(
    api: &dyn TestRailApi,
    plan_id: u64,
    options: &ReportOptions,
) -> Result<PlanReportOutcome, ApiError> {
    let plan = api.get_plan(plan_id)?;
    let entry_total = plan.entries.len();

    let mut aggregates: Vec<RunAggregate> = Vec::new();
    let mut counters = PlanCounters::default();

    for (index, entry) in plan.entries.iter().enumerate() {
        if options.verbose > 0 {
            eprintln!("Processing entry {} of {}", index + 1, entry_total);
        }

        for run in &entry.runs {
            let results = api.get_results_for_run(run.id)?;
            let tests = api.get_tests(run.id)?;

            let aggregate = compute_run_aggregate(run, &results, &tests, &options.serial_marker);
            let selection = select_meaningful_cases(&tests);

            counters.all_results_count += selection.meaningful_cases.len();
            counters.very_failed_count += aggregate.very_failed_count;
            counters.untested_cases.extend(&selection.untested_cases);
            aggregates.push(aggregate);

            // Once any untested case has been seen, no further entry is
            // narrowed — a partially-tested plan keeps its full selections.
            if !counters.untested_cases.is_empty() {
                eprintln!(
                    "{}Run {} will not be updated until every test has a result{}",
                    ANSI_RED, run.id, ANSI_RESET
                );
                continue;
            }

            // The entry structure omits the description; re-fetch it from
            // the run so the update does not wipe it.
            let description = api.get_run(run.id)?.description;
            api.update_plan_entry(
                plan_id,
                &entry.id,
                &PlanEntryUpdate {
                    name: run.name.clone(),
                    description,
                    include_all: false,
                    case_ids: selection.meaningful_cases,
                },
            )?;
        }
    }

    let description = compose_report(&aggregates, &counters);

    if counters.untested_cases.is_empty() {
        api.update_plan_description(plan_id, &description)?;
        api.close_plan(plan_id)?;
        Ok(PlanReportOutcome::Closed { description })
    } else {
        Ok(PlanReportOutcome::Blocked {
            untested_cases: counters.untested_cases,
        })
    }
}

// ============================================================================
// Report composition
// ============================================================================

fn compose_report(aggregates: &[RunAggregate], counters: &PlanCounters) -> String {
    let time_rows: Vec<(String, Vec<f64>)> = aggregates
        .iter()
        .map(|a| {
            (
                a.device_serial.clone(),
                vec![
                    a.settings_loading_time,
                    a.downtime,
                    a.send_result_time,
                    a.dev_wait,
                    a.base_state_time,
                    a.test_time,
                    a.elapsed,
                ],
            )
        })
        .collect();

    let time_table = SummaryTable::build(
        DEVICE_SERIAL_COLUMN,
        &[
            "Settings load time",
            "Downtime",
            "Result upload time",
            "Device wait time",
            "Base state time",
            "Test execution time",
            "Total elapsed",
        ],
        &time_rows,
        true,
    );

    // Longest total elapsed of any single run, before grouping
    let max_elapsed = aggregates
        .iter()
        .map(|a| a.elapsed)
        .fold(0.0_f64, f64::max);

    let count_rows: Vec<(String, Vec<f64>)> = aggregates
        .iter()
        .map(|a| {
            (
                a.device_serial.clone(),
                vec![
                    a.count_field("blocked_count") as f64,
                    a.count_field("failed_count") as f64,
                    a.count_field("passed_count") as f64,
                    a.count_field("retest_count") as f64,
                    a.count_field("untested_count") as f64,
                    a.very_failed_count as f64,
                    a.all_tests_count as f64,
                ],
            )
        })
        .collect();

    let count_table = SummaryTable::build(
        DEVICE_SERIAL_COLUMN,
        &[
            "Blocked tests",
            "Failed tests",
            "Passed tests",
            "Passed after retest",
            "Untested",
            "Tests with repeated failures",
            "Total tests",
        ],
        &count_rows,
        false,
    );

    format!(
        "# Time spent:\n{}\n## Longest single device check: {}\n\n---\n\n# Executed tests:\n{}\n## Tests with more than 2 failures: {} %",
        render_table(&time_table),
        format_timespan(max_elapsed as u64),
        render_table(&count_table),
        counters.very_failed_percent(),
    )
}
