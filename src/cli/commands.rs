use crate::api::TestRailProject;
use crate::api::client::TestRailClient;
use crate::cli::config::Credentials;
use crate::report::pipeline::{PlanReportOutcome, ReportOptions, run_plan_report};
use crate::submit::writer::CaseResultWriter;

const ANSI_RED: &str = "\u{1b}[31m";
const ANSI_RESET: &str = "\u{1b}[0m";

// ============================================================================
// report subcommand
// ============================================================================

/// Aggregate and close one plan. Returns whether the plan was closed.
pub fn cmd_report(
    credentials: &Credentials,
    project_id: u64,
    plan_id: u64,
    serial_marker: &str,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let client = TestRailClient::new(&credentials.base_url, &credentials.user, &credentials.password);
    let project = TestRailProject::new(client, project_id);

    let options = ReportOptions {
        serial_marker: serial_marker.to_string(),
        verbose,
    };

    let outcome = run_plan_report(&project, plan_id, &options)?;

    match outcome {
        PlanReportOutcome::Closed { description } => {
            if verbose > 0 {
                eprintln!("Published report:\n{}", description);
            }
            println!("Plan {} closed", plan_id);
            Ok(true)
        }
        PlanReportOutcome::Blocked { untested_cases } => {
            println!("{}", ANSI_RED);
            println!(
                "The plan has tests without a result ({} cases)",
                untested_cases.len()
            );
            println!("Blocking cases: {:?}\n", untested_cases);
            println!("!!!   -------------------------------------------------   !!!");
            println!("The plan will not be closed until every test has a result!");
            println!("!!!   -------------------------------------------------   !!!");
            println!("{}", ANSI_RESET);
            Ok(false)
        }
    }
}

// ============================================================================
// submit subcommand
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_submit(
    credentials: &Credentials,
    project_id: u64,
    suite_id: u64,
    case: &str,
    device_id: u64,
    device_serial: &str,
    firmware: &str,
    status: &str,
    elapsed: u64,
    downtime: u64,
    dev_wait: u64,
    settings_load: u64,
    base_state: u64,
    comment: &str,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = TestRailClient::new(&credentials.base_url, &credentials.user, &credentials.password);
    let project = TestRailProject::new(client, project_id);

    let writer =
        CaseResultWriter::from_case_name(suite_id, case, device_id, device_serial, firmware)?;

    if verbose > 0 {
        eprintln!("Submitting result for case {}...", writer.case_id());
    }

    let record = writer.write_results(
        &project,
        status,
        elapsed,
        downtime,
        dev_wait,
        settings_load,
        comment,
        base_state,
    )?;

    println!("Submitted result {} for case {}", record.id, writer.case_id());
    Ok(())
}
