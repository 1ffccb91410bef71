use crate::api::TestRailApi;
use crate::api::models::{NewResult, ResultRecord, Status};
use crate::report::duration::format_elapsed;
use crate::submit::error::SubmitError;

// ============================================================================
// Naming conventions shared with the automation harness
// ============================================================================

/// Plan name for one suite/firmware combination: `[Suite name] 1.2.3`.
pub fn plan_name_for(suite_name: &str, firmware_version: &str) -> String {
    format!("[{}] {}", suite_name, firmware_version)
}

/// Run name for one device: `Dev-id: 123-456 Serial: A1B2`.
/// The device id gets a dash after its third digit.
pub fn run_name_for(device_id: u64, device_serial: &str) -> String {
    let digits = device_id.to_string();
    let formatted = if digits.len() > 3 {
        format!("{}-{}", &digits[..3], &digits[3..])
    } else {
        digits
    };
    format!("Dev-id: {} Serial: {}", formatted, device_serial)
}

// ============================================================================
// Single-case result submission
// ============================================================================

/// Submits one case's result into the run that matches this device and
/// firmware, after validating the whole run/plan/suite/case chain.
#[derive(Debug)]
pub struct CaseResultWriter {
    suite_id: u64,
    case_id: u64,
    device_id: u64,
    device_serial: String,
    firmware_version: String,
}

impl CaseResultWriter {
    pub fn new(
        suite_id: u64,
        case_id: u64,
        device_id: u64,
        device_serial: &str,
        firmware_version: &str,
    ) -> Self {
        Self {
            suite_id,
            case_id,
            device_id,
            device_serial: device_serial.to_string(),
            firmware_version: firmware_version.to_string(),
        }
    }

    /// Build a writer from a test name that must be a bare case id
    /// (automated tests are named after their TestRail case).
    pub fn from_case_name(
        suite_id: u64,
        case_name: &str,
        device_id: u64,
        device_serial: &str,
        firmware_version: &str,
    ) -> Result<Self, SubmitError> {
        let case_id: u64 = case_name
            .trim()
            .parse()
            .map_err(|_| SubmitError::CaseIdNotNumeric(case_name.to_string()))?;
        Ok(Self::new(suite_id, case_id, device_id, device_serial, firmware_version))
    }

    pub fn case_id(&self) -> u64 {
        self.case_id
    }

    /// Submit one result. The effective status is overridden to Retest
    /// when the new status is not Failed and the most recent previous
    /// result for this case was not Passed.
    pub fn write_results(
        &self,
        api: &dyn TestRailApi,
        status: &str,
        elapsed: u64,
        downtime: u64,
        dev_wait_time: u64,
        settings_load_time: u64,
        comment: &str,
        base_state_time: u64,
    ) -> Result<ResultRecord, SubmitError> {
        let mut status =
            Status::from_name(status).ok_or_else(|| SubmitError::UnknownStatus(status.to_string()))?;

        let run_id = self.resolve_run(api)?;
        self.validate(api, run_id)?;

        if status != Status::Failed {
            let previous = api.get_results_for_case(run_id, self.case_id)?;
            if let Some(latest) = previous.first() {
                if latest.status_id != Some(Status::Passed.id()) {
                    status = Status::Retest;
                }
            }
        }

        let result = NewResult {
            status_id: status.id(),
            comment: Some(comment.to_string()),
            elapsed: format_elapsed(elapsed),
            custom_downtime: format_elapsed(downtime),
            custom_dev_wait: format_elapsed(dev_wait_time),
            custom_settings_loading_time: format_elapsed(settings_load_time),
            custom_base_state_time: format_elapsed(base_state_time),
        };

        Ok(api.add_result_for_case(run_id, self.case_id, &result)?)
    }

    /// Locate the run via the plan and run naming conventions. Zero or
    /// multiple matches on either name are hard errors.
    fn resolve_run(&self, api: &dyn TestRailApi) -> Result<u64, SubmitError> {
        let suite = api.get_suite(self.suite_id)?;
        let plan_name = plan_name_for(&suite.name, &self.firmware_version);
        let plan_id = unique_id(api.plan_ids_by_name(&plan_name)?, "plan", &plan_name)?;

        let run_name = run_name_for(self.device_id, &self.device_serial);
        unique_id(api.run_ids_by_name(plan_id, &run_name)?, "run", &run_name)
    }

    /// Check the case belongs to the suite, the run was built from the
    /// suite, and the run is still open.
    fn validate(&self, api: &dyn TestRailApi, run_id: u64) -> Result<(), SubmitError> {
        let case = api.get_case(self.case_id)?;
        if case.suite_id != Some(self.suite_id) {
            return Err(SubmitError::CaseNotInSuite {
                case_id: self.case_id,
                suite_id: self.suite_id,
            });
        }

        let run = api.get_run(run_id)?;
        if run.suite_id != Some(self.suite_id) {
            return Err(SubmitError::SuiteNotInRun {
                suite_id: self.suite_id,
                run_id,
            });
        }
        if run.is_completed {
            return Err(SubmitError::RunClosed { run_id });
        }

        Ok(())
    }
}

fn unique_id(ids: Vec<u64>, kind: &'static str, name: &str) -> Result<u64, SubmitError> {
    match ids.len() {
        1 => Ok(ids[0]),
        0 => Err(SubmitError::NotFoundByName {
            kind,
            name: name.to_string(),
        }),
        n => Err(SubmitError::AmbiguousName {
            kind,
            name: name.to_string(),
            matches: n,
        }),
    }
}
