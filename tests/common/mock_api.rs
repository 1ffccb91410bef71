use std::cell::RefCell;
use std::collections::BTreeMap;

use serde_json::Value;
use testrail_reporter::api::TestRailApi;
use testrail_reporter::api::error::ApiError;
use testrail_reporter::api::models::{
    Case, NewResult, Plan, PlanEntry, PlanEntryUpdate, ResultRecord, Run, Status, Suite,
    TestInstance,
};

// ============================================================================
// Model builders
// ============================================================================

pub fn make_run(id: u64, name: &str, description: Option<&str>, counts: &[(&str, i64)]) -> Run {
    let mut extra: BTreeMap<String, Value> = BTreeMap::new();
    for (key, value) in counts {
        extra.insert((*key).to_string(), Value::from(*value));
    }
    Run {
        id,
        name: name.to_string(),
        description: description.map(str::to_string),
        suite_id: Some(1),
        is_completed: false,
        extra,
    }
}

pub fn make_result(id: u64, test_id: u64, status: Status, elapsed: Option<&str>) -> ResultRecord {
    ResultRecord {
        id,
        test_id,
        status_id: Some(status.id()),
        elapsed: elapsed.map(str::to_string),
        comment: None,
        custom_downtime: None,
        custom_dev_wait: None,
        custom_settings_loading_time: None,
        custom_base_state_time: None,
    }
}

pub fn make_test(id: u64, case_id: u64, status: Status, automated: bool) -> TestInstance {
    TestInstance {
        id,
        case_id,
        status_id: status.id(),
        custom_automatization: Some(automated),
    }
}

pub fn make_plan(id: u64, name: &str, entries: Vec<PlanEntry>) -> Plan {
    Plan {
        id,
        name: name.to_string(),
        description: None,
        is_completed: false,
        entries,
    }
}

pub fn make_entry(id: &str, runs: Vec<Run>) -> PlanEntry {
    PlanEntry {
        id: id.to_string(),
        runs,
    }
}

fn not_found(uri: &str) -> ApiError {
    ApiError::Backend {
        uri: uri.to_string(),
        status: 400,
        body: "Field :id is not a valid id".to_string(),
    }
}

// ============================================================================
// Recording mock backend
// ============================================================================

/// In-memory `TestRailApi` with canned data and a call log, so tests can
/// assert which write calls happened and in which order.
#[derive(Default)]
pub struct RecordingApi {
    pub plan: Option<Plan>,
    pub runs: BTreeMap<u64, Run>,
    pub run_results: BTreeMap<u64, Vec<ResultRecord>>,
    pub case_results: BTreeMap<(u64, u64), Vec<ResultRecord>>,
    pub run_tests: BTreeMap<u64, Vec<TestInstance>>,
    pub cases: BTreeMap<u64, Case>,
    pub suites: BTreeMap<u64, Suite>,
    pub plans_by_name: BTreeMap<String, Vec<u64>>,

    pub calls: RefCell<Vec<String>>,
    pub entry_updates: RefCell<Vec<(String, PlanEntryUpdate)>>,
    pub submitted: RefCell<Vec<NewResult>>,
}

impl RecordingApi {
    pub fn with_plan(plan: Plan) -> Self {
        let mut api = RecordingApi::default();
        api.plans_by_name
            .insert(plan.name.clone(), vec![plan.id]);
        for entry in &plan.entries {
            for run in &entry.runs {
                api.runs.insert(run.id, run.clone());
            }
        }
        api.plan = Some(plan);
        api
    }

    pub fn add_run_data(&mut self, run_id: u64, results: Vec<ResultRecord>, tests: Vec<TestInstance>) {
        self.run_results.insert(run_id, results);
        self.run_tests.insert(run_id, tests);
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c == &name).count()
    }

    fn log(&self, call: &str) {
        self.calls.borrow_mut().push(call.to_string());
    }
}

impl TestRailApi for RecordingApi {
    fn get_plan(&self, plan_id: u64) -> Result<Plan, ApiError> {
        self.log("get_plan");
        match &self.plan {
            Some(plan) if plan.id == plan_id => Ok(plan.clone()),
            _ => Err(not_found("get_plan")),
        }
    }

    fn get_run(&self, run_id: u64) -> Result<Run, ApiError> {
        self.log("get_run");
        self.runs.get(&run_id).cloned().ok_or_else(|| not_found("get_run"))
    }

    fn get_case(&self, case_id: u64) -> Result<Case, ApiError> {
        self.log("get_case");
        self.cases.get(&case_id).cloned().ok_or_else(|| not_found("get_case"))
    }

    fn get_suite(&self, suite_id: u64) -> Result<Suite, ApiError> {
        self.log("get_suite");
        self.suites.get(&suite_id).cloned().ok_or_else(|| not_found("get_suite"))
    }

    fn plan_ids_by_name(&self, name: &str) -> Result<Vec<u64>, ApiError> {
        self.log("plan_ids_by_name");
        Ok(self.plans_by_name.get(name).cloned().unwrap_or_default())
    }

    fn get_results_for_run(&self, run_id: u64) -> Result<Vec<ResultRecord>, ApiError> {
        self.log("get_results_for_run");
        Ok(self.run_results.get(&run_id).cloned().unwrap_or_default())
    }

    fn get_results_for_case(&self, run_id: u64, case_id: u64) -> Result<Vec<ResultRecord>, ApiError> {
        self.log("get_results_for_case");
        Ok(self
            .case_results
            .get(&(run_id, case_id))
            .cloned()
            .unwrap_or_default())
    }

    fn get_tests(&self, run_id: u64) -> Result<Vec<TestInstance>, ApiError> {
        self.log("get_tests");
        Ok(self.run_tests.get(&run_id).cloned().unwrap_or_default())
    }

    fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &NewResult,
    ) -> Result<ResultRecord, ApiError> {
        self.log("add_result_for_case");
        self.submitted.borrow_mut().push(result.clone());
        Ok(ResultRecord {
            id: 9000 + self.submitted.borrow().len() as u64,
            test_id: run_id * 1000 + case_id,
            status_id: Some(result.status_id),
            elapsed: result.elapsed.clone(),
            comment: result.comment.clone(),
            custom_downtime: result.custom_downtime.clone(),
            custom_dev_wait: result.custom_dev_wait.clone(),
            custom_settings_loading_time: result.custom_settings_loading_time.clone(),
            custom_base_state_time: result.custom_base_state_time.clone(),
        })
    }

    fn update_plan_entry(
        &self,
        _plan_id: u64,
        entry_id: &str,
        update: &PlanEntryUpdate,
    ) -> Result<(), ApiError> {
        self.log("update_plan_entry");
        self.entry_updates
            .borrow_mut()
            .push((entry_id.to_string(), update.clone()));
        Ok(())
    }

    fn update_plan_description(&self, _plan_id: u64, _description: &str) -> Result<(), ApiError> {
        self.log("update_plan_description");
        Ok(())
    }

    fn close_plan(&self, _plan_id: u64) -> Result<(), ApiError> {
        self.log("close_plan");
        Ok(())
    }
}
