use serde_json::json;

use crate::api::client::TestRailClient;
use crate::api::error::ApiError;
use crate::api::models::{Case, NewResult, Plan, PlanEntryUpdate, ResultRecord, Run, Suite, TestInstance};
use crate::api::resources::{CASE, PLAN, RUN, ResourceClient, SUITE};

pub mod client;
pub mod error;
pub mod models;
pub mod resources;

// ============================================================================
// Backend seam
// ============================================================================

/// Everything the reporting and submission pipelines need from the
/// test-tracking backend. `TestRailProject` implements it over HTTP;
/// tests swap in a recording mock.
pub trait TestRailApi {
    fn get_plan(&self, plan_id: u64) -> Result<Plan, ApiError>;
    fn get_run(&self, run_id: u64) -> Result<Run, ApiError>;
    fn get_case(&self, case_id: u64) -> Result<Case, ApiError>;
    fn get_suite(&self, suite_id: u64) -> Result<Suite, ApiError>;

    /// Ids of plans in the project with exactly this name.
    fn plan_ids_by_name(&self, name: &str) -> Result<Vec<u64>, ApiError>;

    fn get_results_for_run(&self, run_id: u64) -> Result<Vec<ResultRecord>, ApiError>;
    fn get_results_for_case(&self, run_id: u64, case_id: u64) -> Result<Vec<ResultRecord>, ApiError>;
    fn get_tests(&self, run_id: u64) -> Result<Vec<TestInstance>, ApiError>;

    fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &NewResult,
    ) -> Result<ResultRecord, ApiError>;

    fn update_plan_entry(
        &self,
        plan_id: u64,
        entry_id: &str,
        update: &PlanEntryUpdate,
    ) -> Result<(), ApiError>;

    fn update_plan_description(&self, plan_id: u64, description: &str) -> Result<(), ApiError>;

    fn close_plan(&self, plan_id: u64) -> Result<(), ApiError>;

    /// Ids of runs inside a plan with exactly this run name.
    fn run_ids_by_name(&self, plan_id: u64, run_name: &str) -> Result<Vec<u64>, ApiError> {
        let plan = self.get_plan(plan_id)?;
        Ok(plan
            .entries
            .iter()
            .flat_map(|entry| entry.runs.iter())
            .filter(|run| run.name == run_name)
            .map(|run| run.id)
            .collect())
    }
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// One TestRail project seen through a configured client. All object ids
/// are threaded explicitly; the session carries only the project scope.
pub struct TestRailProject {
    client: TestRailClient,
    project_id: u64,
}

impl TestRailProject {
    pub fn new(client: TestRailClient, project_id: u64) -> Self {
        Self { client, project_id }
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn plans(&self) -> ResourceClient<'_> {
        ResourceClient::new(&self.client, PLAN, self.project_id)
    }

    pub fn runs(&self) -> ResourceClient<'_> {
        ResourceClient::new(&self.client, RUN, self.project_id)
    }

    pub fn suites(&self) -> ResourceClient<'_> {
        ResourceClient::new(&self.client, SUITE, self.project_id)
    }

    pub fn cases(&self) -> ResourceClient<'_> {
        ResourceClient::new(&self.client, CASE, self.project_id)
    }
}

impl TestRailApi for TestRailProject {
    fn get_plan(&self, plan_id: u64) -> Result<Plan, ApiError> {
        self.plans().get(plan_id)
    }

    fn get_run(&self, run_id: u64) -> Result<Run, ApiError> {
        self.runs().get(run_id)
    }

    fn get_case(&self, case_id: u64) -> Result<Case, ApiError> {
        self.cases().get(case_id)
    }

    fn get_suite(&self, suite_id: u64) -> Result<Suite, ApiError> {
        self.suites().get(suite_id)
    }

    fn plan_ids_by_name(&self, name: &str) -> Result<Vec<u64>, ApiError> {
        self.plans().ids_by_name(name)
    }

    fn get_results_for_run(&self, run_id: u64) -> Result<Vec<ResultRecord>, ApiError> {
        self.client.get_typed(&format!("get_results_for_run/{}", run_id))
    }

    fn get_results_for_case(&self, run_id: u64, case_id: u64) -> Result<Vec<ResultRecord>, ApiError> {
        self.client
            .get_typed(&format!("get_results_for_case/{}/{}", run_id, case_id))
    }

    fn get_tests(&self, run_id: u64) -> Result<Vec<TestInstance>, ApiError> {
        self.client.get_typed(&format!("get_tests/{}", run_id))
    }

    fn add_result_for_case(
        &self,
        run_id: u64,
        case_id: u64,
        result: &NewResult,
    ) -> Result<ResultRecord, ApiError> {
        self.client
            .post_typed(&format!("add_result_for_case/{}/{}", run_id, case_id), result)
    }

    fn update_plan_entry(
        &self,
        plan_id: u64,
        entry_id: &str,
        update: &PlanEntryUpdate,
    ) -> Result<(), ApiError> {
        self.client
            .send_post(&format!("update_plan_entry/{}/{}", plan_id, entry_id), update)?;
        Ok(())
    }

    fn update_plan_description(&self, plan_id: u64, description: &str) -> Result<(), ApiError> {
        self.plans()
            .update(plan_id, &json!({ "description": description }))?;
        Ok(())
    }

    fn close_plan(&self, plan_id: u64) -> Result<(), ApiError> {
        self.plans().close(plan_id)?;
        Ok(())
    }
}
