use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Test statuses
// ============================================================================

/// TestRail system statuses with their backend-assigned ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Passed,
    Blocked,
    Untested,
    Retest,
    Failed,
}

impl Status {
    pub fn id(self) -> u8 {
        match self {
            Status::Passed => 1,
            Status::Blocked => 2,
            Status::Untested => 3,
            Status::Retest => 4,
            Status::Failed => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Status> {
        match id {
            1 => Some(Status::Passed),
            2 => Some(Status::Blocked),
            3 => Some(Status::Untested),
            4 => Some(Status::Retest),
            5 => Some(Status::Failed),
            _ => None,
        }
    }

    /// Parse a status name as used by the automation harness.
    /// Untested is backend-assigned and cannot be submitted.
    pub fn from_name(name: &str) -> Option<Status> {
        match name {
            "Passed" => Some(Status::Passed),
            "Blocked" => Some(Status::Blocked),
            "Retest" => Some(Status::Retest),
            "Failed" => Some(Status::Failed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Passed => "Passed",
            Status::Blocked => "Blocked",
            Status::Untested => "Untested",
            Status::Retest => "Retest",
            Status::Failed => "Failed",
        }
    }
}

// ============================================================================
// Backend resource records
// ============================================================================

/// A test plan with its run-owning entries.
#[derive(Debug, Clone, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
}

/// A plan entry groups one or more runs. Entry ids are GUID strings.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanEntry {
    pub id: String,
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// A test run. Known fields are typed; everything else the backend
/// attaches (notably the per-status `*_count` fields) lands in `extra`
/// so it can be carried into the summary tables unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct Run {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub suite_id: Option<u64>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Run {
    /// All integral extra fields whose name contains "count"
    /// (passed_count, failed_count, blocked_count, ...).
    pub fn status_counts(&self) -> Vec<(String, i64)> {
        self.extra
            .iter()
            .filter(|(key, _)| key.contains("count"))
            .filter_map(|(key, value)| value.as_i64().map(|n| (key.clone(), n)))
            .collect()
    }

    /// Look up one count field by name, 0 when absent.
    pub fn count_field(&self, name: &str) -> i64 {
        self.extra.get(name).and_then(Value::as_i64).unwrap_or(0)
    }
}

/// The per-run instance of a case, with its current status and the
/// automation marker custom field.
#[derive(Debug, Clone, Deserialize)]
pub struct TestInstance {
    pub id: u64,
    pub case_id: u64,
    pub status_id: u8,
    #[serde(default)]
    pub custom_automatization: Option<bool>,
}

/// One submitted result for a (run, case) pair. Results are append-only:
/// the backend returns them newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultRecord {
    pub id: u64,
    #[serde(default)]
    pub test_id: u64,
    #[serde(default)]
    pub status_id: Option<u8>,
    #[serde(default)]
    pub elapsed: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub custom_downtime: Option<String>,
    #[serde(default)]
    pub custom_dev_wait: Option<String>,
    #[serde(default)]
    pub custom_settings_loading_time: Option<String>,
    #[serde(default)]
    pub custom_base_state_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Case {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub suite_id: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Suite {
    pub id: u64,
    pub name: String,
}

// ============================================================================
// Write payloads
// ============================================================================

/// Payload for `add_result_for_case`. Custom duration fields are omitted
/// from the request when absent rather than sent as null.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewResult {
    pub status_id: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_downtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dev_wait: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_settings_loading_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_base_state_time: Option<String>,
}

/// Payload for `update_plan_entry`: narrows a run's case selection while
/// keeping its name and description.
#[derive(Debug, Clone, Serialize)]
pub struct PlanEntryUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub include_all: bool,
    pub case_ids: Vec<u64>,
}
