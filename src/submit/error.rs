use std::fmt;

use crate::api::error::ApiError;

#[derive(Debug)]
pub enum SubmitError {
    /// Case identifier taken from the test name is not numeric
    CaseIdNotNumeric(String),

    /// Case exists but belongs to a different suite
    CaseNotInSuite { case_id: u64, suite_id: u64 },

    /// Run exists but was created from a different suite
    SuiteNotInRun { suite_id: u64, run_id: u64 },

    /// No object of this kind carries the expected name
    NotFoundByName { kind: &'static str, name: String },

    /// More than one object of this kind carries the expected name
    AmbiguousName { kind: &'static str, name: String, matches: usize },

    /// The target run is already closed
    RunClosed { run_id: u64 },

    /// Status name the backend does not know
    UnknownStatus(String),

    /// Backend/transport failure
    Api(ApiError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::CaseIdNotNumeric(name) => {
                write!(f, "Test name '{}' is not a case id", name)
            }
            SubmitError::CaseNotInSuite { case_id, suite_id } => {
                write!(f, "Case {} not found in suite {}", case_id, suite_id)
            }
            SubmitError::SuiteNotInRun { suite_id, run_id } => {
                write!(f, "Suite {} not found in run {}", suite_id, run_id)
            }
            SubmitError::NotFoundByName { kind, name } => {
                write!(f, "No {} named '{}' was found", kind, name)
            }
            SubmitError::AmbiguousName { kind, name, matches } => {
                write!(f, "Found {} {}s named '{}', expected exactly one", matches, kind, name)
            }
            SubmitError::RunClosed { run_id } => {
                write!(f, "Run {} is closed", run_id)
            }
            SubmitError::UnknownStatus(name) => {
                write!(f, "Unknown test status: {}", name)
            }
            SubmitError::Api(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for SubmitError {
    fn from(e: ApiError) -> Self {
        SubmitError::Api(e)
    }
}
