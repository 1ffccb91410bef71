use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::client::TestRailClient;
use crate::api::error::ApiError;

// ============================================================================
// Generic resource accessor
// ============================================================================

/// Descriptor for one backend resource family. The API spells every CRUD
/// route as `<verb>_<keyword>/<id>`, so one accessor covers all of them;
/// per-kind differences are capability flags, not subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    pub keyword: &'static str,
    /// Whether the backend supports `close_<keyword>`. Closing a case,
    /// suite or milestone is a no-op.
    pub closable: bool,
}

pub const PLAN: ResourceKind = ResourceKind { keyword: "plan", closable: true };
pub const RUN: ResourceKind = ResourceKind { keyword: "run", closable: true };
pub const SUITE: ResourceKind = ResourceKind { keyword: "suite", closable: false };
pub const CASE: ResourceKind = ResourceKind { keyword: "case", closable: false };
pub const MILESTONE: ResourceKind = ResourceKind { keyword: "milestone", closable: false };

/// Minimal shape for name-based lookups across all resource kinds.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NamedObject {
    pub id: u64,
    pub name: String,
}

/// Generic CRUD access to one resource kind within one project.
pub struct ResourceClient<'a> {
    client: &'a TestRailClient,
    kind: ResourceKind,
    project_id: u64,
}

impl<'a> ResourceClient<'a> {
    pub fn new(client: &'a TestRailClient, kind: ResourceKind, project_id: u64) -> Self {
        Self { client, kind, project_id }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Fetch one object by id.
    pub fn get<T: DeserializeOwned>(&self, object_id: u64) -> Result<T, ApiError> {
        self.client
            .get_typed(&format!("get_{}/{}", self.kind.keyword, object_id))
    }

    /// Fetch all objects of this kind in the project.
    pub fn get_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        self.client
            .get_typed(&format!("get_{}s/{}", self.kind.keyword, self.project_id))
    }

    /// Create a new object in the project.
    pub fn add<D: Serialize, T: DeserializeOwned>(&self, data: &D) -> Result<T, ApiError> {
        self.client
            .post_typed(&format!("add_{}/{}", self.kind.keyword, self.project_id), data)
    }

    /// Update an existing object.
    pub fn update<D: Serialize>(&self, object_id: u64, data: &D) -> Result<Value, ApiError> {
        self.client
            .send_post(&format!("update_{}/{}", self.kind.keyword, object_id), data)
    }

    pub fn delete(&self, object_id: u64) -> Result<(), ApiError> {
        self.client
            .send_post(&format!("delete_{}/{}", self.kind.keyword, object_id), &Value::Null)?;
        Ok(())
    }

    /// Close an object. Returns `Ok(None)` for kinds the backend cannot
    /// close instead of issuing a request that would fail.
    pub fn close(&self, object_id: u64) -> Result<Option<Value>, ApiError> {
        if !self.kind.closable {
            return Ok(None);
        }
        let value = self
            .client
            .send_post(&format!("close_{}/{}", self.kind.keyword, object_id), &Value::Null)?;
        Ok(Some(value))
    }

    /// Whether an object with this id exists. A backend "not found" means
    /// false; any other backend error propagates.
    pub fn exists(&self, object_id: u64) -> Result<bool, ApiError> {
        match self.client.send_get(&format!("get_{}/{}", self.kind.keyword, object_id)) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Ids of all objects in the project carrying exactly this name.
    pub fn ids_by_name(&self, name: &str) -> Result<Vec<u64>, ApiError> {
        let all: Vec<NamedObject> = self.get_all()?;
        Ok(all
            .into_iter()
            .filter(|obj| obj.name == name)
            .map(|obj| obj.id)
            .collect())
    }
}
