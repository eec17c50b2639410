//! Call store for funding call persistence.

use std::path::PathBuf;

use grantdesk_models::{Call, CallId};

use crate::atomic::{atomic_write_json, read_json_dir, read_json_optional};
use crate::error::{PersistenceError, Result};

/// Manages persistence of calls.
///
/// Calls are stored as individual JSON files:
/// ```text
/// base_path/
/// └── calls/
///     ├── call-abc123.json
///     └── call-def456.json
/// ```
#[derive(Debug, Clone)]
pub struct CallStore {
    base_path: PathBuf,
}

impl CallStore {
    /// Creates a new CallStore with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn calls_dir(&self) -> PathBuf {
        self.base_path.join("calls")
    }

    fn call_path(&self, id: &CallId) -> Result<PathBuf> {
        if !id.is_path_safe() {
            return Err(PersistenceError::InvalidId(format!("invalid call id: {}", id)));
        }
        Ok(self.calls_dir().join(format!("{}.json", id)))
    }

    /// Saves a call, replacing any previous version.
    pub fn save_call(&self, call: &Call) -> Result<()> {
        atomic_write_json(&self.call_path(&call.id)?, call)
    }

    /// Loads a call by ID.
    pub fn load_call(&self, id: &CallId) -> Result<Call> {
        self.find_call(id)?.ok_or_else(|| PersistenceError::NotFound {
            kind: "call".to_string(),
            id: id.to_string(),
        })
    }

    /// Loads a call by ID, returning None if it doesn't exist.
    pub fn find_call(&self, id: &CallId) -> Result<Option<Call>> {
        read_json_optional(&self.call_path(id)?)
    }

    /// Lists all calls, newest first.
    pub fn list_calls(&self) -> Result<Vec<Call>> {
        let mut calls: Vec<Call> = read_json_dir(&self.calls_dir())?;
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(calls)
    }
}
