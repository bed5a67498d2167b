//! An owned document that edits are applied to in turn.

use serde_json::Value;

use crate::edit::Edit;
use crate::error::EditError;
use crate::resolve;
use crate::search::{self, SearchHit};

/// Owns one JSON value and replaces it with the result of each successful
/// edit. A failed edit leaves the value as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    value: Value,
}

impl Document {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn apply(&mut self, edit: &Edit) -> Result<&Value, EditError> {
        self.value = edit.apply(&self.value)?;
        Ok(&self.value)
    }

    pub fn query(&self, path: &str) -> Result<Vec<Value>, EditError> {
        resolve::query(&self.value, path)
    }

    pub fn search(&self, needle: &str) -> Vec<SearchHit> {
        search::search(&self.value, needle)
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
