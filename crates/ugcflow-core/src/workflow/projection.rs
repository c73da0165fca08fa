//! Import payload projection.
//!
//! The workflow host accepts only `name`, `nodes`, `connections` and
//! `settings` on create/update; everything else (id, active, tags, version
//! metadata) must be dropped before sending.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name used when the source document has none.
pub const DEFAULT_NAME: &str = "UGC Video Generation - v1 (Restored)";

/// Suffix appended to restored workflow names.
pub const RESTORED_SUFFIX: &str = " (Restored)";

/// Suffix appended when restoring from the deployed export.
pub const RESTORED_WITH_PROMPTS_SUFFIX: &str = " (Restored with UGC Prompts)";

/// The four-key body accepted by the workflow host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPayload {
    pub name: String,
    pub nodes: Value,
    pub connections: Value,
    pub settings: Value,
}

impl ImportPayload {
    /// Projects a workflow document onto the import fields.
    ///
    /// `settings` defaults to an empty mapping, `nodes` to an empty list and
    /// `connections` to an empty mapping. A missing name becomes
    /// [`DEFAULT_NAME`].
    pub fn from_document(document: &Value) -> Self {
        let name = document
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_NAME)
            .to_owned();

        Self {
            name,
            nodes: field_or(document, "nodes", Value::Array(Vec::new())),
            connections: field_or(document, "connections", Value::Object(Map::new())),
            settings: field_or(document, "settings", Value::Object(Map::new())),
        }
    }

    /// Appends a suffix to the name.
    #[must_use]
    pub fn with_name_suffix(mut self, suffix: &str) -> Self {
        self.name.push_str(suffix);
        self
    }

    /// Number of nodes in the payload.
    pub fn node_count(&self) -> usize {
        self.nodes.as_array().map_or(0, Vec::len)
    }

    /// Encodes the payload as JSON.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_owned(), Value::String(self.name.clone()));
        map.insert("nodes".to_owned(), self.nodes.clone());
        map.insert("connections".to_owned(), self.connections.clone());
        map.insert("settings".to_owned(), self.settings.clone());
        Value::Object(map)
    }
}

fn field_or(document: &Value, key: &str, default: Value) -> Value {
    match document.get(key) {
        None | Some(Value::Null) => default,
        Some(value) => value.clone(),
    }
}
