//! Workflow documents and the transforms applied to them.
//!
//! A workflow document is a graph of typed [`Node`]s and named directed
//! [`Connections`]. The document is treated as opaque data: nothing here
//! validates that identifiers are unique, that connection targets exist, or
//! that parameter bags match their node type.
//!
//! # Transforms
//!
//! - [`envelope`]: strip API-response and tool-output wrappers
//! - [`placeholder`]: inject secrets into `YOUR_*_API_KEY` tokens
//! - [`projection`]: keep only `name`, `nodes`, `connections`, `settings`
//! - [`patch`]: string fixes on node `jsonBody` parameters
//! - [`analysis`]: console reports

mod connections;
mod node;

pub mod analysis;
pub mod envelope;
pub mod patch;
pub mod placeholder;
pub mod projection;

pub use connections::{Connections, Edge};
pub use node::{Node, node_type};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A workflow document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Identifier assigned by the workflow host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Workflow name.
    #[serde(default)]
    pub name: String,

    /// Activation flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,

    /// Nodes in document order.
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Edges keyed by source node name.
    #[serde(default)]
    pub connections: Connections,

    /// Execution settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,

    /// Remaining fields (tags, pinData, versionId, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workflow {
    /// Creates an empty workflow with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Decodes a workflow from an already unwrapped JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| {
            Error::from(e).with_context("value is not a workflow document")
        })
    }

    /// Encodes the workflow as JSON.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Finds a node by display name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// Finds a node by display name for mutation.
    pub fn node_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.name == name)
    }

    /// Returns the first node with the given type tag.
    pub fn first_node_of_type(&self, kind: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is(kind))
    }

    /// Adds a node.
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge from output slot 0 of `source` to `target`.
    #[must_use]
    pub fn with_edge(mut self, source: &str, target: &str) -> Self {
        self.connections.connect(source, 0, target);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_round_trip_keeps_extra_fields() {
        let value = json!({
            "id": "YanQMNKAFhjSGnt1",
            "name": "UGC Video Generation - v2",
            "active": false,
            "nodes": [{"name": "Webhook", "type": node_type::WEBHOOK, "parameters": {}}],
            "connections": {},
            "settings": {"executionOrder": "v1"},
            "tags": [],
            "versionId": "abc"
        });

        let workflow = Workflow::from_value(value.clone()).unwrap();
        assert_eq!(workflow.id.as_deref(), Some("YanQMNKAFhjSGnt1"));
        assert_eq!(workflow.extra.get("versionId"), Some(&json!("abc")));
        assert_eq!(workflow.to_value().unwrap(), value);
    }

    #[test]
    fn test_missing_fields_default() {
        let workflow = Workflow::from_value(json!({})).unwrap();
        assert!(workflow.name.is_empty());
        assert!(workflow.nodes.is_empty());
        assert_eq!(workflow.connections.edge_count(), 0);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Workflow::from_value(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_lookups() {
        let workflow = Workflow::new("Demo")
            .with_node(Node::new("Trigger", node_type::WEBHOOK))
            .with_node(Node::new("Deduct Credit", node_type::HTTP_REQUEST));

        assert!(workflow.node_by_name("Deduct Credit").is_some());
        assert!(workflow.node_by_name("Missing").is_none());
        assert_eq!(
            workflow.first_node_of_type(node_type::WEBHOOK).map(|n| n.name.as_str()),
            Some("Trigger")
        );
    }
}
