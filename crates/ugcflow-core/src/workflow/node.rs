//! Workflow nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Well-known node type tags.
pub mod node_type {
    /// Inbound HTTP trigger.
    pub const WEBHOOK: &str = "n8n-nodes-base.webhook";
    /// Outbound HTTP call.
    pub const HTTP_REQUEST: &str = "n8n-nodes-base.httpRequest";
    /// Timed pause.
    pub const WAIT: &str = "n8n-nodes-base.wait";
}

/// A typed unit within a workflow document.
///
/// The parameter bag is kept as free-form JSON; nothing checks that it
/// matches the declared type tag. Unknown fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name, also used as the key in the connections map.
    #[serde(default)]
    pub name: String,

    /// Type tag such as `n8n-nodes-base.webhook`.
    #[serde(rename = "type", default)]
    pub kind: String,

    /// Type-specific parameters.
    #[serde(default)]
    pub parameters: Map<String, Value>,

    /// Webhook registration id (webhook nodes only).
    #[serde(rename = "webhookId", default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,

    /// Remaining fields (position, typeVersion, credentials, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates a node with the given name and type tag.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Sets a parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Sets the node identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Returns whether the node carries the given type tag.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Returns a parameter value.
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Returns a parameter value if it is a string.
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameter(key).and_then(Value::as_str)
    }

    /// Renders a parameter for console output; strings are printed bare.
    pub fn parameter_display(&self, key: &str) -> String {
        match self.parameter(key) {
            None | Some(Value::Null) => "(unset)".to_owned(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_preserves_unknown_fields() {
        let value = json!({
            "id": "a1",
            "name": "Webhook",
            "type": node_type::WEBHOOK,
            "typeVersion": 2,
            "position": [0, 0],
            "webhookId": "hook-1",
            "parameters": {"path": "ugc-video-generate", "httpMethod": "POST"}
        });

        let node: Node = serde_json::from_value(value).unwrap();
        assert!(node.is(node_type::WEBHOOK));
        assert_eq!(node.webhook_id.as_deref(), Some("hook-1"));
        assert_eq!(node.parameter_str("path"), Some("ugc-video-generate"));
        assert_eq!(node.extra.get("typeVersion"), Some(&json!(2)));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["position"], json!([0, 0]));
        assert_eq!(back["webhookId"], json!("hook-1"));
    }

    #[test]
    fn test_parameter_display() {
        let node = Node::new("Wait", node_type::WAIT)
            .with_parameter("amount", 30)
            .with_parameter("unit", "seconds");

        assert_eq!(node.parameter_display("amount"), "30");
        assert_eq!(node.parameter_display("unit"), "seconds");
        assert_eq!(node.parameter_display("missing"), "(unset)");
    }
}
