//! Directed edges between workflow nodes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Connections map: source node name to its output slots.
///
/// Each source holds `{"main": [[{"node": <target>, ...}, ...], ...]}` where
/// the outer array is indexed by output slot. The map is kept as raw JSON so
/// that documents round-trip untouched; [`Connections::edges`] gives a typed
/// view. Targets are not checked against the node list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connections(pub Map<String, Value>);

/// A single directed edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<'a> {
    /// Source node name.
    pub source: &'a str,
    /// Output slot on the source node.
    pub output: usize,
    /// Target node name.
    pub target: &'a str,
}

impl Connections {
    /// Returns the number of nodes with outgoing connections.
    pub fn source_count(&self) -> usize {
        self.0.len()
    }

    /// Iterates all edges in document order. Malformed entries are skipped.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.0.iter().flat_map(|(source, outputs)| {
            outputs
                .get("main")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .enumerate()
                .flat_map(move |(output, slot)| {
                    slot.as_array()
                        .into_iter()
                        .flatten()
                        .filter_map(|target| target.get("node").and_then(Value::as_str))
                        .map(move |target| Edge {
                            source: source.as_str(),
                            output,
                            target,
                        })
                })
        })
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Appends an edge from `source` output slot `output` to `target`.
    pub fn connect(&mut self, source: &str, output: usize, target: &str) {
        let entry = self
            .0
            .entry(source.to_owned())
            .or_insert_with(|| json!({"main": []}));

        if !entry.is_object() {
            *entry = json!({"main": []});
        }
        if let Some(outputs) = entry.as_object_mut()
            && !outputs.get("main").is_some_and(Value::is_array)
        {
            outputs.insert("main".to_owned(), json!([]));
        }

        if let Some(slots) = entry.get_mut("main").and_then(Value::as_array_mut) {
            while slots.len() <= output {
                slots.push(json!([]));
            }
            if let Some(slot) = slots[output].as_array_mut() {
                slot.push(json!({"node": target, "type": "main", "index": 0}));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_from_document() {
        let connections: Connections = serde_json::from_value(json!({
            "Webhook": {"main": [[{"node": "Validate", "type": "main", "index": 0}]]},
            "Validate": {"main": [
                [{"node": "Generate", "type": "main", "index": 0}],
                [{"node": "Reject", "type": "main", "index": 0}]
            ]}
        }))
        .unwrap();

        let edges: Vec<_> = connections.edges().collect();
        assert_eq!(connections.source_count(), 2);
        assert_eq!(edges.len(), 3);
        assert_eq!(
            edges[2],
            Edge {
                source: "Validate",
                output: 1,
                target: "Reject"
            }
        );
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let connections: Connections = serde_json::from_value(json!({
            "A": {"main": [null, [{"node": "B"}], [{"type": "main"}]]},
            "C": {"other": []}
        }))
        .unwrap();

        assert_eq!(connections.edge_count(), 1);
    }

    #[test]
    fn test_connect_builds_slots() {
        let mut connections = Connections::default();
        connections.connect("A", 1, "B");
        connections.connect("A", 0, "C");

        let edges: Vec<_> = connections.edges().map(|e| (e.output, e.target)).collect();
        assert_eq!(edges, vec![(0, "C"), (1, "B")]);
    }
}
