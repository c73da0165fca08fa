//! Console reports over workflow documents.

use std::fmt;

use super::{Node, Workflow, node_type};

/// Per-node entry of a [`WorkflowReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry {
    /// Node name.
    pub name: String,
    /// Type tag.
    pub kind: String,
    /// Node identifier, if any.
    pub id: Option<String>,
    /// Type-specific key/value details.
    pub details: Vec<(&'static str, String)>,
}

impl NodeEntry {
    fn from_node(node: &Node) -> Self {
        let details = match node.kind.as_str() {
            node_type::WEBHOOK => vec![
                ("Path", format!("/webhook/{}", node.parameter_display("path"))),
                ("Method", node.parameter_display("httpMethod")),
            ],
            node_type::HTTP_REQUEST => vec![
                (
                    "URL",
                    node.parameter_str("url")
                        .filter(|url| !url.is_empty())
                        .unwrap_or("dynamic")
                        .to_owned(),
                ),
                ("Method", node.parameter_display("method")),
            ],
            node_type::WAIT => vec![(
                "Duration",
                format!(
                    "{} {}",
                    node.parameter_display("amount"),
                    node.parameter_display("unit")
                ),
            )],
            _ => Vec::new(),
        };

        Self {
            name: node.name.clone(),
            kind: node.kind.clone(),
            id: node.id.clone(),
            details,
        }
    }
}

/// Structural report of a workflow: nodes with key parameters and edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowReport {
    /// Nodes in document order.
    pub nodes: Vec<NodeEntry>,
    /// Edges as `(source, target)` pairs.
    pub edges: Vec<(String, String)>,
}

impl WorkflowReport {
    /// Builds the report for `workflow`.
    pub fn new(workflow: &Workflow) -> Self {
        let nodes = workflow.nodes.iter().map(NodeEntry::from_node).collect();
        let edges = workflow
            .connections
            .edges()
            .map(|edge| (edge.source.to_owned(), edge.target.to_owned()))
            .collect();

        Self { nodes, edges }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl fmt::Display for WorkflowReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Workflow Analysis")?;
        writeln!(f)?;
        writeln!(f, "Total Nodes: {}", self.node_count())?;
        writeln!(f)?;

        for (index, node) in self.nodes.iter().enumerate() {
            writeln!(f, "{}. **{}**", index + 1, node.name)?;
            writeln!(f, "   - Type: {}", node.kind)?;
            writeln!(f, "   - ID: {}", node.id.as_deref().unwrap_or("(none)"))?;
            for (label, value) in &node.details {
                writeln!(f, "   - {label}: {value}")?;
            }
            writeln!(f)?;
        }

        writeln!(f)?;
        writeln!(f, "## Connections")?;
        writeln!(f)?;
        for (source, target) in &self.edges {
            writeln!(f, "{source} -> {target}")?;
        }
        write!(f, "\nTotal Connections: {}", self.edge_count())
    }
}

/// Short identification summary of a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSummary {
    pub name: String,
    pub id: Option<String>,
    pub node_count: usize,
    /// Number of nodes with outgoing connections.
    pub connection_count: usize,
}

impl WorkflowSummary {
    /// Summarizes `workflow`.
    pub fn new(workflow: &Workflow) -> Self {
        Self {
            name: workflow.name.clone(),
            id: workflow.id.clone(),
            node_count: workflow.nodes.len(),
            connection_count: workflow.connections.source_count(),
        }
    }
}

impl fmt::Display for WorkflowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Workflow: \"{}\"", self.name)?;
        if let Some(id) = &self.id {
            writeln!(f, "   ID: {id}")?;
        }
        writeln!(f, "   Nodes: {}", self.node_count)?;
        write!(f, "   Connections: {}", self.connection_count)
    }
}
