//! String fixes applied to node `jsonBody` parameters.
//!
//! Request bodies of HTTP nodes are stored as expression strings, so fixes
//! are literal find/replace edits on that string rather than JSON edits.

use serde_json::Value;

use super::Workflow;
use crate::TRACING_TARGET_WORKFLOW;

/// Parameter holding the request body expression.
pub const JSON_BODY: &str = "jsonBody";

/// A find/replace edit on one node's `jsonBody`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyPatch {
    /// Target node name.
    pub node: String,
    /// Literal text to find.
    pub find: String,
    /// Replacement text.
    pub replace: String,
    /// Human-readable description for the console.
    pub description: String,
}

/// What happened to a single patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Replaced this many occurrences.
    Applied(usize),
    /// The node exists but has no string `jsonBody`.
    NoBody,
    /// No node with the target name.
    NodeMissing,
}

impl BodyPatch {
    pub fn new(
        node: impl Into<String>,
        find: impl Into<String>,
        replace: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            node: node.into(),
            find: find.into(),
            replace: replace.into(),
            description: description.into(),
        }
    }

    /// Applies the patch to `workflow`, replacing every occurrence.
    pub fn apply(&self, workflow: &mut Workflow) -> PatchOutcome {
        let Some(node) = workflow.node_by_name_mut(&self.node) else {
            tracing::warn!(
                target: TRACING_TARGET_WORKFLOW,
                node = %self.node,
                "Patch target node not found"
            );
            return PatchOutcome::NodeMissing;
        };

        let Some(Value::String(body)) = node.parameters.get_mut(JSON_BODY) else {
            return PatchOutcome::NoBody;
        };

        let count = body.matches(self.find.as_str()).count();
        if count > 0 {
            *body = body.replace(self.find.as_str(), &self.replace);
        }

        PatchOutcome::Applied(count)
    }
}

/// Applies every patch in order, returning each outcome.
pub fn apply_all<'a>(
    workflow: &mut Workflow,
    patches: &'a [BodyPatch],
) -> Vec<(&'a BodyPatch, PatchOutcome)> {
    patches
        .iter()
        .map(|patch| (patch, patch.apply(workflow)))
        .collect()
}

/// Fixes for the v2 video workflow: vertical 45 second videos and a larger
/// image-analysis token budget.
pub fn production_fixes() -> Vec<BodyPatch> {
    vec![
        BodyPatch::new(
            "Generate Video - KIE.AI",
            "aspect_ratio: '16:9'",
            "aspectRatio: '9:16', duration: '45s'",
            "Fixed video node: aspectRatio 9:16, duration 45s",
        ),
        BodyPatch::new(
            "Analyze Image - OpenAI",
            "max_tokens: 300",
            "max_tokens: 500",
            "Fixed OpenAI node: max_tokens 500",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Node, node_type};

    fn fixture() -> Workflow {
        Workflow::new("UGC v2")
            .with_node(
                Node::new("Generate Video - KIE.AI", node_type::HTTP_REQUEST).with_parameter(
                    JSON_BODY,
                    "={{ JSON.stringify({ prompt: $json.prompt, aspect_ratio: '16:9' }) }}",
                ),
            )
            .with_node(
                Node::new("Analyze Image - OpenAI", node_type::HTTP_REQUEST).with_parameter(
                    JSON_BODY,
                    "={{ JSON.stringify({ model: 'gpt-4o', max_tokens: 300 }) }}",
                ),
            )
    }

    #[test]
    fn test_production_fixes() {
        let mut workflow = fixture();
        let patches = production_fixes();
        let outcomes = apply_all(&mut workflow, &patches);

        assert!(
            outcomes
                .iter()
                .all(|(_, outcome)| *outcome == PatchOutcome::Applied(1))
        );

        let video = workflow.node_by_name("Generate Video - KIE.AI").unwrap();
        let body = video.parameter_str(JSON_BODY).unwrap();
        assert!(body.contains("aspectRatio: '9:16', duration: '45s'"));
        assert!(!body.contains("16:9"));

        let openai = workflow.node_by_name("Analyze Image - OpenAI").unwrap();
        assert!(openai.parameter_str(JSON_BODY).unwrap().contains("max_tokens: 500"));
    }

    #[test]
    fn test_reapplying_is_a_no_op() {
        let mut workflow = fixture();
        apply_all(&mut workflow, &production_fixes());
        let fixes = production_fixes();
        let outcomes = apply_all(&mut workflow, &fixes);
        assert!(
            outcomes
                .iter()
                .all(|(_, outcome)| *outcome == PatchOutcome::Applied(0))
        );
    }

    #[test]
    fn test_missing_targets_are_reported() {
        let mut workflow =
            Workflow::new("Other").with_node(Node::new("Analyze Image - OpenAI", node_type::WAIT));

        let fixes = production_fixes();
        let outcomes = apply_all(&mut workflow, &fixes);
        assert_eq!(outcomes[0].1, PatchOutcome::NodeMissing);
        assert_eq!(outcomes[1].1, PatchOutcome::NoBody);
    }
}
