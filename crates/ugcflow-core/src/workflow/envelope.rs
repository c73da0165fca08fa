//! Envelope detection and unwrapping.
//!
//! Workflow documents reach the filesystem in three shapes:
//!
//! - tool output: `[{"type": "text", "text": "<json>"}, ...]`
//! - API response: `{"data": {...}}` (optionally with `"success": true`)
//! - bare: the workflow object itself
//!
//! Shapes are tried in that order and unwrapping repeats until the bare
//! shape is reached, so a tool output wrapping an API response yields the
//! inner workflow.

use serde_json::Value;

use crate::{Error, Result, TRACING_TARGET_WORKFLOW};

/// Outer wrapper shape of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Array whose first element is `{type: "text", text: <string>}`.
    ToolOutput,
    /// Object carrying the payload under an object-valued `data` field.
    ApiResponse,
    /// Anything else.
    Bare,
}

impl Envelope {
    /// Detects the outermost envelope of `value`.
    pub fn detect(value: &Value) -> Self {
        if tool_output_text(value).is_some() {
            return Self::ToolOutput;
        }

        if value.get("data").is_some_and(Value::is_object) {
            return Self::ApiResponse;
        }

        Self::Bare
    }
}

/// Result of [`normalize`]: the bare document and the envelopes removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Unwrapped {
    /// Innermost document.
    pub document: Value,
    /// Envelopes removed, outermost first.
    pub removed: Vec<Envelope>,
}

impl Unwrapped {
    /// Returns whether the input was already bare.
    pub fn was_bare(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Strips all known envelopes from `value`.
///
/// The only failure is a tool-output envelope whose text is not JSON; every
/// other shape falls back to being treated as bare.
pub fn normalize(value: Value) -> Result<Unwrapped> {
    let mut document = value;
    let mut removed = Vec::new();

    loop {
        let envelope = Envelope::detect(&document);
        document = match envelope {
            Envelope::Bare => break,
            Envelope::ToolOutput => {
                let text = tool_output_text(&document).unwrap_or_default();
                serde_json::from_str(text).map_err(|e| {
                    Error::from(e).with_context("tool output text is not a JSON document")
                })?
            }
            Envelope::ApiResponse => match document {
                Value::Object(mut map) => map.remove("data").unwrap_or_default(),
                other => other,
            },
        };

        tracing::trace!(
            target: TRACING_TARGET_WORKFLOW,
            envelope = ?envelope,
            "Removed envelope"
        );
        removed.push(envelope);
    }

    Ok(Unwrapped { document, removed })
}

/// Shorthand for [`normalize`] returning only the document.
pub fn unwrap_document(value: Value) -> Result<Value> {
    normalize(value).map(|unwrapped| unwrapped.document)
}

fn tool_output_text(value: &Value) -> Option<&str> {
    let first = value.as_array()?.first()?;
    if first.get("type").and_then(Value::as_str) != Some("text") {
        return None;
    }
    first.get("text").and_then(Value::as_str)
}
