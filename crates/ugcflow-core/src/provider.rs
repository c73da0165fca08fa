//! Remote service seams.
//!
//! Commands talk to the workflow host and the tabular store only through
//! these traits. Implementations issue exactly one request per call and do
//! not retry.

use serde_json::Value;

use crate::record::Prefer;
use crate::{HttpResponse, Result};

/// Workflow host REST API.
#[async_trait::async_trait]
pub trait WorkflowProvider: Send + Sync {
    /// Fetches a workflow document by id.
    async fn get_workflow(&self, id: &str) -> Result<Value>;

    /// Creates a workflow; returns the host's response document.
    async fn create_workflow(&self, body: &Value) -> Result<Value>;

    /// Replaces a workflow by id; returns the host's response document.
    async fn update_workflow(&self, id: &str, body: &Value) -> Result<Value>;

    /// Posts `payload` to the webhook trigger at `path`.
    ///
    /// The response is returned whatever its status.
    async fn trigger_webhook(&self, path: &str, payload: &Value) -> Result<HttpResponse>;
}

/// Tabular store REST API.
#[async_trait::async_trait]
pub trait RecordProvider: Send + Sync {
    /// Returns the rows of `table` where `column` equals `value`.
    async fn select(&self, table: &str, column: &str, value: &str) -> Result<Vec<Value>>;

    /// Inserts `row` into `table`.
    ///
    /// The response is returned whatever its status.
    async fn insert(&self, table: &str, row: &Value, prefer: Prefer) -> Result<HttpResponse>;
}
