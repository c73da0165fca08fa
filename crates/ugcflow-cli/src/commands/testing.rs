//! Fixtures and in-memory providers for command tests.

use std::sync::Mutex;

use serde_json::{Value, json};
use ugcflow_core::record::Prefer;
use ugcflow_core::{Error, HttpResponse, RecordProvider, Result, WorkflowProvider};

pub fn output(out: Vec<u8>) -> String {
    String::from_utf8(out).unwrap()
}

/// Three-node workflow: webhook -> video request -> wait.
pub fn workflow_fixture() -> Value {
    json!({
        "name": "UGC Video Generation",
        "nodes": [
            {
                "id": "n1",
                "name": "Webhook",
                "type": "n8n-nodes-base.webhook",
                "parameters": {"path": "ugc-video-generate", "httpMethod": "POST"},
                "webhookId": "wh-1"
            },
            {
                "id": "n2",
                "name": "Generate Video - KIE.AI",
                "type": "n8n-nodes-base.httpRequest",
                "parameters": {"method": "POST"}
            },
            {
                "id": "n3",
                "name": "Wait for Video",
                "type": "n8n-nodes-base.wait",
                "parameters": {"amount": 30, "unit": "seconds"}
            }
        ],
        "connections": {
            "Webhook": {"main": [[{"node": "Generate Video - KIE.AI", "type": "main", "index": 0}]]},
            "Generate Video - KIE.AI": {"main": [[{"node": "Wait for Video", "type": "main", "index": 0}]]}
        },
        "settings": {"executionOrder": "v1"}
    })
}

/// A recorded provider call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub operation: &'static str,
    pub target: String,
    pub body: Option<Value>,
}

/// Workflow host fake backed by a single stored document.
#[derive(Debug, Default)]
pub struct FakeWorkflows {
    pub document: Option<Value>,
    /// Status returned by create/update; 200 when unset.
    pub status: Option<u16>,
    pub webhook_status: Option<u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeWorkflows {
    pub fn with_document(document: Value) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, target: &str, body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            operation,
            target: target.to_owned(),
            body: body.cloned(),
        });
    }

    fn respond(&self, body: Value) -> Result<Value> {
        HttpResponse::new(self.status.unwrap_or(200), body.to_string())
            .error_for_status()?
            .json()
    }
}

#[async_trait::async_trait]
impl WorkflowProvider for FakeWorkflows {
    async fn get_workflow(&self, id: &str) -> Result<Value> {
        self.record("get", id, None);
        self.document
            .clone()
            .ok_or_else(|| Error::rejected(404, r#"{"message":"Not Found"}"#))
    }

    async fn create_workflow(&self, body: &Value) -> Result<Value> {
        self.record("create", "", Some(body));
        let mut created = body.clone();
        created["id"] = json!("created-1");
        created["active"] = json!(false);
        self.respond(created)
    }

    async fn update_workflow(&self, id: &str, body: &Value) -> Result<Value> {
        self.record("update", id, Some(body));
        let mut updated = body.clone();
        updated["id"] = json!(id);
        self.respond(updated)
    }

    async fn trigger_webhook(&self, path: &str, payload: &Value) -> Result<HttpResponse> {
        self.record("trigger", path, Some(payload));
        let status = self.webhook_status.unwrap_or(200);
        let body = if status == 200 {
            json!({"message": "Workflow was started"}).to_string()
        } else {
            "Internal error".to_owned()
        };
        Ok(HttpResponse::new(status, body))
    }
}

/// Tabular store fake with fixed rows.
#[derive(Debug, Default)]
pub struct FakeRecords {
    pub rows: Vec<Value>,
    /// Status returned by insert; 201 when unset.
    pub insert_status: Option<u16>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeRecords {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RecordProvider for FakeRecords {
    async fn select(&self, table: &str, column: &str, value: &str) -> Result<Vec<Value>> {
        self.calls.lock().unwrap().push(Call {
            operation: "select",
            target: format!("{table}?{column}=eq.{value}"),
            body: None,
        });
        Ok(self
            .rows
            .iter()
            .filter(|row| row.get(column).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect())
    }

    async fn insert(&self, table: &str, row: &Value, prefer: Prefer) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push(Call {
            operation: "insert",
            target: format!("{table} {prefer}"),
            body: Some(row.clone()),
        });
        let status = self.insert_status.unwrap_or(201);
        let body = match (status, prefer) {
            (201, Prefer::Representation) => json!([row]).to_string(),
            (201, Prefer::Minimal) => String::new(),
            _ => r#"{"message":"duplicate key value violates unique constraint"}"#.to_owned(),
        };
        Ok(HttpResponse::new(status, body))
    }
}
