//! Workflow host REST API client.

#[cfg(feature = "config")]
use clap::Args;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ugcflow_core::{HttpResponse, WorkflowProvider};
use url::Url;

use super::endpoint;
use crate::connect::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;

/// Header carrying the workflow host API key.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Header carrying the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "X-API-Key";

/// Default workflow host.
pub const DEFAULT_BASE_URL: &str = "https://n8n.sam9scloud.in";

/// Workflow host location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct WorkflowHostConfig {
    /// Base URL of the workflow host
    #[cfg_attr(
        feature = "config",
        arg(long = "n8n-url", env = "N8N_BASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    pub n8n_url: Url,
}

impl WorkflowHostConfig {
    /// Creates a configuration pointing at `n8n_url`.
    pub fn new(n8n_url: Url) -> Self {
        Self { n8n_url }
    }

    /// Editor URL of a workflow, for console output.
    pub fn editor_url(&self, id: &str) -> String {
        endpoint(&self.n8n_url, ["workflow", id])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/workflow/{id}", self.n8n_url))
    }

    /// Execution log URL, for console output.
    pub fn executions_url(&self) -> String {
        endpoint(&self.n8n_url, ["executions"])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/executions", self.n8n_url))
    }

    /// Public URL of a webhook trigger, for console output.
    pub fn webhook_url(&self, path: &str) -> String {
        endpoint(&self.n8n_url, ["webhook", path])
            .map(String::from)
            .unwrap_or_else(|_| format!("{}/webhook/{path}", self.n8n_url))
    }
}

/// Client for `/api/v1/workflows` and `/webhook/{path}` on the workflow host.
///
/// Success is decided purely by status code: 200 and 201 are accepted,
/// anything else becomes a [`Rejected`] error carrying the verbatim body.
///
/// [`Rejected`]: ugcflow_core::ErrorKind::Rejected
#[derive(Clone)]
pub struct WorkflowClient {
    http: ReqwestClient,
    config: WorkflowHostConfig,
    api_key: String,
    webhook_secret: Option<String>,
}

impl std::fmt::Debug for WorkflowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowClient")
            .field("config", &self.config)
            .field("webhook_secret", &self.webhook_secret.is_some())
            .finish_non_exhaustive()
    }
}

impl WorkflowClient {
    /// Creates a client authenticating with `api_key`.
    pub fn new(
        http: ReqwestClient,
        config: WorkflowHostConfig,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            api_key: api_key.into(),
            webhook_secret: None,
        }
    }

    /// Sets the secret sent with webhook triggers.
    #[must_use]
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(secret.into());
        self
    }

    /// Gets the host configuration.
    pub fn config(&self) -> &WorkflowHostConfig {
        &self.config
    }

    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> ugcflow_core::Result<Value> {
        let url = endpoint(
            &self.config.n8n_url,
            ["api", "v1", "workflows"].into_iter().chain(segments.iter().copied()),
        )?;

        tracing::debug!(
            target: TRACING_TARGET,
            method = %method,
            url = %url,
            "Calling workflow host"
        );

        let mut request = self
            .http
            .http()
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key);

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(Error::Serde)?;
            request = request
                .header("Content-Type", "application/json")
                .body(bytes);
        }

        let response = self.http.send(request).await?;
        if !response.is_success() {
            tracing::warn!(
                target: TRACING_TARGET,
                status = response.status,
                "Workflow host rejected request"
            );
        }

        response.error_for_status()?.json()
    }
}

#[async_trait::async_trait]
impl WorkflowProvider for WorkflowClient {
    async fn get_workflow(&self, id: &str) -> ugcflow_core::Result<Value> {
        self.call(Method::GET, &[id], None).await
    }

    async fn create_workflow(&self, body: &Value) -> ugcflow_core::Result<Value> {
        self.call(Method::POST, &[], Some(body)).await
    }

    async fn update_workflow(&self, id: &str, body: &Value) -> ugcflow_core::Result<Value> {
        self.call(Method::PUT, &[id], Some(body)).await
    }

    async fn trigger_webhook(
        &self,
        path: &str,
        payload: &Value,
    ) -> ugcflow_core::Result<HttpResponse> {
        let url = endpoint(&self.config.n8n_url, ["webhook", path])?;
        let bytes = serde_json::to_vec(payload).map_err(Error::Serde)?;

        tracing::debug!(
            target: TRACING_TARGET,
            url = %url,
            bytes = bytes.len(),
            "Triggering webhook"
        );

        let mut request = self
            .http
            .http()
            .post(url)
            .header("Content-Type", "application/json")
            .body(bytes);

        if let Some(secret) = &self.webhook_secret {
            request = request.header(WEBHOOK_SECRET_HEADER, secret);
        }

        Ok(self.http.send(request).await?)
    }
}
