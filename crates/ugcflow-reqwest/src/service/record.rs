//! Tabular store REST API client.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ugcflow_core::record::Prefer;
use ugcflow_core::{HttpResponse, RecordProvider};
use url::Url;

use super::endpoint;
use crate::connect::{ReqwestClient, TRACING_TARGET};
use crate::error::Error;

/// Default tabular store host.
pub const DEFAULT_BASE_URL: &str = "https://crgbmbotbmzfibzupdhi.supabase.co";

/// Tabular store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RecordStoreConfig {
    /// Base URL of the tabular store
    #[cfg_attr(
        feature = "config",
        arg(long = "supabase-url", env = "SUPABASE_URL", default_value = DEFAULT_BASE_URL)
    )]
    pub supabase_url: Url,
}

impl RecordStoreConfig {
    /// Creates a configuration pointing at `supabase_url`.
    pub fn new(supabase_url: Url) -> Self {
        Self { supabase_url }
    }
}

/// Client for `/rest/v1/{table}` on the tabular store.
#[derive(Clone)]
pub struct RecordClient {
    http: ReqwestClient,
    config: RecordStoreConfig,
    service_key: String,
}

impl std::fmt::Debug for RecordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RecordClient {
    /// Creates a client authenticating with the service-role key.
    pub fn new(
        http: ReqwestClient,
        config: RecordStoreConfig,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            config,
            service_key: service_key.into(),
        }
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .http()
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait::async_trait]
impl RecordProvider for RecordClient {
    async fn select(
        &self,
        table: &str,
        column: &str,
        value: &str,
    ) -> ugcflow_core::Result<Vec<Value>> {
        let mut url = endpoint(&self.config.supabase_url, ["rest", "v1", table])?;
        url.query_pairs_mut()
            .append_pair(column, &format!("eq.{value}"))
            .append_pair("select", "*");

        tracing::debug!(target: TRACING_TARGET, table, column, "Selecting rows");

        let response = self.http.send(self.request(reqwest::Method::GET, url)).await?;
        response.error_for_status()?.json_as()
    }

    async fn insert(
        &self,
        table: &str,
        row: &Value,
        prefer: Prefer,
    ) -> ugcflow_core::Result<HttpResponse> {
        let url = endpoint(&self.config.supabase_url, ["rest", "v1", table])?;
        let bytes = serde_json::to_vec(row).map_err(Error::Serde)?;

        tracing::debug!(
            target: TRACING_TARGET,
            table,
            prefer = prefer.as_ref(),
            "Inserting row"
        );

        let request = self
            .request(reqwest::Method::POST, url)
            .header("Content-Type", "application/json")
            .header("Prefer", prefer.as_ref())
            .body(bytes);

        Ok(self.http.send(request).await?)
    }
}
