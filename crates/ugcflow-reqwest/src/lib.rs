//! Reqwest-based HTTP clients for ugcflow.
//!
//! This crate implements the `ugcflow-core` provider traits on top of a
//! shared [`ReqwestClient`]:
//!
//! - [`WorkflowClient`] for the workflow host REST API and webhook triggers
//! - [`RecordClient`] for the tabular store REST API
//!
//! # Example
//!
//! ```rust,ignore
//! use ugcflow_core::WorkflowProvider;
//! use ugcflow_reqwest::{ReqwestClient, ReqwestConfig, WorkflowClient, WorkflowHostConfig};
//!
//! let http = ReqwestClient::new(ReqwestConfig::default())?;
//! let host = WorkflowHostConfig::new("https://n8n.example.com".parse()?);
//! let workflows = WorkflowClient::new(http, host, "api-key");
//! let document = workflows.get_workflow("iJ24oWpgg52IvNt1").await?;
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod connect;
mod error;
mod service;

#[cfg(test)]
mod test_server;

pub use crate::connect::{ReqwestClient, ReqwestConfig, TRACING_TARGET};
pub use crate::error::{Error, Result};
pub use crate::service::{RecordClient, RecordStoreConfig, WorkflowClient, WorkflowHostConfig};
