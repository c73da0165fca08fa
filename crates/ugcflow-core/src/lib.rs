#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for workflow document operations.
pub const TRACING_TARGET_WORKFLOW: &str = "ugcflow_core::workflow";

/// Tracing target for local document I/O.
pub const TRACING_TARGET_IO: &str = "ugcflow_core::io";

/// Tracing target for secret loading.
pub const TRACING_TARGET_SECRETS: &str = "ugcflow_core::secrets";

mod error;
mod provider;
mod response;

pub mod io;
pub mod record;
pub mod secrets;
pub mod workflow;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use provider::{RecordProvider, WorkflowProvider};
pub use response::HttpResponse;
pub use secrets::{SecretKey, Secrets};
pub use workflow::Workflow;
