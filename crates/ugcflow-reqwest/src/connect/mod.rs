//! Reqwest client module.
//!
//! This module provides the shared HTTP client used by every service
//! client. It wraps the `reqwest` crate and buffers response bodies.

mod client;
mod config;

pub use client::{ReqwestClient, TRACING_TARGET};
pub use config::ReqwestConfig;
