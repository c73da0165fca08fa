//! Buffered HTTP responses.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result};

/// A fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, verbatim.
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns whether the remote accepted the request (200 or 201).
    pub fn is_success(&self) -> bool {
        matches!(self.status, 200 | 201)
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value> {
        self.json_as()
    }

    /// Parses the body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::from(e).with_context(self.body.clone()))
    }

    /// Parses the body as JSON, falling back to the raw text as a string.
    pub fn json_or_text(&self) -> Value {
        self.json()
            .unwrap_or_else(|_| Value::String(self.body.clone()))
    }

    /// Converts a non-success response into a [`Rejected`] error.
    ///
    /// [`Rejected`]: crate::ErrorKind::Rejected
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::rejected(self.status, &self.body))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_success_statuses() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_error_for_status() {
        let error = HttpResponse::new(400, "bad request body")
            .error_for_status()
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Rejected);
        assert_eq!(error.context.as_deref(), Some("bad request body"));
    }

    #[test]
    fn test_json_or_text() {
        assert_eq!(HttpResponse::new(200, r#"{"a":1}"#).json_or_text(), json!({"a": 1}));
        assert_eq!(
            HttpResponse::new(500, "Internal error").json_or_text(),
            json!("Internal error")
        );
    }
}
