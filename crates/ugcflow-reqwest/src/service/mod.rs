//! Service clients.
//!
//! This module implements the [`WorkflowProvider`] and [`RecordProvider`]
//! traits on top of [`ReqwestClient`].
//!
//! [`WorkflowProvider`]: ugcflow_core::WorkflowProvider
//! [`RecordProvider`]: ugcflow_core::RecordProvider
//! [`ReqwestClient`]: crate::ReqwestClient

mod record;
mod workflow;

pub use record::{RecordClient, RecordStoreConfig};
pub use workflow::{WorkflowClient, WorkflowHostConfig};
use url::Url;

use crate::error::{Error, Result};

/// Appends path segments to `base`, percent-encoding each one.
///
/// Segments containing `/` are split so that nested webhook paths keep
/// their structure.
pub(crate) fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| Error::BaseUrl(base.to_string()))?;
        path.pop_if_empty();
        for segment in segments {
            path.extend(segment.split('/').filter(|part| !part.is_empty()));
        }
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_on_bare_host() {
        let base = Url::parse("https://n8n.example.com").unwrap();
        let url = endpoint(&base, ["api", "v1", "workflows", "abc"]).unwrap();
        assert_eq!(url.as_str(), "https://n8n.example.com/api/v1/workflows/abc");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let base = Url::parse("https://example.com/n8n/").unwrap();
        let url = endpoint(&base, ["webhook", "ugc/video"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/n8n/webhook/ugc/video");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("https://example.com").unwrap();
        let url = endpoint(&base, ["api", "v1", "workflows", "a b"]).unwrap();
        assert_eq!(url.path(), "/api/v1/workflows/a%20b");
    }

    #[test]
    fn test_endpoint_rejects_cannot_be_a_base() {
        let base = Url::parse("mailto:ops@example.com").unwrap();
        assert!(endpoint(&base, ["api"]).is_err());
    }
}
