//! Local JSON document I/O.
//!
//! Documents are read with a full-file parse and written pretty-printed with
//! two-space indentation. Parent directories are created on write.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{Error, Result, TRACING_TARGET_IO};

/// Reads a file into a string.
pub async fn read_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    tracing::debug!(target: TRACING_TARGET_IO, path = %path.display(), "Reading file");

    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::from(e).with_context(path.display().to_string()))
}

/// Reads and parses a JSON document.
pub async fn read_json(path: impl AsRef<Path>) -> Result<Value> {
    read_json_as(path).await
}

/// Reads a JSON document and deserializes it into `T`.
pub async fn read_json_as<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text = read_text(path).await?;
    serde_json::from_str(&text).map_err(|e| Error::from(e).with_context(path.display().to_string()))
}

/// Serializes `value` as two-space-indented JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes `value` to `path` as pretty-printed JSON.
pub async fn write_json_pretty<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<()> {
    let text = to_pretty_json(value)?;
    write_text(path, &text).await
}

/// Writes a string to `path`, creating parent directories as needed.
pub async fn write_text(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::from(e).with_context(parent.display().to_string()))?;
    }

    tracing::debug!(
        target: TRACING_TARGET_IO,
        path = %path.display(),
        bytes = text.len(),
        "Writing file"
    );

    tokio::fs::write(path, text)
        .await
        .map_err(|e| Error::from(e).with_context(path.display().to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ErrorKind;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/workflow.json");
        let document = json!({"name": "Demo", "nodes": []});

        write_json_pretty(&path, &document).await.unwrap();

        let text = read_text(&path).await.unwrap();
        assert!(text.contains("\n  \"name\": \"Demo\""));
        assert_eq!(read_json(&path).await.unwrap(), document);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = read_json(dir.path().join("absent.json")).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Io);
        assert!(error.context.unwrap().contains("absent.json"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let error = read_json(&path).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
