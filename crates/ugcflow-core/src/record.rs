//! Rows of the tabular backing store and webhook payloads.

use std::fmt;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

/// Table holding one row per generated video.
pub const VIDEOS_TABLE: &str = "videos";

/// Table holding per-user credit balances.
pub const CREDITS_TABLE: &str = "credits";

/// Verbosity requested from the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, AsRefStr, Display, IntoStaticStr)]
pub enum Prefer {
    /// Echo the inserted row.
    #[strum(serialize = "return=representation")]
    Representation,
    /// Empty body.
    #[default]
    #[strum(serialize = "return=minimal")]
    Minimal,
}

/// Video generation status row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub generated_image_url: Option<String>,
    #[serde(default)]
    pub generated_video_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub generation_time_seconds: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl fmt::Display for VideoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📹 Video Generation Status:")?;
        writeln!(f, "  Video ID: {}", self.id)?;
        writeln!(f, "  Status: {}", or(&self.status, "unknown"))?;
        writeln!(f, "  Product: {}", or(&self.product_name, "unknown"))?;
        writeln!(f, "  Image URL: {}", or(&self.generated_image_url, "(pending)"))?;
        writeln!(f, "  Video URL: {}", or(&self.generated_video_url, "(pending)"))?;
        writeln!(f, "  Error: {}", or(&self.error_message, "none"))?;
        match self.generation_time_seconds {
            Some(seconds) if seconds > 0.0 => writeln!(f, "  Generation Time: {seconds}s")?,
            _ => writeln!(f, "  Generation Time: pending")?,
        }
        writeln!(f, "  Created: {}", local_time(self.created_at.as_deref()))?;
        write!(f, "  Updated: {}", local_time(self.updated_at.as_deref()))
    }
}

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(fallback)
}

/// Renders a store timestamp in the system time zone, or verbatim if it
/// does not parse.
pub fn local_time(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "unknown".to_owned();
    };

    match value.parse::<Timestamp>() {
        Ok(timestamp) => timestamp
            .to_zoned(TimeZone::system())
            .strftime("%Y-%m-%d %H:%M:%S %Z")
            .to_string(),
        Err(_) => value.to_owned(),
    }
}

/// New row for the videos table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVideo {
    pub id: String,
    pub user_id: String,
    pub product_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_photo_url: Option<String>,
}

impl NewVideo {
    /// Creates a row in the `processing` state.
    pub fn processing(
        id: impl Into<String>,
        user_id: impl Into<String>,
        product_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            product_name: product_name.into(),
            status: "processing".to_owned(),
            product_category: None,
            product_photo_url: None,
        }
    }

    /// Creates a `processing` row with a random id.
    pub fn with_random_id(user_id: impl Into<String>, product_name: impl Into<String>) -> Self {
        Self::processing(Uuid::new_v4().to_string(), user_id, product_name)
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.product_category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.product_photo_url = Some(url.into());
        self
    }
}

/// Body posted to the video generation webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRequest {
    pub user_id: String,
    pub video_id: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_photo_url: Option<String>,
    /// Pre-written script (v2 workflow).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ugc_script: Option<Value>,
}

impl VideoRequest {
    /// Builds the request matching a freshly inserted row.
    pub fn for_video(video: &NewVideo) -> Self {
        Self {
            user_id: video.user_id.clone(),
            video_id: video.id.clone(),
            product_name: video.product_name.clone(),
            product_category: video.product_category.clone(),
            features: None,
            target_audience: None,
            product_photo_url: video.product_photo_url.clone(),
            ugc_script: None,
        }
    }

    /// First `max` characters of the script hook, with an ellipsis when cut.
    pub fn hook_preview(&self, max: usize) -> Option<String> {
        let hook = self.ugc_script.as_ref()?.get("hook")?.as_str()?;
        let preview: String = hook.chars().take(max).collect();
        if hook.chars().count() > max {
            Some(format!("{preview}..."))
        } else {
            Some(preview)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_prefer_header_values() {
        assert_eq!(Prefer::Representation.as_ref(), "return=representation");
        assert_eq!(Prefer::Minimal.to_string(), "return=minimal");
    }

    #[test]
    fn test_pending_video_display() {
        let record: VideoRecord = serde_json::from_value(json!({
            "id": "bbbbbbbb-cccc-dddd-eeee-000000000001",
            "status": "processing",
            "product_name": "Wireless Earbuds Pro",
            "generated_image_url": null,
            "generation_time_seconds": null,
            "created_at": "2025-01-10T12:00:00+00:00"
        }))
        .unwrap();

        let rendered = record.to_string();
        assert!(rendered.contains("Status: processing"));
        assert!(rendered.contains("Image URL: (pending)"));
        assert!(rendered.contains("Error: none"));
        assert!(rendered.contains("Generation Time: pending"));
        assert!(rendered.contains("Updated: unknown"));
        assert!(!rendered.contains("Created: unknown"));
    }

    #[test]
    fn test_completed_video_display() {
        let record = VideoRecord {
            id: "v1".into(),
            status: Some("completed".into()),
            generated_video_url: Some("https://cdn.example/v1.mp4".into()),
            generation_time_seconds: Some(312.0),
            ..VideoRecord::default()
        };

        let rendered = record.to_string();
        assert!(rendered.contains("Video URL: https://cdn.example/v1.mp4"));
        assert!(rendered.contains("Generation Time: 312s"));
    }

    #[test]
    fn test_unparseable_time_is_verbatim() {
        assert_eq!(local_time(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_new_video_serialization() {
        let video = NewVideo::processing("id-1", "user-1", "Earbuds").with_category("tech");
        let value = serde_json::to_value(&video).unwrap();
        assert_eq!(value["status"], json!("processing"));
        assert_eq!(value["product_category"], json!("tech"));
        assert!(value.get("product_photo_url").is_none());

        let random = NewVideo::with_random_id("user-1", "Earbuds");
        assert!(Uuid::parse_str(&random.id).is_ok());
    }

    #[test]
    fn test_hook_preview() {
        let request: VideoRequest = serde_json::from_value(json!({
            "user_id": "u",
            "video_id": "v",
            "product_name": "p",
            "ugc_script": {"hook": "Stop scrolling! These earbuds changed my morning runs forever."}
        }))
        .unwrap();

        let preview = request.hook_preview(50).unwrap();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 53);
    }
}
