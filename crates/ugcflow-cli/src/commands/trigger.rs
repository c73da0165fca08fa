//! Webhook trigger commands.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use ugcflow_core::record::{NewVideo, Prefer, VIDEOS_TABLE, VideoRequest};
use ugcflow_core::{Error, HttpResponse, RecordProvider, WorkflowProvider, io};
use ugcflow_reqwest::WorkflowHostConfig;

use super::{WEBHOOK_PATH_V1, WEBHOOK_PATH_V2, fixture, or_default, paths, print_json};
use crate::TRACING_TARGET_COMMAND;

/// Characters of the script hook shown before posting.
const HOOK_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, Args)]
pub struct TriggerArgs {
    /// Payload to post [default: test-data/sample-script-payload.json]
    pub payload: Option<PathBuf>,
    /// Webhook path
    #[arg(long, default_value = WEBHOOK_PATH_V2)]
    pub path: String,
}

impl Default for TriggerArgs {
    fn default() -> Self {
        Self {
            payload: None,
            path: WEBHOOK_PATH_V2.to_owned(),
        }
    }
}

/// Prints the response and fails unless the webhook accepted the request.
fn report(response: HttpResponse, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "📊 Response Status: {}\n", response.status)?;
    writeln!(out, "Response:")?;
    print_json(out, &response.json_or_text())?;

    if !response.is_success() {
        return Err(Error::rejected(response.status, &response.body).into());
    }
    Ok(())
}

pub async fn trigger(
    args: TriggerArgs,
    provider: &dyn WorkflowProvider,
    host: &WorkflowHostConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let file = or_default(args.payload, paths::SAMPLE_SCRIPT_PAYLOAD);
    let payload = io::read_json(&file).await?;

    writeln!(out, "🚀 Triggering workflow...")?;
    if let Ok(request) = serde_json::from_value::<VideoRequest>(payload.clone()) {
        writeln!(out, "   Video ID: {}", request.video_id)?;
        writeln!(out, "   Product: {}", request.product_name)?;
        if let Some(hook) = request.hook_preview(HOOK_PREVIEW_CHARS) {
            writeln!(out, "   Script Hook: {hook}")?;
        }
    }
    writeln!(out)?;

    let response = provider.trigger_webhook(&args.path, &payload).await?;
    let accepted = response.status == 200;
    report(response, out)?;

    if accepted {
        writeln!(out, "\n✅ Workflow triggered successfully!")?;
        writeln!(out, "\n⏳ Video generation in progress (takes ~5-6 minutes)")?;
        writeln!(out, "   Check execution logs: {}", host.executions_url())?;
    }
    Ok(())
}

#[derive(Debug, Clone, Args)]
pub struct TestRunArgs {
    /// Owning account
    #[arg(long, default_value = fixture::USER_ID)]
    pub user_id: String,
    /// Product name
    #[arg(long, default_value = fixture::PRODUCT_NAME)]
    pub product_name: String,
    /// Product category
    #[arg(long, default_value = "tech")]
    pub category: String,
    /// Product features
    #[arg(
        long,
        default_value = "40-hour battery life, noise cancellation, IPX7 waterproof"
    )]
    pub features: String,
    /// Target audience
    #[arg(long, default_value = "fitness enthusiasts and commuters")]
    pub target_audience: String,
    /// Product photo URL
    #[arg(long, default_value = "https://placeholder.com/test.jpg")]
    pub photo_url: String,
    /// Webhook path
    #[arg(long, default_value = WEBHOOK_PATH_V1)]
    pub path: String,
}

impl Default for TestRunArgs {
    fn default() -> Self {
        Self {
            user_id: fixture::USER_ID.to_owned(),
            product_name: fixture::PRODUCT_NAME.to_owned(),
            category: "tech".to_owned(),
            features: "40-hour battery life, noise cancellation, IPX7 waterproof".to_owned(),
            target_audience: "fitness enthusiasts and commuters".to_owned(),
            photo_url: "https://placeholder.com/test.jpg".to_owned(),
            path: WEBHOOK_PATH_V1.to_owned(),
        }
    }
}

/// Inserts a video row with a fresh id and, once the store confirms it,
/// triggers generation for that row.
pub async fn test_run(
    args: TestRunArgs,
    records: &dyn RecordProvider,
    workflows: &dyn WorkflowProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let video = NewVideo::with_random_id(args.user_id, args.product_name)
        .with_category(args.category);

    writeln!(out, "Creating test video record...")?;
    writeln!(out, "  User ID: {}", video.user_id)?;
    writeln!(out, "  Video ID: {}", video.id)?;

    let row = serde_json::to_value(&video).map_err(Error::from)?;
    let created = records.insert(VIDEOS_TABLE, &row, Prefer::Minimal).await?;
    if created.status != 201 {
        return Err(Error::rejected(created.status, &created.body)
            .with_message(format!("failed to create video: HTTP {}", created.status))
            .into());
    }

    tracing::info!(
        target: TRACING_TARGET_COMMAND,
        video_id = %video.id,
        "Video record created"
    );
    writeln!(out, "✅ Video record created\n")?;
    writeln!(out, "Testing workflow...\n")?;

    let mut request = VideoRequest::for_video(&video);
    request.features = Some(args.features);
    request.target_audience = Some(args.target_audience);
    request.product_photo_url = Some(args.photo_url);

    let payload = serde_json::to_value(&request).map_err(Error::from)?;
    let response = workflows.trigger_webhook(&args.path, &payload).await?;
    report(response, out)
}
