//! Tabular store commands.

use std::io::Write;

use clap::Args;
use ugcflow_core::record::{CREDITS_TABLE, NewVideo, Prefer, VIDEOS_TABLE, VideoRecord};
use ugcflow_core::{Error, RecordProvider};

use super::{fixture, print_json};

/// Row id of the fixture video.
pub const FIXTURE_VIDEO_ID: &str = "test-v2-0001-0001-0001-000000000001";

/// Product photo of the fixture video.
pub const FIXTURE_PHOTO_URL: &str =
    "https://images.unsplash.com/photo-1590658268037-6bf12165a8df?w=800";

#[derive(Debug, Clone, Default, Args)]
pub struct CreditsArgs {
    /// Account to look up
    #[arg(default_value = fixture::USER_ID)]
    pub user_id: String,
}

pub async fn credits(
    args: CreditsArgs,
    provider: &dyn RecordProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rows = provider
        .select(CREDITS_TABLE, "user_id", &args.user_id)
        .await?;

    writeln!(out, "User Credits:")?;
    print_json(out, &serde_json::Value::Array(rows))
}

#[derive(Debug, Clone, Default, Args)]
pub struct VideoStatusArgs {
    /// Video row id
    pub video_id: String,
}

pub async fn video_status(
    args: VideoStatusArgs,
    provider: &dyn RecordProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let rows = provider.select(VIDEOS_TABLE, "id", &args.video_id).await?;
    let Some(row) = rows.into_iter().next() else {
        writeln!(out, "Video not found")?;
        return Ok(());
    };

    let record: VideoRecord = serde_json::from_value(row).map_err(Error::from)?;
    writeln!(out, "\n{record}")?;
    Ok(())
}

#[derive(Debug, Clone, Args)]
pub struct CreateVideoArgs {
    /// Row id
    #[arg(long, default_value = FIXTURE_VIDEO_ID)]
    pub id: String,
    /// Owning account
    #[arg(long, default_value = fixture::USER_ID)]
    pub user_id: String,
    /// Product name
    #[arg(long, default_value = fixture::PRODUCT_NAME)]
    pub product_name: String,
    /// Product photo URL
    #[arg(long, default_value = FIXTURE_PHOTO_URL)]
    pub photo_url: String,
}

impl Default for CreateVideoArgs {
    fn default() -> Self {
        Self {
            id: FIXTURE_VIDEO_ID.to_owned(),
            user_id: fixture::USER_ID.to_owned(),
            product_name: fixture::PRODUCT_NAME.to_owned(),
            photo_url: FIXTURE_PHOTO_URL.to_owned(),
        }
    }
}

/// Inserts the fixture row; only 201 counts as created.
pub async fn create_video(
    args: CreateVideoArgs,
    provider: &dyn RecordProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let video = NewVideo::processing(args.id, args.user_id, args.product_name)
        .with_photo_url(args.photo_url);

    writeln!(out, "📝 Creating test video record...")?;
    writeln!(out, "   Video ID: {}", video.id)?;

    let row = serde_json::to_value(&video).map_err(Error::from)?;
    let response = provider
        .insert(VIDEOS_TABLE, &row, Prefer::Representation)
        .await?;

    if response.status != 201 {
        return Err(Error::rejected(response.status, &response.body).into());
    }

    writeln!(out, "\n✅ Test video record created successfully")?;
    Ok(())
}
