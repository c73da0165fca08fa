//! Subcommands, one per operational task.
//!
//! Every command follows the same linear shape: check secrets, read a file
//! or issue one request, transform, write a file or issue one more request,
//! print a summary to `out`. Remote services are reached only through the
//! provider traits so the command logic is testable with fakes.

mod document;
mod record;
mod trigger;
mod workflow;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;
use ugcflow_core::{SecretKey, Secrets};
use ugcflow_reqwest::{
    RecordClient, RecordStoreConfig, ReqwestClient, ReqwestConfig, WorkflowClient,
    WorkflowHostConfig,
};

pub use self::document::{
    AnalyzeArgs, DeployArgs, ExtractArgs, ExtractV2Args, FixArgs, PayloadArgs, PrepareArgs,
    SummaryArgs, UnwrapArgs,
};
pub use self::record::{CreditsArgs, CreateVideoArgs, VideoStatusArgs};
pub use self::trigger::{TestRunArgs, TriggerArgs};
pub use self::workflow::{ActivateArgs, ImportArgs, NodeArgs, UpdateArgs, WebhookInfoArgs};
use crate::TRACING_TARGET_COMMAND;

/// Default file locations, relative to the working directory.
pub mod paths {
    /// Template export with placeholder tokens, wrapped as tool output.
    pub const WORKING: &str = "n8n/workflows/ugc-video-generation-WORKING-v1.json";
    /// Unwrapped template.
    pub const CLEAN: &str = "n8n/workflows/ugc-video-generation-CLEAN.json";
    /// Template with real keys; must not be committed.
    pub const DEPLOYED: &str = "n8n/workflows/ugc-video-generation-DEPLOYED.json";
    /// Projected payload with real keys.
    pub const READY_TO_IMPORT: &str = "n8n/workflows/READY-TO-IMPORT.json";
    /// Projected payload restored from the deployed export.
    pub const IMPORT_READY: &str = "n8n/workflows/IMPORT-READY.json";
    /// v2 workflow as fetched, before fixes.
    pub const V2_BEFORE_FIXES: &str = "n8n/workflows/ugc-video-generation-v2-before-fixes.json";
    /// v2 workflow with production fixes applied.
    pub const V2_FIXED: &str = "n8n/workflows/ugc-video-generation-v2-fixed.json";
    /// Sample v2 webhook payload with a pre-written script.
    pub const SAMPLE_SCRIPT_PAYLOAD: &str = "test-data/sample-script-payload.json";
}

/// Fixture identifiers shared by the store commands.
pub mod fixture {
    /// Test account used by the smoke-test commands.
    pub const USER_ID: &str = "42a140a2-b4c5-4e2e-92bd-449e87f52605";
    /// Product name used by the smoke-test commands.
    pub const PRODUCT_NAME: &str = "Wireless Earbuds Pro";
}

/// Webhook path of the v1 generation workflow.
pub const WEBHOOK_PATH_V1: &str = "ugc-video-generate";

/// Webhook path of the v2 generation workflow.
pub const WEBHOOK_PATH_V2: &str = "ugc-video-generate-v2";

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Strip the tool-output wrapper from the working export.
    Unwrap(UnwrapArgs),
    /// Project the deployed export into an import payload.
    Extract(ExtractArgs),
    /// Extract the v2 workflow from a saved tool output and verify its id.
    #[command(name = "extract-v2")]
    ExtractV2(ExtractV2Args),
    /// Inject provider keys into the template.
    Deploy(DeployArgs),
    /// Inject provider keys into the clean export and project it.
    Prepare(PrepareArgs),
    /// Print a structural report of a workflow file.
    Analyze(AnalyzeArgs),
    /// Print name and counts of a workflow file.
    Summary(SummaryArgs),
    /// Print the import payload of a workflow file.
    Payload(PayloadArgs),
    /// Apply the production jsonBody fixes to the v2 workflow.
    Fix(FixArgs),
    /// Create a workflow on the host from a file.
    Import(ImportArgs),
    /// Replace a workflow on the host from a file.
    Update(UpdateArgs),
    /// Mark a workflow active on the host.
    Activate(ActivateArgs),
    /// Print the webhook trigger configuration of a remote workflow.
    #[command(name = "webhook-info")]
    WebhookInfo(WebhookInfoArgs),
    /// Print one node of a remote workflow.
    Node(NodeArgs),
    /// Print the credit rows of a user.
    Credits(CreditsArgs),
    /// Print the generation status of a video.
    #[command(name = "video-status")]
    VideoStatus(VideoStatusArgs),
    /// Insert the fixture video row.
    #[command(name = "create-video")]
    CreateVideo(CreateVideoArgs),
    /// Post a payload file to a webhook trigger.
    Trigger(TriggerArgs),
    /// Insert a fresh video row and trigger generation for it.
    #[command(name = "test-run")]
    TestRun(TestRunArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unwrap(_) => "unwrap",
            Self::Extract(_) => "extract",
            Self::ExtractV2(_) => "extract-v2",
            Self::Deploy(_) => "deploy",
            Self::Prepare(_) => "prepare",
            Self::Analyze(_) => "analyze",
            Self::Summary(_) => "summary",
            Self::Payload(_) => "payload",
            Self::Fix(_) => "fix",
            Self::Import(_) => "import",
            Self::Update(_) => "update",
            Self::Activate(_) => "activate",
            Self::WebhookInfo(_) => "webhook-info",
            Self::Node(_) => "node",
            Self::Credits(_) => "credits",
            Self::VideoStatus(_) => "video-status",
            Self::CreateVideo(_) => "create-video",
            Self::Trigger(_) => "trigger",
            Self::TestRun(_) => "test-run",
        }
    }

    /// Secrets that must be present before the command does any I/O.
    pub fn required_secrets(&self) -> &'static [SecretKey] {
        match self {
            Self::Deploy(_) | Self::Prepare(_) => {
                &[SecretKey::KieAiApiKey, SecretKey::OpenAiApiKey]
            }
            Self::Import(_)
            | Self::Update(_)
            | Self::Activate(_)
            | Self::WebhookInfo(_)
            | Self::Node(_) => &[SecretKey::N8nApiKey],
            Self::Credits(_) | Self::VideoStatus(_) | Self::CreateVideo(_) => {
                &[SecretKey::SupabaseServiceRoleKey]
            }
            Self::Trigger(_) => &[SecretKey::WebhookSecret],
            Self::TestRun(_) => &[SecretKey::SupabaseServiceRoleKey, SecretKey::WebhookSecret],
            Self::Unwrap(_)
            | Self::Extract(_)
            | Self::ExtractV2(_)
            | Self::Analyze(_)
            | Self::Summary(_)
            | Self::Payload(_)
            | Self::Fix(_) => &[],
        }
    }

    /// Runs the command, writing its summary to `out`.
    pub async fn run(self, session: &Session, out: &mut impl Write) -> anyhow::Result<()> {
        let name = self.name();
        session
            .secrets
            .require(self.required_secrets())
            .with_context(|| format!("cannot run `{name}`"))?;

        tracing::debug!(target: TRACING_TARGET_COMMAND, command = name, "Running command");

        let result = match self {
            Self::Unwrap(args) => document::unwrap(args, out).await,
            Self::Extract(args) => document::extract(args, out).await,
            Self::ExtractV2(args) => document::extract_v2(args, out).await,
            Self::Deploy(args) => {
                document::deploy(args, &session.secrets, &session.workflow_host, out).await
            }
            Self::Prepare(args) => document::prepare(args, &session.secrets, out).await,
            Self::Analyze(args) => document::analyze(args, out).await,
            Self::Summary(args) => document::summary(args, out).await,
            Self::Payload(args) => document::payload(args, out).await,
            Self::Fix(args) => document::fix(args, out).await,
            Self::Import(args) => {
                let client = session.workflow_client()?;
                workflow::import(args, &client, client.config(), out).await
            }
            Self::Update(args) => workflow::update(args, &session.workflow_client()?, out).await,
            Self::Activate(args) => {
                workflow::activate(args, &session.workflow_client()?, out).await
            }
            Self::WebhookInfo(args) => {
                let client = session.workflow_client()?;
                workflow::webhook_info(args, &client, client.config(), out).await
            }
            Self::Node(args) => workflow::node(args, &session.workflow_client()?, out).await,
            Self::Credits(args) => record::credits(args, &session.record_client()?, out).await,
            Self::VideoStatus(args) => {
                record::video_status(args, &session.record_client()?, out).await
            }
            Self::CreateVideo(args) => {
                record::create_video(args, &session.record_client()?, out).await
            }
            Self::Trigger(args) => {
                let client = session.workflow_client()?;
                trigger::trigger(args, &client, client.config(), out).await
            }
            Self::TestRun(args) => {
                let workflows = session.workflow_client()?;
                let records = session.record_client()?;
                trigger::test_run(args, &records, &workflows, out).await
            }
        };

        result.with_context(|| format!("`{name}` failed"))
    }
}

/// Secrets and service locations shared by every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub secrets: Secrets,
    pub workflow_host: WorkflowHostConfig,
    pub record_store: RecordStoreConfig,
    pub http: ReqwestConfig,
}

impl Session {
    pub fn new(
        secrets: Secrets,
        workflow_host: WorkflowHostConfig,
        record_store: RecordStoreConfig,
        http: ReqwestConfig,
    ) -> Self {
        Self {
            secrets,
            workflow_host,
            record_store,
            http,
        }
    }

    fn http_client(&self) -> anyhow::Result<ReqwestClient> {
        let client = ReqwestClient::new(self.http.clone())
            .map_err(ugcflow_core::Error::from)
            .context("failed to create HTTP client")?;
        Ok(client)
    }

    /// Workflow host client, carrying the webhook secret when set.
    fn workflow_client(&self) -> anyhow::Result<WorkflowClient> {
        let api_key = self.secrets.get(SecretKey::N8nApiKey).unwrap_or_default();
        let client = WorkflowClient::new(self.http_client()?, self.workflow_host.clone(), api_key);

        Ok(match self.secrets.get(SecretKey::WebhookSecret) {
            Some(secret) => client.with_webhook_secret(secret),
            None => client,
        })
    }

    fn record_client(&self) -> anyhow::Result<RecordClient> {
        let service_key = self.secrets.required(SecretKey::SupabaseServiceRoleKey)?;
        Ok(RecordClient::new(
            self.http_client()?,
            self.record_store.clone(),
            service_key,
        ))
    }
}

/// Writes `value` to `out` as pretty-printed JSON.
fn print_json(out: &mut impl Write, value: &serde_json::Value) -> anyhow::Result<()> {
    writeln!(out, "{}", ugcflow_core::io::to_pretty_json(value)?)?;
    Ok(())
}

/// Resolves an optional path argument against its default.
fn or_default(path: Option<PathBuf>, default: &str) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
pub(crate) mod testing;
