//! Local workflow file commands.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use ugcflow_core::workflow::analysis::{WorkflowReport, WorkflowSummary};
use ugcflow_core::workflow::envelope::normalize;
use ugcflow_core::workflow::patch::{PatchOutcome, apply_all, production_fixes};
use ugcflow_core::workflow::placeholder::{remaining_placeholders, substitute_document};
use ugcflow_core::workflow::projection::{
    ImportPayload, RESTORED_SUFFIX, RESTORED_WITH_PROMPTS_SUFFIX,
};
use ugcflow_core::{Error, Secrets, Workflow, io};
use ugcflow_reqwest::WorkflowHostConfig;

use super::{or_default, paths, print_json};

/// Identifier of the v2 workflow on the host.
pub const EXPECTED_V2_ID: &str = "YanQMNKAFhjSGnt1";

#[derive(Debug, Clone, Default, Args)]
pub struct UnwrapArgs {
    /// Wrapped export [default: n8n/workflows/ugc-video-generation-WORKING-v1.json]
    pub input: Option<PathBuf>,
    /// Output file [default: n8n/workflows/ugc-video-generation-CLEAN.json]
    pub output: Option<PathBuf>,
}

pub async fn unwrap(args: UnwrapArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let input = or_default(args.input, paths::WORKING);
    let output = or_default(args.output, paths::CLEAN);

    writeln!(out, "📦 Reading wrapped workflow...")?;
    let unwrapped = normalize(io::read_json(&input).await?)?;
    if unwrapped.was_bare() {
        writeln!(out, "✅ Already clean JSON format")?;
    } else {
        writeln!(out, "✅ Unwrapped from persisted output format")?;
    }

    let workflow = Workflow::from_value(unwrapped.document.clone())?;
    writeln!(out, "{}", WorkflowSummary::new(&workflow))?;

    io::write_json_pretty(&output, &unwrapped.document).await?;
    writeln!(out, "\n💾 Clean workflow saved to: {}", output.display())?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExtractArgs {
    /// Deployed export [default: n8n/workflows/ugc-video-generation-DEPLOYED.json]
    pub input: Option<PathBuf>,
    /// Output file [default: n8n/workflows/IMPORT-READY.json]
    pub output: Option<PathBuf>,
}

pub async fn extract(args: ExtractArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let input = or_default(args.input, paths::DEPLOYED);
    let output = or_default(args.output, paths::IMPORT_READY);

    let document = normalize(io::read_json(&input).await?)?.document;
    let payload =
        ImportPayload::from_document(&document).with_name_suffix(RESTORED_WITH_PROMPTS_SUFFIX);

    io::write_json_pretty(&output, &payload.to_value()).await?;
    writeln!(out, "✅ Extracted workflow data to {}", output.display())?;
    writeln!(out, "   Nodes: {}", payload.node_count())?;
    writeln!(out, "   Name: {}", payload.name)?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct ExtractV2Args {
    /// Saved tool output holding the fetched workflow
    pub input: PathBuf,
    /// Output file [default: n8n/workflows/ugc-video-generation-v2-before-fixes.json]
    pub output: Option<PathBuf>,
    /// Workflow id the document must carry
    #[arg(long, default_value = EXPECTED_V2_ID)]
    pub expect_id: String,
}

pub async fn extract_v2(args: ExtractV2Args, out: &mut impl Write) -> anyhow::Result<()> {
    let output = or_default(args.output, paths::V2_BEFORE_FIXES);

    writeln!(out, "📦 Reading MCP output file...")?;
    let document = normalize(io::read_json(&args.input).await?)?.document;
    let workflow = Workflow::from_value(document.clone())?;
    let found = workflow.id.as_deref().unwrap_or_default();

    writeln!(out, "✅ Extracted workflow data")?;
    writeln!(out, "   Name: {}", workflow.name)?;
    writeln!(out, "   ID: {}", workflow.id.as_deref().unwrap_or("(none)"))?;
    writeln!(out, "   Nodes: {}", workflow.nodes.len())?;

    if found != args.expect_id {
        return Err(Error::invalid_input()
            .with_message(format!(
                "not the expected workflow: expected ID {}, found {}",
                args.expect_id,
                workflow.id.as_deref().unwrap_or("(none)")
            ))
            .into());
    }

    io::write_json_pretty(&output, &document).await?;
    writeln!(out, "\n💾 V2 workflow saved to: {}", output.display())?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct DeployArgs {
    /// Template with placeholder tokens [default: n8n/workflows/ugc-video-generation-WORKING-v1.json]
    pub template: Option<PathBuf>,
    /// Output file [default: n8n/workflows/ugc-video-generation-DEPLOYED.json]
    pub output: Option<PathBuf>,
}

/// Substitutes placeholders in the template, keeping any envelope around it.
pub async fn deploy(
    args: DeployArgs,
    secrets: &Secrets,
    host: &WorkflowHostConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let template = or_default(args.template, paths::WORKING);
    let output = or_default(args.output, paths::DEPLOYED);

    writeln!(out, "🚀 Deploying Workflow with Real API Keys...\n")?;
    writeln!(out, "📄 Reading template...")?;
    let document = io::read_json(&template).await?;

    writeln!(out, "🔑 Injecting API keys...")?;
    let (_, substitution) = substitute_document(&document, secrets)?;
    for (placeholder, count) in &substitution.replaced {
        writeln!(out, "   {placeholder}: {count} replaced")?;
    }

    let remaining = remaining_placeholders(&substitution.text);
    if remaining > 0 {
        tracing::warn!(
            target: crate::TRACING_TARGET_COMMAND,
            remaining,
            "Placeholder tokens remain after substitution"
        );
    }

    writeln!(out, "💾 Writing deployed workflow...")?;
    io::write_text(&output, &substitution.text).await?;

    writeln!(out, "\n✅ Deployment complete!\n")?;
    writeln!(out, "📦 Deployed workflow: {}", output.display())?;
    writeln!(out, "\n📋 Next steps:")?;
    writeln!(out, "   1. Go to the workflow dashboard: {}", host.n8n_url)?;
    writeln!(out, "   2. Import: {}", output.display())?;
    writeln!(out, "   3. Activate the workflow")?;
    writeln!(
        out,
        "\n⚠️  Note: {} contains real API keys, do not commit it",
        output.display()
    )?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct PrepareArgs {
    /// Clean export [default: n8n/workflows/ugc-video-generation-CLEAN.json]
    pub input: Option<PathBuf>,
    /// Output file [default: n8n/workflows/READY-TO-IMPORT.json]
    pub output: Option<PathBuf>,
}

pub async fn prepare(
    args: PrepareArgs,
    secrets: &Secrets,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let input = or_default(args.input, paths::CLEAN);
    let output = or_default(args.output, paths::READY_TO_IMPORT);

    writeln!(out, "🚀 Preparing workflow for import...\n")?;
    let document = io::read_json(&input).await?;

    writeln!(out, "🔑 Injecting API keys...")?;
    let (document, _) = substitute_document(&document, secrets)?;
    let payload = ImportPayload::from_document(&document).with_name_suffix(RESTORED_SUFFIX);

    io::write_json_pretty(&output, &payload.to_value()).await?;
    writeln!(out, "\n✅ Workflow ready for import!")?;
    writeln!(out, "   Name: {}", payload.name)?;
    writeln!(out, "   Nodes: {}", payload.node_count())?;
    writeln!(out, "   File: {}", output.display())?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct AnalyzeArgs {
    /// Workflow file [default: n8n/workflows/ugc-video-generation-CLEAN.json]
    pub file: Option<PathBuf>,
}

pub async fn analyze(args: AnalyzeArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::CLEAN);
    let workflow: Workflow = io::read_json_as(&file).await?;
    writeln!(out, "{}", WorkflowReport::new(&workflow))?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct SummaryArgs {
    /// Workflow file [default: n8n/workflows/READY-TO-IMPORT.json]
    pub file: Option<PathBuf>,
}

pub async fn summary(args: SummaryArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::READY_TO_IMPORT);
    let workflow: Workflow = io::read_json_as(&file).await?;

    writeln!(out, "{}", WorkflowSummary::new(&workflow))?;
    writeln!(out)?;
    writeln!(out, "The workflow JSON is in: {}", file.display())?;
    writeln!(out, "To create it on the workflow host:")?;
    writeln!(out, "   1. ugcflow import {}", file.display())?;
    writeln!(out, "   2. Or import manually via the editor UI")?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct PayloadArgs {
    /// Workflow file [default: n8n/workflows/ugc-video-generation-DEPLOYED.json]
    pub file: Option<PathBuf>,
}

/// Prints the import payload as JSON and nothing else, so the output can be
/// piped.
pub async fn payload(args: PayloadArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::DEPLOYED);
    let document: Value = io::read_json(&file).await?;
    print_json(out, &ImportPayload::from_document(&document).to_value())
}

#[derive(Debug, Clone, Default, Args)]
pub struct FixArgs {
    /// Workflow before fixes [default: n8n/workflows/ugc-video-generation-v2-before-fixes.json]
    pub input: Option<PathBuf>,
    /// Output file [default: n8n/workflows/ugc-video-generation-v2-fixed.json]
    pub output: Option<PathBuf>,
}

pub async fn fix(args: FixArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let input = or_default(args.input, paths::V2_BEFORE_FIXES);
    let output = or_default(args.output, paths::V2_FIXED);

    writeln!(out, "📦 Loading v2 workflow backup...")?;
    let mut workflow: Workflow = io::read_json_as(&input).await?;
    writeln!(out, "{}", WorkflowSummary::new(&workflow))?;

    writeln!(out, "\n🔧 Applying fixes...")?;
    let patches = production_fixes();
    for (patch, outcome) in apply_all(&mut workflow, &patches) {
        match outcome {
            PatchOutcome::Applied(0) => {
                writeln!(out, "   ➖ {}: already applied", patch.node)?;
            }
            PatchOutcome::Applied(_) => writeln!(out, "   ✅ {}", patch.description)?,
            PatchOutcome::NoBody => {
                writeln!(out, "   ⚠️  {}: no jsonBody, skipped", patch.node)?;
            }
            PatchOutcome::NodeMissing => {
                writeln!(out, "   ⚠️  {}: node not found, skipped", patch.node)?;
            }
        }
    }

    io::write_json_pretty(&output, &workflow).await?;
    writeln!(out, "\n💾 Fixed workflow saved to: {}", output.display())?;
    writeln!(out, "\nNext step: ugcflow update {}", output.display())?;
    Ok(())
}
