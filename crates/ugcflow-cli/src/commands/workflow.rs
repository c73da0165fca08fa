//! Workflow host commands.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde_json::Value;
use ugcflow_core::workflow::node_type;
use ugcflow_core::workflow::projection::ImportPayload;
use ugcflow_core::{Error, Workflow, WorkflowProvider, io};
use ugcflow_reqwest::WorkflowHostConfig;

use super::{or_default, paths, print_json};
use crate::TRACING_TARGET_COMMAND;

/// Node printed by `node` when no name is given.
pub const DEFAULT_NODE_NAME: &str = "Deduct Credit";

/// Reads a field from a host response, which is either the workflow itself
/// or wraps it under `data`.
fn response_field<'a>(response: &'a Value, key: &str) -> Option<&'a Value> {
    response
        .get(key)
        .filter(|value| !value.is_null())
        .or_else(|| response.get("data").and_then(|data| data.get(key)))
}

fn response_str<'a>(response: &'a Value, key: &str) -> &'a str {
    response_field(response, key)
        .and_then(Value::as_str)
        .unwrap_or("(unknown)")
}

#[derive(Debug, Clone, Default, Args)]
pub struct ImportArgs {
    /// Payload to create [default: n8n/workflows/READY-TO-IMPORT.json]
    pub file: Option<PathBuf>,
}

/// Creates a workflow from the file contents as-is.
pub async fn import(
    args: ImportArgs,
    provider: &dyn WorkflowProvider,
    host: &WorkflowHostConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::READY_TO_IMPORT);
    let document = io::read_json(&file).await?;
    let payload = ImportPayload::from_document(&document);

    writeln!(out, "🚀 Importing workflow...")?;
    writeln!(out, "   Name: {}", payload.name)?;
    writeln!(out, "   Nodes: {}\n", payload.node_count())?;

    let created = provider.create_workflow(&document).await?;
    let id = response_str(&created, "id");
    let active = response_field(&created, "active")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    tracing::info!(target: TRACING_TARGET_COMMAND, workflow_id = id, "Workflow created");

    writeln!(out, "✅ Workflow created successfully!")?;
    writeln!(out, "   ID: {id}")?;
    writeln!(out, "   Name: {}", response_str(&created, "name"))?;
    writeln!(
        out,
        "   Status: {}",
        if active { "Active" } else { "Inactive" }
    )?;
    writeln!(out, "\n🔗 Access at: {}", host.editor_url(id))?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct UpdateArgs {
    /// Workflow to push [default: n8n/workflows/ugc-video-generation-v2-fixed.json]
    pub file: Option<PathBuf>,
    /// Target workflow id [default: the file's `id`]
    #[arg(long)]
    pub id: Option<String>,
}

/// Replaces a workflow with the projection of the file.
pub async fn update(
    args: UpdateArgs,
    provider: &dyn WorkflowProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::V2_FIXED);
    let document = io::read_json(&file).await?;

    let id = args
        .id
        .or_else(|| document.get("id").and_then(Value::as_str).map(str::to_owned))
        .ok_or_else(|| {
            Error::invalid_input()
                .with_message("workflow has no id; pass --id")
                .with_context(file.display().to_string())
        })?;

    let payload = ImportPayload::from_document(&document);
    writeln!(out, "🔄 Updating workflow...")?;
    writeln!(out, "   Workflow ID: {id}")?;
    writeln!(out, "   Nodes: {}", payload.node_count())?;

    provider.update_workflow(&id, &payload.to_value()).await?;
    writeln!(out, "\n✅ Workflow updated successfully!")?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct ActivateArgs {
    /// Workflow id on the host
    pub id: String,
    /// Workflow to push [default: n8n/workflows/READY-TO-IMPORT.json]
    pub file: Option<PathBuf>,
}

/// Pushes the file with `active` set and checks the host echoes it back.
pub async fn activate(
    args: ActivateArgs,
    provider: &dyn WorkflowProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let file = or_default(args.file, paths::READY_TO_IMPORT);
    let mut document = io::read_json(&file).await?;
    let Some(fields) = document.as_object_mut() else {
        return Err(Error::invalid_input()
            .with_message("workflow file is not a JSON object")
            .with_context(file.display().to_string())
            .into());
    };
    fields.insert("active".to_owned(), Value::Bool(true));

    let response = provider.update_workflow(&args.id, &document).await?;
    let active = response_field(&response, "active")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !active {
        return Err(Error::invalid_input()
            .with_message("workflow host did not report the workflow as active")
            .with_context(response.to_string())
            .into());
    }

    writeln!(out, "✅ Workflow activated successfully")?;
    writeln!(out, "   Workflow ID: {}", args.id)?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct WebhookInfoArgs {
    /// Workflow id on the host
    pub id: String,
}

pub async fn webhook_info(
    args: WebhookInfoArgs,
    provider: &dyn WorkflowProvider,
    host: &WorkflowHostConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let workflow = Workflow::from_value(provider.get_workflow(&args.id).await?)?;
    let webhook = workflow
        .first_node_of_type(node_type::WEBHOOK)
        .ok_or_else(|| {
            Error::not_found().with_message(format!("workflow {} has no webhook node", args.id))
        })?;

    let path = webhook.parameter_display("path");
    writeln!(out, "Webhook Configuration:")?;
    writeln!(out, "  Path: {path}")?;
    writeln!(out, "  Method: {}", webhook.parameter_display("httpMethod"))?;
    writeln!(
        out,
        "  Webhook ID: {}",
        webhook.webhook_id.as_deref().unwrap_or("(unset)")
    )?;
    writeln!(out, "\nFull webhook URL: {}", host.webhook_url(&path))?;
    Ok(())
}

#[derive(Debug, Clone, Default, Args)]
pub struct NodeArgs {
    /// Workflow id on the host
    pub id: String,
    /// Node name
    #[arg(default_value = DEFAULT_NODE_NAME)]
    pub name: String,
}

pub async fn node(
    args: NodeArgs,
    provider: &dyn WorkflowProvider,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let workflow = Workflow::from_value(provider.get_workflow(&args.id).await?)?;
    let node = workflow.node_by_name(&args.name).ok_or_else(|| {
        Error::not_found().with_message(format!("no node named \"{}\"", args.name))
    })?;

    writeln!(out, "{} Node:", node.name)?;
    print_json(out, &serde_json::to_value(node)?)
}
