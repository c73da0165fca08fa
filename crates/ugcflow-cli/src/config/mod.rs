//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── secrets: Secrets                # API keys, webhook secret
//! ├── secrets_file: Option<PathBuf>   # fallback KEY=value file
//! ├── workflow_host: WorkflowHostConfig # N8N_BASE_URL
//! ├── record_store: RecordStoreConfig   # SUPABASE_URL
//! ├── http: ReqwestConfig             # timeout, user agent
//! └── command: Command                # what to do
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ugcflow_core::{SecretKey, Secrets};
use ugcflow_reqwest::{RecordStoreConfig, ReqwestConfig, WorkflowHostConfig};

use crate::TRACING_TARGET_CONFIG;
use crate::commands::{Command, Session};

/// Environment variable naming an alternative `.env` file.
pub const ENV_FILE_VAR: &str = "UGCFLOW_ENV_FILE";

/// Complete CLI configuration.
#[derive(Debug, Parser)]
#[command(name = "ugcflow")]
#[command(about = "Operational tools for the UGC video workflow")]
#[command(version)]
pub struct Cli {
    /// API keys and shared secrets.
    #[clap(flatten)]
    pub secrets: Secrets,

    /// Read secrets not given as flags or environment variables from this
    /// KEY=value file
    #[arg(long, global = true, value_name = "PATH")]
    pub secrets_file: Option<PathBuf>,

    /// Workflow host location.
    #[clap(flatten)]
    pub workflow_host: WorkflowHostConfig,

    /// Tabular store location.
    #[clap(flatten)]
    pub record_store: RecordStoreConfig,

    /// HTTP client configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The file is loaded first so that clap's `env` bindings see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads the `.env` file, or the file named by [`ENV_FILE_VAR`].
    ///
    /// Variables already present in the process environment win. A missing
    /// file is not an error.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        let result = match std::env::var_os(ENV_FILE_VAR) {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };

        if let Err(err) = result
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing on stderr with environment-based filtering.
    ///
    /// Defaults to `warn` so that command output on stdout stays readable.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs configuration at debug level (no secret values).
    pub fn log(&self) {
        let missing: Vec<&'static str> = self
            .secrets
            .missing(&[
                SecretKey::N8nApiKey,
                SecretKey::KieAiApiKey,
                SecretKey::OpenAiApiKey,
                SecretKey::SupabaseServiceRoleKey,
                SecretKey::WebhookSecret,
            ])
            .into_iter()
            .map(Into::into)
            .collect();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            command = self.command.name(),
            n8n_url = %self.workflow_host.n8n_url,
            supabase_url = %self.record_store.supabase_url,
            http_timeout_secs = self.http.effective_timeout().as_secs(),
            missing_secrets = ?missing,
            secrets_file = ?self.secrets_file,
            "Configuration"
        );
    }

    /// Splits the configuration into the command and its session, filling
    /// absent secrets from `--secrets-file` when given.
    pub fn into_parts(self) -> anyhow::Result<(Command, Session)> {
        let mut secrets = self.secrets;
        if let Some(path) = &self.secrets_file {
            let from_file = Secrets::from_env_file(path)
                .with_context(|| format!("cannot load secrets from {}", path.display()))?;
            secrets.fill_from(from_file);
        }

        let session = Session::new(secrets, self.workflow_host, self.record_store, self.http);
        Ok((self.command, session))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_extract_v2() {
        let cli = Cli::try_parse_from([
            "ugcflow",
            "--n8n-url",
            "https://n8n.example.com",
            "extract-v2",
            "mcp-output.json",
        ])
        .unwrap();

        assert_eq!(cli.workflow_host.n8n_url.as_str(), "https://n8n.example.com/");
        assert_eq!(cli.command.name(), "extract-v2");
    }

    #[test]
    fn test_secrets_file_fills_absent_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "KIE_AI_API_KEY=kie-from-file").unwrap();
        writeln!(file, "OPENAI_API_KEY=sk-from-file").unwrap();

        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "ugcflow",
            "--openai-api-key",
            "sk-from-flag",
            "deploy",
            "--secrets-file",
            path,
        ])
        .unwrap();

        let (command, session) = cli.into_parts().unwrap();
        assert_eq!(command.name(), "deploy");
        assert_eq!(
            session.secrets.get(SecretKey::KieAiApiKey),
            Some("kie-from-file")
        );
        assert_eq!(
            session.secrets.get(SecretKey::OpenAiApiKey),
            Some("sk-from-flag")
        );
    }

    #[test]
    fn test_unreadable_secrets_file_fails() {
        let cli = Cli::try_parse_from([
            "ugcflow",
            "--secrets-file",
            "/nonexistent/ugcflow.env",
            "summary",
        ])
        .unwrap();

        let error = cli.into_parts().unwrap_err();
        let rendered = format!("{error:#}");
        assert!(rendered.contains("/nonexistent/ugcflow.env"));
    }
}
