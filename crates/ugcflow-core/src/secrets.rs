//! Secrets consumed by the operational commands.
//!
//! Secrets are read once at process start into a [`Secrets`] value which is
//! then handed to every collaborator. Nothing else in the workspace reads the
//! process environment.
//!
//! The recognised keys are:
//!
//! | Key                         | Used for                                   |
//! |-----------------------------|--------------------------------------------|
//! | `N8N_API_KEY`               | workflow host REST API                     |
//! | `KIE_AI_API_KEY`            | image/video generation provider            |
//! | `OPENAI_API_KEY`            | language-model provider                    |
//! | `SUPABASE_SERVICE_ROLE_KEY` | tabular store REST API                     |
//! | `N8N_WEBHOOK_SECRET`        | inbound webhook authentication             |

use std::fmt;
use std::path::Path;

#[cfg(feature = "config")]
use clap::Args;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{Error, Result, TRACING_TARGET_SECRETS};

/// Name of a recognised secret, rendered as its environment variable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum SecretKey {
    #[strum(serialize = "N8N_API_KEY")]
    N8nApiKey,
    #[strum(serialize = "KIE_AI_API_KEY")]
    KieAiApiKey,
    #[strum(serialize = "OPENAI_API_KEY")]
    OpenAiApiKey,
    #[strum(serialize = "SUPABASE_SERVICE_ROLE_KEY")]
    SupabaseServiceRoleKey,
    #[strum(serialize = "N8N_WEBHOOK_SECRET")]
    WebhookSecret,
}

/// Secret values loaded from the environment file.
///
/// Empty values are treated the same as absent ones.
#[derive(Clone, Default)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct Secrets {
    /// API key for the workflow host
    #[cfg_attr(
        feature = "config",
        arg(long = "n8n-api-key", env = "N8N_API_KEY", hide_env_values = true)
    )]
    pub n8n_api_key: Option<String>,

    /// API key for the image/video generation provider
    #[cfg_attr(
        feature = "config",
        arg(long = "kie-ai-api-key", env = "KIE_AI_API_KEY", hide_env_values = true)
    )]
    pub kie_ai_api_key: Option<String>,

    /// API key for the language-model provider
    #[cfg_attr(
        feature = "config",
        arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)
    )]
    pub openai_api_key: Option<String>,

    /// Service-role key for the tabular store
    #[cfg_attr(
        feature = "config",
        arg(
            long = "supabase-service-role-key",
            env = "SUPABASE_SERVICE_ROLE_KEY",
            hide_env_values = true
        )
    )]
    pub supabase_service_role_key: Option<String>,

    /// Shared secret sent to the inbound webhook
    #[cfg_attr(
        feature = "config",
        arg(long = "webhook-secret", env = "N8N_WEBHOOK_SECRET", hide_env_values = true)
    )]
    pub webhook_secret: Option<String>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Secrets");
        for key in SecretKey::iter() {
            let state = if self.get(key).is_some() { "set" } else { "unset" };
            debug.field(key.as_ref(), &state);
        }
        debug.finish()
    }
}

impl Secrets {
    /// Loads secrets from a `KEY=value` environment file without touching the
    /// process environment. Unrecognised keys are ignored.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            Error::configuration()
                .with_message(format!("failed to read {}", path.display()))
                .with_source(e)
        })?;

        let mut secrets = Self::default();
        for entry in entries {
            let (name, value) = entry.map_err(|e| {
                Error::configuration()
                    .with_message(format!("malformed line in {}", path.display()))
                    .with_source(e)
            })?;

            if let Ok(key) = name.parse::<SecretKey>() {
                secrets.set(key, value);
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_SECRETS,
            path = %path.display(),
            secrets = ?secrets,
            "Loaded environment file"
        );

        Ok(secrets)
    }

    /// Fills every absent secret from `other`; values already set are kept.
    pub fn fill_from(&mut self, other: Secrets) {
        for key in SecretKey::iter() {
            if self.get(key).is_none()
                && let Some(value) = other.get(key)
            {
                self.set(key, value.to_owned());
            }
        }
    }

    /// Returns a copy with the given secret set.
    #[must_use]
    pub fn with(mut self, key: SecretKey, value: impl Into<String>) -> Self {
        self.set(key, value.into());
        self
    }

    /// Sets a secret value.
    pub fn set(&mut self, key: SecretKey, value: String) {
        *self.slot_mut(key) = Some(value);
    }

    /// Returns the secret value, or `None` when absent or empty.
    pub fn get(&self, key: SecretKey) -> Option<&str> {
        let slot = match key {
            SecretKey::N8nApiKey => &self.n8n_api_key,
            SecretKey::KieAiApiKey => &self.kie_ai_api_key,
            SecretKey::OpenAiApiKey => &self.openai_api_key,
            SecretKey::SupabaseServiceRoleKey => &self.supabase_service_role_key,
            SecretKey::WebhookSecret => &self.webhook_secret,
        };

        slot.as_deref().filter(|value| !value.is_empty())
    }

    /// Returns the secret value or a configuration error naming it.
    pub fn required(&self, key: SecretKey) -> Result<&str> {
        self.get(key).ok_or_else(|| missing_error(&[key]))
    }

    /// Returns the subset of `keys` that are absent, in the given order.
    pub fn missing(&self, keys: &[SecretKey]) -> Vec<SecretKey> {
        keys.iter()
            .copied()
            .filter(|key| self.get(*key).is_none())
            .collect()
    }

    /// Fails with a configuration error listing every absent key.
    pub fn require(&self, keys: &[SecretKey]) -> Result<()> {
        let missing = self.missing(keys);
        if missing.is_empty() {
            return Ok(());
        }

        Err(missing_error(&missing))
    }

    fn slot_mut(&mut self, key: SecretKey) -> &mut Option<String> {
        match key {
            SecretKey::N8nApiKey => &mut self.n8n_api_key,
            SecretKey::KieAiApiKey => &mut self.kie_ai_api_key,
            SecretKey::OpenAiApiKey => &mut self.openai_api_key,
            SecretKey::SupabaseServiceRoleKey => &mut self.supabase_service_role_key,
            SecretKey::WebhookSecret => &mut self.webhook_secret,
        }
    }
}

fn missing_error(keys: &[SecretKey]) -> Error {
    let listing = keys
        .iter()
        .map(|key| format!("   - {key}"))
        .collect::<Vec<_>>()
        .join("\n");

    Error::configuration()
        .with_message(format!(
            "missing required environment variables:\n{listing}\nPlease check your .env file."
        ))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_key_names() {
        assert_eq!(SecretKey::KieAiApiKey.to_string(), "KIE_AI_API_KEY");
        assert_eq!(
            "SUPABASE_SERVICE_ROLE_KEY".parse::<SecretKey>().unwrap(),
            SecretKey::SupabaseServiceRoleKey
        );
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let secrets = Secrets::default().with(SecretKey::OpenAiApiKey, "");
        assert_eq!(secrets.get(SecretKey::OpenAiApiKey), None);
    }

    #[test]
    fn test_require_lists_all_missing() {
        let secrets = Secrets::default().with(SecretKey::OpenAiApiKey, "sk-test");
        let keys = [SecretKey::KieAiApiKey, SecretKey::OpenAiApiKey, SecretKey::N8nApiKey];

        assert_eq!(
            secrets.missing(&keys),
            vec![SecretKey::KieAiApiKey, SecretKey::N8nApiKey]
        );

        let error = secrets.require(&keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        let message = error.message.unwrap();
        assert!(message.contains("KIE_AI_API_KEY"));
        assert!(message.contains("N8N_API_KEY"));
        assert!(!message.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_from_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# deployment secrets").unwrap();
        writeln!(file, "KIE_AI_API_KEY=kie-123").unwrap();
        writeln!(file, "OPENAI_API_KEY=\"sk-456\"").unwrap();
        writeln!(file, "UNRELATED=value").unwrap();

        let secrets = Secrets::from_env_file(file.path()).unwrap();
        assert_eq!(secrets.get(SecretKey::KieAiApiKey), Some("kie-123"));
        assert_eq!(secrets.get(SecretKey::OpenAiApiKey), Some("sk-456"));
        assert_eq!(secrets.get(SecretKey::N8nApiKey), None);
    }

    #[test]
    fn test_fill_from_keeps_existing_values() {
        let mut secrets = Secrets::default()
            .with(SecretKey::KieAiApiKey, "from-flag")
            .with(SecretKey::OpenAiApiKey, "");
        let file = Secrets::default()
            .with(SecretKey::KieAiApiKey, "from-file")
            .with(SecretKey::OpenAiApiKey, "sk-file");

        secrets.fill_from(file);
        assert_eq!(secrets.get(SecretKey::KieAiApiKey), Some("from-flag"));
        assert_eq!(secrets.get(SecretKey::OpenAiApiKey), Some("sk-file"));
        assert_eq!(secrets.get(SecretKey::N8nApiKey), None);
    }

    #[test]
    fn test_missing_env_file_is_configuration_error() {
        let error = Secrets::from_env_file("/nonexistent/.env").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_debug_redacts_values() {
        let secrets = Secrets::default().with(SecretKey::N8nApiKey, "super-secret");
        let debug = format!("{secrets:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("N8N_API_KEY"));
    }
}
