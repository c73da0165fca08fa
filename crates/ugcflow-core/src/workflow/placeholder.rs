//! Secret injection into template documents.
//!
//! Templates committed to version control carry literal tokens such as
//! `YOUR_KIE_AI_API_KEY` where a real credential belongs. Tokens are found
//! wherever they appear in a string, including inside embedded `jsonBody`
//! expressions and inside documents encoded as a string in a tool-output
//! envelope.
//!
//! A missing secret is a configuration error. Tokens are never replaced with
//! an empty or placeholder value.

use serde_json::Value;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::{Result, SecretKey, Secrets, TRACING_TARGET_WORKFLOW};

/// A placeholder token and the secret that replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum Placeholder {
    #[strum(serialize = "YOUR_KIE_AI_API_KEY")]
    KieAiApiKey,
    #[strum(serialize = "YOUR_OPENAI_API_KEY")]
    OpenAiApiKey,
}

impl Placeholder {
    /// Literal token as it appears in templates.
    pub fn token(self) -> &'static str {
        self.into()
    }

    /// Secret that replaces the token.
    pub fn secret(self) -> SecretKey {
        match self {
            Self::KieAiApiKey => SecretKey::KieAiApiKey,
            Self::OpenAiApiKey => SecretKey::OpenAiApiKey,
        }
    }

    /// Secrets needed to substitute every placeholder.
    pub fn required_secrets() -> Vec<SecretKey> {
        Self::iter().map(Self::secret).collect()
    }
}

/// Outcome of a substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// Text with every token replaced.
    pub text: String,
    /// Replacement count per placeholder, in declaration order.
    pub replaced: Vec<(Placeholder, usize)>,
}

impl Substitution {
    /// Total number of replacements.
    pub fn total(&self) -> usize {
        self.replaced.iter().map(|(_, count)| count).sum()
    }
}

/// Replaces every occurrence of every placeholder token in `text`.
///
/// All required secrets are checked before any replacement so the error
/// lists every missing key at once. Replacement values are escaped for use
/// inside a JSON string literal, which covers one level of nesting only;
/// templates that embed an encoded document go through
/// [`substitute_document`].
pub fn substitute(text: &str, secrets: &Secrets) -> Result<Substitution> {
    secrets.require(&Placeholder::required_secrets())?;

    let mut text = text.to_owned();
    let mut replaced = Vec::new();

    for placeholder in Placeholder::iter() {
        let value = secrets.required(placeholder.secret())?;
        let count = text.matches(placeholder.token()).count();
        if count > 0 {
            text = text.replace(placeholder.token(), &escape_json_fragment(value)?);
        }

        tracing::debug!(
            target: TRACING_TARGET_WORKFLOW,
            token = placeholder.token(),
            count,
            "Substituted placeholder"
        );
        replaced.push((placeholder, count));
    }

    Ok(Substitution { text, replaced })
}

/// Substitutes placeholders in a parsed document.
///
/// String values are edited in place, so the serializer escapes each
/// replacement. A string that itself holds a JSON document (the `text` of a
/// tool-output envelope) is parsed, substituted and re-encoded, which escapes
/// the value once per nesting level. [`Substitution::text`] is the result
/// pretty-printed.
pub fn substitute_document(document: &Value, secrets: &Secrets) -> Result<(Value, Substitution)> {
    secrets.require(&Placeholder::required_secrets())?;

    let mut counts: Vec<(Placeholder, usize)> = Placeholder::iter().map(|p| (p, 0)).collect();
    let mut value = document.clone();
    substitute_value(&mut value, secrets, &mut counts)?;

    for (placeholder, count) in &counts {
        tracing::debug!(
            target: TRACING_TARGET_WORKFLOW,
            token = placeholder.token(),
            count,
            "Substituted placeholder"
        );
    }

    let text = serde_json::to_string_pretty(&value)?;
    let substitution = Substitution {
        text,
        replaced: counts,
    };
    Ok((value, substitution))
}

fn substitute_value(
    value: &mut Value,
    secrets: &Secrets,
    counts: &mut [(Placeholder, usize)],
) -> Result<()> {
    match value {
        Value::String(text) if remaining_placeholders(text) > 0 => {
            if let Ok(mut embedded) = serde_json::from_str::<Value>(text)
                && (embedded.is_object() || embedded.is_array())
            {
                substitute_value(&mut embedded, secrets, counts)?;
                *text = serde_json::to_string(&embedded)?;
                return Ok(());
            }

            for (placeholder, count) in counts.iter_mut() {
                let occurrences = text.matches(placeholder.token()).count();
                if occurrences > 0 {
                    let secret = secrets.required(placeholder.secret())?;
                    *text = text.replace(placeholder.token(), secret);
                    *count += occurrences;
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_value(item, secrets, counts)?;
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute_value(item, secrets, counts)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Counts placeholder tokens still present in `text`.
pub fn remaining_placeholders(text: &str) -> usize {
    Placeholder::iter()
        .map(|placeholder| text.matches(placeholder.token()).count())
        .sum()
}

fn escape_json_fragment(value: &str) -> Result<String> {
    let quoted = serde_json::to_string(value)?;
    Ok(quoted[1..quoted.len() - 1].to_owned())
}
