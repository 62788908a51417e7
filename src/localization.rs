//! Locale resolution and text substitution for raw fragments
//!
//! A fragment may ship several text dictionaries. One is picked for the
//! requested language and every `{{key}}` token in the serialized fragment
//! is replaced by its translation. Substitution is global and unscoped: a
//! token is replaced wherever it appears, not only in labels. Keys are
//! literal tokens, nothing is interpolated recursively: all tokens are
//! found in one pass over the original text, so a translation that itself
//! contains a `{{token}}` is emitted as written.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{AssemblyError, AssemblyResult};
use crate::model::TextDictionary;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{([^{}]+)\}\}").unwrap());

/// Pick the dictionary for `language`.
///
/// Order: exact locale match, then a locale starting with `language`, then
/// the default (empty-locale) dictionary.
pub fn select_dictionary<'a>(
    texts: &'a [TextDictionary],
    language: &str,
) -> Option<&'a TextDictionary> {
    if !language.is_empty() {
        if let Some(exact) = texts.iter().find(|t| t.locale == language) {
            return Some(exact);
        }
        if let Some(prefixed) = texts
            .iter()
            .find(|t| !t.locale.is_empty() && t.locale.starts_with(language))
        {
            return Some(prefixed);
        }
    }
    texts.iter().find(|t| t.locale.is_empty())
}

/// Substitute translated texts into a raw fragment document.
///
/// Returns the document unchanged when it has no `texts` or no dictionary
/// matches.
pub fn localize_fragment(data: Value, language: &str) -> AssemblyResult<Value> {
    let entries = match data.get("texts") {
        Some(Value::Array(entries)) if !entries.is_empty() => entries.clone(),
        _ => return Ok(data),
    };
    let texts = serde_json::from_value::<Vec<TextDictionary>>(Value::Array(entries))
        .map_err(|e| AssemblyError::Localization {
            reason: format!("invalid texts section: {}", e),
        })?;

    let Some(dictionary) = select_dictionary(&texts, language) else {
        debug!(
            language,
            "No text dictionary matches, leaving fragment untranslated"
        );
        return Ok(data);
    };

    // Tokens are matched in serialized form, so keys are escaped the same way
    let mut replacements = HashMap::new();
    for (key, text) in &dictionary.text_dictionary {
        replacements.insert(escape_json_text(key)?, escape_json_text(text)?);
    }

    let serialized = serde_json::to_string(&data)?;
    let substituted = TOKEN_RE.replace_all(&serialized, |caps: &Captures| {
        replacements
            .get(&caps[1])
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });

    serde_json::from_str(&substituted).map_err(|e| AssemblyError::Localization {
        reason: format!("substituted fragment is no longer valid JSON: {}", e),
    })
}

/// JSON-escape `text` for splicing into an already-serialized string literal
fn escape_json_text(text: &str) -> AssemblyResult<String> {
    let quoted = serde_json::to_string(text)?;
    Ok(quoted[1..quoted.len() - 1].to_string())
}
