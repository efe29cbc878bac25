// Translation store for the site.
// Loads a JSON tree of nested messages per language code and resolves
// dot-delimited keys. A load failure of any kind falls back to a minimal
// embedded mapping so the page always has a brand label and footer note.

use std::path::Path;

use serde_json::Value;

/// Minimal mapping used when the translation resource cannot be loaded.
const FALLBACK_JSON: &str = include_str!("../langs/fallback.json");

/// The two-letter language codes the site ships translations for.
pub const SUPPORTED_LANGS: &[&str] = &["en", "it"];

/// Default language when nothing is persisted and the environment language is
/// unsupported.
pub const DEFAULT_LANG: &str = "en";

/// Nested message trees, one per language code. Built once at startup and
/// immutable afterwards.
pub struct TranslationStore {
    langs: Value,
}

impl TranslationStore {
    /// Loads the translation resource from `path`. Missing file, read error
    /// or malformed JSON all degrade to the embedded fallback mapping; the
    /// failure is logged, never surfaced.
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(langs) if langs.is_object() => Self { langs },
                Ok(_) => {
                    tracing::warn!(
                        "translation resource {} is not an object, using fallback",
                        path.display()
                    );
                    Self::fallback()
                }
                Err(e) => {
                    tracing::warn!(
                        "translation parse error in {}: {}, using fallback",
                        path.display(),
                        e
                    );
                    Self::fallback()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "translation load error for {}: {}, using fallback",
                    path.display(),
                    e
                );
                Self::fallback()
            }
        }
    }

    /// Builds a store from an already-parsed tree. Used by tests and by the
    /// fallback path.
    pub fn from_value(langs: Value) -> Self {
        Self { langs }
    }

    /// The embedded brand-and-footer mapping.
    pub fn fallback() -> Self {
        let langs = serde_json::from_str(FALLBACK_JSON).unwrap_or(Value::Null);
        Self { langs }
    }

    /// Whether `lang` is one of the shipped languages.
    pub fn is_supported(lang: &str) -> bool {
        SUPPORTED_LANGS.contains(&lang)
    }

    /// Resolves a dotted key in the tree for `lang`, one segment at a time.
    /// Returns the empty string when the language or key is empty, the
    /// language tree is absent, any segment is missing, or the final value is
    /// not a string. Never panics.
    pub fn resolve(&self, lang: &str, dotted_key: &str) -> String {
        if lang.is_empty() || dotted_key.is_empty() {
            return String::new();
        }
        let mut current = match self.langs.get(lang) {
            Some(tree) => tree,
            None => return String::new(),
        };
        for segment in dotted_key.split('.') {
            current = match current.get(segment) {
                Some(next) => next,
                None => return String::new(),
            };
        }
        match current {
            Value::String(s) => s.clone(),
            _ => String::new(),
        }
    }

    /// Resolves a key, falling back to the key text itself when resolution is
    /// empty. Lets markup authors supply either a translation key or a
    /// literal value in the same attribute.
    pub fn resolve_or_literal(&self, lang: &str, key: &str) -> String {
        let resolved = self.resolve(lang, key);
        if resolved.is_empty() {
            key.to_string()
        } else {
            resolved
        }
    }
}
