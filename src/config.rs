// Site preferences persisted between runs.
// Deserializes the TOML file with defaults for every field, so a missing or
// partial file never blocks startup. The language preference survives page
// reloads under the `site-lang` key, last write wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::i18n::{self, TranslationStore};

/// Root preferences file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Last explicitly selected language code
    #[serde(rename = "site-lang", default, skip_serializing_if = "Option::is_none")]
    pub site_lang: Option<String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging verbosity for the CLI
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SiteConfig {
    /// Loads preferences from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            let config: SiteConfig =
                toml::from_str(&content).context("Failed to parse preferences file")?;
            Ok(config)
        } else {
            tracing::debug!("preferences file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Saves preferences back to the TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize preferences to TOML")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write preferences file: {}", path.display()))?;
        Ok(())
    }

    /// Picks the language to boot with: the persisted preference wins, then
    /// the environment-reported language if supported, then the default.
    pub fn initial_language(&self) -> String {
        if let Some(saved) = &self.site_lang {
            if !saved.is_empty() {
                return saved.clone();
            }
        }
        let env_lang = environment_language();
        if TranslationStore::is_supported(&env_lang) {
            env_lang
        } else {
            i18n::DEFAULT_LANG.to_string()
        }
    }
}

/// Two-letter prefix of the environment-reported locale, the headless analog
/// of `navigator.language`.
fn environment_language() -> String {
    std::env::var("LC_ALL")
        .or_else(|_| std::env::var("LANG"))
        .ok()
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(2)
        .collect::<String>()
        .to_lowercase()
}
