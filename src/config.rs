use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::generator::DrillSource;
use crate::session::builder::{BuildOptions, DEFAULT_DRILL_COUNT, DEFAULT_PAGE_SIZE};
use crate::session::lifecycle::RestartPolicy;
use crate::source::RecordProvider;
use crate::source::bundled::BundledProvider;
use crate::source::csv_file::CsvProvider;

pub const MAX_PAGE_SIZE: usize = 50;
pub const MAX_DRILL_COUNT: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    #[default]
    Memory,
    File,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_drill_count")]
    pub drill_count: usize,
    #[serde(default)]
    pub vocabulary_path: Option<String>,
    #[serde(default)]
    pub drill_pool_path: Option<String>,
    #[serde(default)]
    pub drill_source: DrillSource,
    #[serde(default = "default_generated_pool_size")]
    pub generated_pool_size: usize,
    #[serde(default = "default_generated_max_value")]
    pub generated_max_value: u64,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
    #[serde(default)]
    pub session_store: SessionStoreKind,
    #[serde(default = "default_session_key")]
    pub session_key: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_drill_count() -> usize {
    DEFAULT_DRILL_COUNT
}
fn default_generated_pool_size() -> usize {
    200
}
fn default_generated_max_value() -> u64 {
    1_000_000
}
fn default_session_key() -> String {
    "default".to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            drill_count: default_drill_count(),
            vocabulary_path: None,
            drill_pool_path: None,
            drill_source: DrillSource::default(),
            generated_pool_size: default_generated_pool_size(),
            generated_max_value: default_generated_max_value(),
            restart_policy: RestartPolicy::default(),
            session_store: SessionStoreKind::default(),
            session_key: default_session_key(),
            theme: default_theme(),
            language: default_language(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocab-quiz")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp numeric settings and reset names that no longer resolve.
    /// Call after deserialization and again after CLI overrides.
    pub fn validate(&mut self, valid_themes: &[&str], valid_languages: &[&str]) {
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self.drill_count = self.drill_count.min(MAX_DRILL_COUNT);
        self.generated_max_value = self.generated_max_value.max(1);
        if !valid_themes.contains(&self.theme.as_str()) {
            self.theme = default_theme();
        }
        if !valid_languages.contains(&self.language.as_str()) {
            self.language = default_language();
        }
        if self.session_key.trim().is_empty() {
            self.session_key = default_session_key();
        }
    }

    pub fn build_options(&self, seed: Option<u64>) -> BuildOptions {
        BuildOptions {
            drill_count: self.drill_count,
            page_size: self.page_size,
            seed,
        }
    }

    /// Drill pool location, defaulting to `numbers.<ext>` beside a local
    /// vocabulary file.
    fn resolved_drill_pool_path(&self, vocabulary: &str) -> Option<String> {
        if let Some(path) = &self.drill_pool_path {
            return Some(path.clone());
        }
        let vocab_path = Path::new(vocabulary);
        let ext = vocab_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("csv");
        vocab_path
            .parent()
            .map(|dir| dir.join(format!("numbers.{ext}")).display().to_string())
    }

    /// Record provider for the configured locations. With no vocabulary
    /// location the bundled sample data is used.
    pub fn provider(&self) -> Result<Box<dyn RecordProvider>> {
        let Some(vocabulary) = self.vocabulary_path.as_deref() else {
            return Ok(Box::new(BundledProvider));
        };

        if vocabulary.starts_with("http://") || vocabulary.starts_with("https://") {
            return self.remote_provider(vocabulary);
        }

        let Some(drill_pool) = self.resolved_drill_pool_path(vocabulary) else {
            bail!("cannot derive a drill pool path from {vocabulary}");
        };
        Ok(Box::new(CsvProvider::new(vocabulary, drill_pool)))
    }

    #[cfg(feature = "network")]
    fn remote_provider(&self, vocabulary: &str) -> Result<Box<dyn RecordProvider>> {
        let Some(drill_pool) = self.drill_pool_path.as_deref() else {
            bail!("drill_pool_path is required when the vocabulary is fetched over HTTP");
        };
        Ok(Box::new(crate::source::remote::RemoteProvider::new(
            vocabulary, drill_pool,
        )))
    }

    #[cfg(not(feature = "network"))]
    fn remote_provider(&self, vocabulary: &str) -> Result<Box<dyn RecordProvider>> {
        bail!("this build cannot fetch {vocabulary}: the network feature is disabled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.drill_count, 10);
        assert_eq!(config.drill_source, DrillSource::File);
        assert_eq!(config.restart_policy, RestartPolicy::FreshSeed);
        assert_eq!(config.session_store, SessionStoreKind::Memory);
        assert_eq!(config.session_key, "default");
        assert!(config.vocabulary_path.is_none());
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
page_size = 5
drill_source = "mixed"
restart_policy = "keep-seed"
session_store = "file"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.drill_source, DrillSource::Mixed);
        assert_eq!(config.restart_policy, RestartPolicy::KeepSeed);
        assert_eq!(config.session_store, SessionStoreKind::File);
        assert_eq!(config.drill_count, 10);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.vocabulary_path = Some("/tmp/vocab.tsv".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.vocabulary_path, config.vocabulary_path);
        assert_eq!(deserialized.page_size, config.page_size);
        assert_eq!(deserialized.restart_policy, config.restart_policy);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_validate_clamps_numbers() {
        let mut config = Config::default();
        config.page_size = 0;
        config.drill_count = 500;
        config.validate(&["catppuccin-mocha"], &["en"]);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.drill_count, MAX_DRILL_COUNT);

        config.page_size = 80;
        config.validate(&["catppuccin-mocha"], &["en"]);
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_validate_resets_unknown_names() {
        let mut config = Config::default();
        config.theme = "nope".to_string();
        config.language = "xx".to_string();
        config.session_key = "  ".to_string();
        config.validate(&["catppuccin-mocha", "gruvbox-dark"], &["en", "vi"]);
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.language, "en");
        assert_eq!(config.session_key, "default");

        config.theme = "gruvbox-dark".to_string();
        config.language = "vi".to_string();
        config.validate(&["catppuccin-mocha", "gruvbox-dark"], &["en", "vi"]);
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.language, "vi");
    }

    #[test]
    fn test_drill_pool_defaults_beside_vocabulary() {
        let mut config = Config::default();
        config.vocabulary_path = Some("/data/words.tsv".to_string());
        assert_eq!(
            config.resolved_drill_pool_path("/data/words.tsv").as_deref(),
            Some("/data/numbers.tsv")
        );
        config.drill_pool_path = Some("/elsewhere/n.csv".to_string());
        assert_eq!(
            config.resolved_drill_pool_path("/data/words.tsv").as_deref(),
            Some("/elsewhere/n.csv")
        );
    }

    #[test]
    fn test_provider_defaults_to_bundled() {
        let config = Config::default();
        let provider = config.provider().unwrap();
        assert!(provider.describe().starts_with("bundled"));
    }
}
