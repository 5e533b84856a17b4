//! Pipeline configuration loaded from TOML
//!
//! ```toml
//! [cache]
//! distributed_url = "redis://127.0.0.1:6379"
//! timeout_ms = 250
//! analysis_ttl_minutes = 120
//!
//! [source]
//! timeout_secs = 30
//!
//! [forms]
//! default_layout = "grouped"
//! max_authors = 5
//!
//! [calculations]
//! defense_deadline_days = 30
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use extraction_engine::CalculationConfig;
use form_engine::GeneratorConfig;
use result_cache::CacheConfig;
use shared_types::FormLayout;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub forms: FormSettings,
    #[serde(default)]
    pub calculations: CalculationConfig,
}

impl PipelineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse pipeline configuration")
    }
}

/// Backend selection plus per-payload TTLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(flatten)]
    pub backend: CacheConfig,
    #[serde(default = "default_analysis_ttl")]
    pub analysis_ttl_minutes: u64,
    #[serde(default = "default_template_ttl")]
    pub template_ttl_minutes: u64,
    #[serde(default = "default_quick_scan_ttl")]
    pub quick_scan_ttl_minutes: u64,
}

fn default_analysis_ttl() -> u64 {
    120
}

fn default_template_ttl() -> u64 {
    240
}

fn default_quick_scan_ttl() -> u64 {
    30
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheConfig::default(),
            analysis_ttl_minutes: default_analysis_ttl(),
            template_ttl_minutes: default_template_ttl(),
            quick_scan_ttl_minutes: default_quick_scan_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Upper bound on a single document fetch
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Upper bound on one extraction pass
    #[serde(default = "default_analysis_timeout")]
    pub analysis_timeout_ms: u64,
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_analysis_timeout() -> u64 {
    10_000
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            analysis_timeout_ms: default_analysis_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    #[serde(default)]
    pub default_layout: FormLayout,
    #[serde(default = "default_theme")]
    pub default_theme: String,
    #[serde(flatten)]
    pub generator: GeneratorConfig,
}

fn default_theme() -> String {
    "default".to_string()
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            default_layout: FormLayout::default(),
            default_theme: default_theme(),
            generator: GeneratorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = PipelineConfig::from_str("").unwrap();
        assert_eq!(config.cache.analysis_ttl_minutes, 120);
        assert_eq!(config.cache.template_ttl_minutes, 240);
        assert_eq!(config.cache.quick_scan_ttl_minutes, 30);
        assert_eq!(config.cache.backend.timeout_ms, 250);
        assert!(config.cache.backend.distributed_url.is_none());
        assert_eq!(config.forms.generator.wizard_page_size, 4);
        assert_eq!(config.calculations.defense_deadline_days, 30);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [cache]
            distributed_url = "redis://cache:6379"
            timeout_ms = 100
            template_ttl_minutes = 60

            [source]
            timeout_secs = 5

            [forms]
            default_layout = "wizard"
            default_theme = "compact"
            wizard_page_size = 6
            max_authors = 2

            [calculations]
            defense_deadline_days = 15
            currency_singular = "dollar"
            currency_plural = "dollars"
        "#;
        let config = PipelineConfig::from_str(toml).unwrap();
        assert_eq!(config.cache.backend.distributed_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.cache.backend.timeout_ms, 100);
        assert_eq!(config.cache.template_ttl_minutes, 60);
        assert_eq!(config.cache.analysis_ttl_minutes, 120);
        assert_eq!(config.source.timeout_secs, 5);
        assert_eq!(config.forms.default_layout, FormLayout::Wizard);
        assert_eq!(config.forms.generator.wizard_page_size, 6);
        assert_eq!(config.forms.generator.max_authors, 2);
        assert_eq!(config.forms.generator.max_authorities, 3);
        assert_eq!(config.calculations.defense_deadline_days, 15);
        assert_eq!(config.calculations.currency_plural, "dollars");
        assert_eq!(config.calculations.cents_plural, "centavos");
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        let err = PipelineConfig::from_str("[forms]\ndefault_layout = \"carousel\"\n").unwrap_err();
        assert!(format!("{:#}", err).contains("carousel"));
    }
}
