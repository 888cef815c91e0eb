// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for wcagbot

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Document decoding and descriptor settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Downstream judgment settings
    #[serde(default)]
    pub judgment: JudgmentConfig,

    /// Unified report settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Directory scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Document decoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Encoding label to decode with; sniffed from `<meta charset>` when absent
    #[serde(default)]
    pub declared_encoding: Option<String>,

    /// Maximum characters kept in element snippets
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            declared_encoding: None,
            snippet_chars: default_snippet_chars(),
        }
    }
}

fn default_snippet_chars() -> usize {
    200
}

/// Judgment planning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentConfig {
    /// Plan per-checklist summary prompts as well
    #[serde(default)]
    pub include_summaries: bool,

    /// Label recorded as the reporter of judgment rows
    #[serde(default = "default_model_label")]
    pub model_label: String,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            include_summaries: false,
            model_label: default_model_label(),
        }
    }
}

fn default_model_label() -> String {
    "unknown".to_string()
}

/// Report row configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Value of the `browser_combination` column
    #[serde(default = "default_browser_combination")]
    pub browser_combination: String,

    /// Value of `reported_by` for rule-engine rows
    #[serde(default = "default_programmatic_reporter")]
    pub programmatic_reporter: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            browser_combination: default_browser_combination(),
            programmatic_reporter: default_programmatic_reporter(),
        }
    }
}

fn default_browser_combination() -> String {
    "N/A".to_string()
}

fn default_programmatic_reporter() -> String {
    "Programmatic".to_string()
}

/// Directory scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory names skipped while walking
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
        "vendor".to_string(),
        "dist".to_string(),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    if config.document.snippet_chars == 0 {
        return Err(AuditError::Config(
            "document.snippet_chars must be greater than zero".to_string(),
        ));
    }

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".wcagbot.toml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(&config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.document.snippet_chars, 200);
        assert!(config.document.declared_encoding.is_none());
        assert!(!config.judgment.include_summaries);
        assert_eq!(config.report.browser_combination, "N/A");
        assert!(config.scan.exclude.contains(&"node_modules".to_string()));
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
[judgment]
model_label = "gpt-4o"

[document]
declared_encoding = "windows-1252"
"#,
        )
        .unwrap();
        assert_eq!(config.judgment.model_label, "gpt-4o");
        assert_eq!(config.document.declared_encoding.as_deref(), Some("windows-1252"));
        assert_eq!(config.document.snippet_chars, 200);
        assert_eq!(config.report.programmatic_reporter, "Programmatic");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/.wcagbot.toml")).unwrap();
        assert_eq!(config.log.level, "warn");
    }
}
