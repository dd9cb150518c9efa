//! TOML configuration: layout geometry, extractor choice and rule tables.
//!
//! Every field is optional. Omitted rule tables fall back to the built-in
//! tables; a table given in the file replaces the built-in one entirely.

use crate::domain::{builtin_denylist, builtin_entities, builtin_labels, EntityEntry, LabelEntry};
use crate::error::{ModelError, ModelResult};
use crate::redaction::ExtractorKind;
use crate::render::{BlankLines, PageGeometry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorKind,

    #[serde(default = "default_pdftotext")]
    pub pdftotext_binary: PathBuf,

    pub layout: LayoutConfig,

    pub rules: RulesConfig,
}

/// Page geometry plus blank-line handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    #[serde(flatten)]
    pub geometry: PageGeometry,

    /// Drop blank source lines without advancing the cursor
    pub skip_blank_lines: bool,
}

impl LayoutConfig {
    pub fn blank_lines(&self) -> BlankLines {
        if self.skip_blank_lines {
            BlankLines::Skip
        } else {
            BlankLines::Advance
        }
    }
}

/// Ordered rule tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "builtin_entities")]
    pub entities: Vec<EntityEntry>,

    #[serde(default = "builtin_labels")]
    pub labels: Vec<LabelEntry>,

    #[serde(default = "builtin_denylist")]
    pub denylist: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            entities: builtin_entities(),
            labels: builtin_labels(),
            denylist: builtin_denylist(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: ExtractorKind::default(),
            pdftotext_binary: default_pdftotext(),
            layout: LayoutConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

fn default_pdftotext() -> PathBuf {
    PathBuf::from("pdftotext")
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            ModelError::Config { reason, .. } => ModelError::Config {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub fn from_toml(text: &str) -> ModelResult<Self> {
        let config: Config = toml::from_str(text).map_err(|e| ModelError::Config {
            path: PathBuf::from("<inline>"),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the layout; rule patterns are checked when compiled.
    pub fn validate(&self) -> ModelResult<()> {
        self.layout.geometry.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LabelScope;

    #[test]
    fn test_empty_config_uses_builtins() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.extractor, ExtractorKind::Pdftotext);
        assert_eq!(config.pdftotext_binary, PathBuf::from("pdftotext"));
        assert_eq!(config.layout.geometry, PageGeometry::default());
        assert_eq!(config.rules, RulesConfig::default());
        assert_eq!(config.layout.blank_lines(), BlankLines::Advance);
    }

    #[test]
    fn test_partial_layout_and_tables() {
        let config = Config::from_toml(
            r#"
extractor = "pdf-extract"

[layout]
line_height = 12.0
skip_blank_lines = true

[rules]
denylist = ["fulano"]

[[rules.labels]]
name = "autor"
pattern = '\bautor:'
template = "Autor: AAAAA"
scope = "clause"
"#,
        )
        .unwrap();

        assert_eq!(config.extractor, ExtractorKind::PdfExtract);
        assert_eq!(config.layout.geometry.line_height, 12.0);
        assert_eq!(config.layout.geometry.top_margin, 36.0);
        assert_eq!(config.layout.blank_lines(), BlankLines::Skip);
        assert_eq!(config.rules.denylist, vec!["fulano"]);
        assert_eq!(config.rules.labels.len(), 1);
        assert_eq!(config.rules.labels[0].scope, LabelScope::Clause);
        assert_eq!(config.rules.entities, builtin_entities());
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let err = Config::from_toml("[layout]\nmax_chars = 0\n").unwrap_err();
        assert!(matches!(err, ModelError::InvalidInput { .. }));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let err = Config::from_toml("extractor = ").unwrap_err();
        assert!(matches!(err, ModelError::Config { .. }));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "extractor = \"ocr\"").unwrap();
        match Config::load(&path).unwrap_err() {
            ModelError::Config { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {}", other),
        }
    }
}
