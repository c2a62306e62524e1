/// Engine configuration, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Tunables for prompt generation. Every field has a default, so a config
/// file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding `<category>.json` vocabulary files.
    pub vocabulary_dir: Option<PathBuf>,
    /// (min, max) number of lighting entries drawn on `random`.
    pub lighting_count: (usize, usize),
    /// Range of the emphasis weight attached to a photo type.
    pub photo_weight: (f64, f64),
    /// Display width for values in the usage report.
    pub report_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vocabulary_dir: None,
            lighting_count: (2, 4),
            photo_weight: (1.1, 1.5),
            report_width: 60,
        }
    }
}

impl EngineConfig {
    pub fn load_from_ron(path: &Path) -> Result<EngineConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<EngineConfig, ConfigError> {
        Ok(ron::from_str(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.lighting_count, (2, 4));
        assert_eq!(config.photo_weight, (1.1, 1.5));
        assert_eq!(config.report_width, 60);
        assert!(config.vocabulary_dir.is_none());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = EngineConfig::parse_ron("(report_width: 40)").unwrap();
        assert_eq!(config.report_width, 40);
        assert_eq!(config.lighting_count, (2, 4));
    }

    #[test]
    fn full_ron() {
        let config = EngineConfig::parse_ron(
            r#"(
                vocabulary_dir: Some("data"),
                lighting_count: (1, 3),
                photo_weight: (1.0, 1.2),
                report_width: 80,
            )"#,
        )
        .unwrap();
        assert_eq!(config.vocabulary_dir, Some(PathBuf::from("data")));
        assert_eq!(config.lighting_count, (1, 3));
    }

    #[test]
    fn malformed_ron_is_error() {
        assert!(EngineConfig::parse_ron("(report_width: \"wide\")").is_err());
    }

    #[test]
    fn load_fixture() {
        let config = EngineConfig::load_from_ron(Path::new("tests/fixtures/config.ron")).unwrap();
        assert_eq!(
            config.vocabulary_dir,
            Some(PathBuf::from("tests/fixtures/vocabulary"))
        );
    }
}
