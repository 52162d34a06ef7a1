//! Decoding configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! mode = "post_label"
//! workers = 4
//! decoder = "intra_local"
//! threshold = 0.5
//! attach_model = "models/attach.json"
//!
//! [max_dist_by_label]
//! elaboration = [2, 6]
//! narration = [0, 9]
//! ```

use crate::decoding::{LastDecoder, LocalDecoder, MaxDistTable, SentenceComposer, StructuralDecoder};
use crate::error::{DecoderError, Result};
use crate::learning::{LinearClassifier, Model, Models, Team};
use crate::types::DecodingMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Which reference decoder to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecoderChoice {
    #[default]
    Local,
    Last,
    /// Local decoder, sentence by sentence then across sentences
    IntraLocal,
    /// Last decoder, sentence by sentence then across sentences
    IntraLast,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeConfig {
    #[serde(default)]
    pub mode: DecodingMode,

    /// Size of the worker pool for per-document jobs
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default)]
    pub decoder: DecoderChoice,

    /// Score a candidate must exceed to be kept by the local decoder
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Weights of the attachment model; the oracle is used when absent
    #[serde(default)]
    pub attach_model: Option<PathBuf>,

    /// Weights of the relation model; the oracle is used when absent
    #[serde(default)]
    pub relate_model: Option<PathBuf>,

    /// Enables distance pruning (single-pass decoding only)
    #[serde(default)]
    pub max_dist_by_label: Option<MaxDistTable>,
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn default_threshold() -> f64 {
    0.5
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            mode: DecodingMode::default(),
            workers: default_workers(),
            decoder: DecoderChoice::default(),
            threshold: default_threshold(),
            attach_model: None,
            relate_model: None,
            max_dist_by_label: None,
        }
    }
}

impl DecodeConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: DecodeConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file if it exists, defaults otherwise
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults: {:?}", path);
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DecoderError::Config("workers must be at least 1".into()));
        }
        if !self.threshold.is_finite() {
            return Err(DecoderError::Config("threshold must be a finite number".into()));
        }
        if let Some(table) = &self.max_dist_by_label {
            if table.is_empty() {
                return Err(DecoderError::Config(
                    "max_dist_by_label is empty; remove it to disable pruning".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn build_decoder(&self) -> StructuralDecoder {
        let local = LocalDecoder::new(self.threshold);
        match self.decoder {
            DecoderChoice::Local => StructuralDecoder::whole(local),
            DecoderChoice::Last => StructuralDecoder::whole(LastDecoder),
            DecoderChoice::IntraLocal => StructuralDecoder::intra_inter(SentenceComposer::new(local)),
            DecoderChoice::IntraLast => StructuralDecoder::intra_inter(SentenceComposer::new(LastDecoder)),
        }
    }

    pub fn build_models(&self) -> Result<Models> {
        let load = |path: &Option<PathBuf>| -> Result<Model> {
            match path {
                Some(path) => Ok(Model::Fitted(Arc::new(LinearClassifier::from_file(path)?))),
                None => Ok(Model::Oracle),
            }
        };
        Ok(Models::from(Team::new(load(&self.attach_model)?, load(&self.relate_model)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DecodeConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.workers >= 1);
    }

    #[test]
    fn test_from_toml() {
        let config = DecodeConfig::from_toml(
            r#"
            mode = "post_label"
            workers = 3
            decoder = "intra_last"

            [max_dist_by_label]
            elaboration = [2, 6]
            narration = [0, 9]
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, DecodingMode::PostLabel);
        assert_eq!(config.workers, 3);
        assert_eq!(config.threshold, 0.5);
        let table = config.max_dist_by_label.as_ref().unwrap();
        assert_eq!(table.max_left(), Some(2));
        assert_eq!(table.max_right(), Some(9));
        assert!(config.build_decoder().is_two_phase());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let result = DecodeConfig::from_toml("workers = 0");
        assert!(matches!(result, Err(DecoderError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let result = DecodeConfig::from_toml("[max_dist_by_label]");
        assert!(matches!(result, Err(DecoderError::Config(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(DecodeConfig::from_toml("mode = 12"), Err(DecoderError::Toml(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DecodeConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.decoder, DecoderChoice::Local);
    }

    #[test]
    fn test_models_default_to_oracle() {
        let models = DecodeConfig::default().build_models().unwrap();
        match models {
            Models::Uniform(team) => {
                assert!(team.attach.is_oracle());
                assert!(team.relate.is_oracle());
            }
            Models::Split(_) => panic!("expected a uniform team"),
        }
    }
}
