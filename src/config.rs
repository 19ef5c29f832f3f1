//! Converter configuration
//!
//! Loaded from YAML; every field has a default, so an empty file (or no file
//! at all) yields the standard SoNaR setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Name and version written into each NAF header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    #[serde(default = "default_processor_name")]
    pub name: String,
    #[serde(default = "default_processor_version")]
    pub version: String,
}

impl Default for ProcessorInfo {
    fn default() -> Self {
        Self {
            name: default_processor_name(),
            version: default_processor_version(),
        }
    }
}

fn default_processor_name() -> String {
    "vua-sonar2naf".to_string()
}

fn default_processor_version() -> String {
    crate::VERSION.to_string()
}

/// Settings for a conversion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// NAF language tag
    pub language: String,
    /// Role tag that anchors a predicate
    pub trigger_label: String,
    /// Relation label marking the head terminal of a constituent
    pub head_marker: String,
    /// Separator between category and features in a fine-grained tag
    pub morph_separator: String,
    /// Coarse tags whose terms are typed `close`
    pub closed_class_pos: Vec<String>,
    /// Rename non-canonical fragment files during inventory
    pub normalize_filenames: bool,
    /// Documents converted concurrently
    pub jobs: usize,
    /// Extension of written documents
    pub output_extension: String,
    pub processor: ProcessorInfo,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            language: "nl".to_string(),
            trigger_label: "rel".to_string(),
            head_marker: "hd".to_string(),
            morph_separator: "|".to_string(),
            closed_class_pos: ["det", "pron", "prep", "vg", "conj"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            normalize_filenames: true,
            jobs: 4,
            output_extension: "naf".to_string(),
            processor: ProcessorInfo::default(),
        }
    }
}

impl ConverterConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml(yaml: &str, origin: &Path) -> ConfigResult<Self> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&yaml, path)
    }

    /// Default config location (`<config dir>/sonar2naf/config.yaml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sonar2naf").join("config.yaml"))
    }

    /// Load from `path`, else from the default location if it exists, else defaults
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(default) if default.is_file() => Self::from_file(default),
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.trigger_label.is_empty() {
            return Err(ConfigError::Invalid("trigger_label must not be empty".into()));
        }
        if self.morph_separator.is_empty() {
            return Err(ConfigError::Invalid("morph_separator must not be empty".into()));
        }
        if self.jobs == 0 {
            return Err(ConfigError::Invalid("jobs must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether a coarse tag belongs to a closed word class
    pub fn is_closed_class(&self, pos: &str) -> bool {
        self.closed_class_pos
            .iter()
            .any(|closed| closed.eq_ignore_ascii_case(pos))
    }
}
