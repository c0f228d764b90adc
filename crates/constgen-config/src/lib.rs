//! `constgen.toml` model, loading and validation.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// Config file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "constgen.toml";

/// Spaces per indentation level in generated files.
pub const DEFAULT_INDENT: usize = 4;

/// Upper bound for the configurable indentation width.
pub const MAX_INDENT: usize = 8;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{origin}'")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// ConstgenConfig
///

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstgenConfig {
    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default, rename = "artifact")]
    pub artifacts: Vec<ArtifactConfig>,
}

impl ConstgenConfig {
    /// Parse and validate a config held in memory. Registry paths are left
    /// as written.
    pub fn from_toml_str(source: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|source| ConfigError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Load a config file; relative registry paths are resolved against the
    /// directory holding the file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source, &path.display().to_string())?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for artifact in &mut config.artifacts {
            if artifact.registry.is_relative() {
                artifact.registry = base.join(&artifact.registry);
            }
        }

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.artifacts.is_empty() {
            return Err(ConfigError::Invalid(
                "no [[artifact]] tables configured".to_string(),
            ));
        }
        if !(1..=MAX_INDENT).contains(&self.render.indent) {
            return Err(ConfigError::Invalid(format!(
                "render.indent must be between 1 and {MAX_INDENT}, got {}",
                self.render.indent
            )));
        }

        for (i, artifact) in self.artifacts.iter().enumerate() {
            artifact
                .validate()
                .map_err(|msg| ConfigError::Invalid(format!("artifact #{i}: {msg}")))?;
        }

        Ok(())
    }
}

///
/// RenderConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

const fn default_indent() -> usize {
    DEFAULT_INDENT
}

///
/// ArtifactConfig
///
/// One generated file: where it goes, what it is called, how each constant
/// is typed and built, and which registry drives it.
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    /// `::`-separated module path below the output root; empty for the root.
    #[serde(default)]
    pub namespace: String,

    pub name: String,
    pub element_type: String,
    pub constructor: String,
    pub registry: PathBuf,

    #[serde(default)]
    pub docs: String,

    #[serde(default)]
    pub values_docs: String,

    /// Qualified ids deliberately left out of the artifact.
    #[serde(default)]
    pub skip: Vec<String>,
}

impl ArtifactConfig {
    fn validate(&self) -> Result<(), String> {
        let required = [
            ("name", &self.name),
            ("element_type", &self.element_type),
            ("constructor", &self.constructor),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(format!("'{key}' is empty"));
            }
        }
        if self.registry.as_os_str().is_empty() {
            return Err("'registry' is empty".to_string());
        }

        Ok(())
    }
}
