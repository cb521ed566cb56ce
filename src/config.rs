//! Payload configuration files.
//!
//! A configuration names the payload tree to generate together with the
//! knobs that control how it is compiled:
//!
//! ```yaml
//! seed: 42                  # optional, absent means time-seeded
//! profile: standard         # standard | extended
//! missing_variable: error   # error | empty
//! payload:
//!   to: "addr1{{rand_string 8}}"
//!   amount: 42
//! ```

use payload_core::{RawValue, ValueError};
use payload_generator::Profile;
use payload_template::{CompileOptions, MissingVariable};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a payload configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error parsing TOML
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML payload that has no JSON-like equivalent
    #[error("Invalid payload: {0}")]
    Payload(#[from] ValueError),

    /// File extension is not one of yaml, yml, json or toml
    #[error("Unsupported config format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Everything needed to build a [`PayloadFactory`](crate::PayloadFactory).
///
/// Configurations are only parsed through [`from_file`](Self::from_file) and
/// the per-format constructors, which reject unknown top-level keys.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadConfig {
    /// Seed for the random source. Absent means seeded from the clock.
    pub seed: Option<u64>,

    /// Which builtin function names templates may call.
    pub profile: Profile,

    /// How templates treat references to absent context variables.
    pub missing_variable: MissingVariable,

    /// The payload tree. Every string in it is a template.
    pub payload: RawValue,
}

/// Same shape as [`PayloadConfig`], generic over how the payload is parsed.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Document<P> {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    profile: Profile,
    #[serde(default)]
    missing_variable: MissingVariable,
    payload: P,
}

impl Document<RawValue> {
    fn into_config(self) -> PayloadConfig {
        PayloadConfig {
            seed: self.seed,
            profile: self.profile,
            missing_variable: self.missing_variable,
            payload: self.payload,
        }
    }
}

impl PayloadConfig {
    /// Configuration with default settings around `payload`.
    pub fn new(payload: RawValue) -> Self {
        Self {
            seed: None,
            profile: Profile::default(),
            missing_variable: MissingVariable::default(),
            payload,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_missing_variable(mut self, missing_variable: MissingVariable) -> Self {
        self.missing_variable = missing_variable;
        self
    }

    /// Options handed to the template compiler.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            missing_variable: self.missing_variable,
        }
    }

    /// Load a configuration file, choosing the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            Some("toml") => Self::from_toml,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        let content = fs::read_to_string(path)?;
        parse(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Scalar mapping keys inside the payload are converted to strings.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let document: Document<serde_yaml::Value> = serde_yaml::from_str(yaml)?;
        Ok(Document {
            seed: document.seed,
            profile: document.profile,
            missing_variable: document.missing_variable,
            payload: RawValue::from_yaml(&document.payload)?,
        }
        .into_config())
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: Document<RawValue> = serde_json::from_str(json)?;
        Ok(document.into_config())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let document: Document<RawValue> = toml::from_str(content)?;
        Ok(document.into_config())
    }
}
