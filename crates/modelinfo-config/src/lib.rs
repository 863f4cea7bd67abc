//! Configuration for modelinfo processes.
//!
//! Settings are read once at startup from a TOML file; the
//! `MODELINFO_SERIAL_FORM` environment variable may then override the
//! serial form. The result is turned into an explicit
//! [`RecordCodec`] that callers pass around.

use modelinfo_core::codec::{DEFAULT_MAX_RECORD_BYTES, RecordCodec, SerialForm};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error as ThisError;
use tracing::debug;

/// Environment variable overriding the configured serial form.
///
/// Read with the historical property semantics: `1.0` or `legacy`
/// selects the legacy layout, any other value the current one.
pub const SERIAL_FORM_ENV: &str = "MODELINFO_SERIAL_FORM";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "modelinfo.toml";

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

///
/// ModelInfoConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelInfoConfig {
    /// Persisted layout settings.
    #[serde(default)]
    pub serial: SerialConfig,
}

///
/// SerialConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SerialConfig {
    /// Layout written by the record codec.
    #[serde(default)]
    pub form: SerialForm,

    /// Largest persisted record accepted on decode.
    #[serde(default = "default_max_record_bytes")]
    pub max_record_bytes: usize,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            form: SerialForm::default(),
            max_record_bytes: default_max_record_bytes(),
        }
    }
}

const fn default_max_record_bytes() -> usize {
    DEFAULT_MAX_RECORD_BYTES
}

impl ModelInfoConfig {
    /// Load configuration for this process.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is used when present and defaults otherwise. The environment
    /// override is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        let env_form = std::env::var(SERIAL_FORM_ENV).ok();

        Ok(config.with_serial_form_override(env_form.as_deref()))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded config file");

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;

        Ok(config)
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply a serial-form override read with property semantics.
    #[must_use]
    pub fn with_serial_form_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            let form = SerialForm::from_property(Some(value));
            debug!(%form, "serial form overridden from environment");
            self.serial.form = form;
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.max_record_bytes == 0 {
            return Err(ConfigError::Validation(
                "serial.max_record_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Build the record codec these settings describe.
    #[must_use]
    pub const fn codec(&self) -> RecordCodec {
        RecordCodec::new(self.serial.form).with_max_bytes(self.serial.max_record_bytes)
    }
}
