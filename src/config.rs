//! Configuration loading via `ortho-config`.

use std::collections::HashMap;
use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Scaleway credentials and context derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "SCW")]
pub struct ScalewayConfig {
    /// Access key assigned to the Scaleway application. Not required for
    /// API calls but captured to support audit logging.
    pub access_key: Option<String>,
    /// Secret key used for authentication. This value is required.
    pub secret_key: String,
    /// Project identifier used for billing and resource scoping.
    pub default_project_id: String,
    /// Availability zone the orchestrator operates in. Defaults to
    /// `fr-par-1`; one zone context per orchestrator instance.
    #[ortho_config(default = "fr-par-1".to_owned())]
    pub default_zone: String,
}

/// A named volume template: the requested capacity plus the prefix used to
/// generate the volume's `Name` tag.
#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq, Eq)]
pub struct VolumeTemplate {
    /// Capacity in whole gigabytes.
    pub size_gb: u32,
    /// Prefix of the generated name tag (`{prefix}_{unix_millis}`).
    pub name_prefix: String,
}

/// Storage-side configuration: the template definitions available to
/// volume creation.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "VOLYA")]
pub struct StorageConfig {
    /// Volume templates keyed by template name.
    #[ortho_config(default = HashMap::new(), skip_cli)]
    pub templates: HashMap<String, VolumeTemplate>,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
    section: &'static str,
}

impl FieldMetadata {
    const fn new(
        description: &'static str,
        env_var: &'static str,
        toml_key: &'static str,
        section: &'static str,
    ) -> Self {
        Self {
            description,
            env_var,
            toml_key,
            section,
        }
    }
}

impl ScalewayConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [{}] in volya.toml",
                metadata.description, metadata.env_var, metadata.toml_key, metadata.section
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("volya")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages
    /// include guidance on how to provide missing values via environment
    /// variables or configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.secret_key,
            &FieldMetadata::new(
                "Scaleway API secret key",
                "SCW_SECRET_KEY",
                "secret_key",
                "scaleway",
            ),
        )?;
        Self::require_field(
            &self.default_project_id,
            &FieldMetadata::new(
                "Scaleway project ID",
                "SCW_DEFAULT_PROJECT_ID",
                "default_project_id",
                "scaleway",
            ),
        )?;
        Self::require_field(
            &self.default_zone,
            &FieldMetadata::new(
                "availability zone",
                "SCW_DEFAULT_ZONE",
                "default_zone",
                "scaleway",
            ),
        )?;
        Ok(())
    }
}

impl StorageConfig {
    /// Loads storage configuration without parsing CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("volya")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the template definitions: every template must carry a
    /// non-empty name prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the offending template.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, template) in &self.templates {
            if template.name_prefix.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "template '{name}' has an empty name_prefix; set templates.{name}.name_prefix \
                     in volya.toml"
                )));
            }
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
