//! Normalizer configuration, loadable from TOML.
//!
//! ```toml
//! max_attempts = 5
//! dialect = "python"
//! execution_timeout_secs = 60
//!
//! [generation]
//! model = "gemini-2.5-flash"
//! api_key_env = "GEMINI_API_KEY"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabnorm_contract::{ContractPolicy, DEFAULT_MAX_PROGRAM_BYTES};
use tabnorm_generate::GenerationSettings;
use tabnorm_ingest::{MAX_CSV_FILE_SIZE, ReadOptions};
use tabnorm_model::{ScriptDialect, TargetSchema};
use tabnorm_sandbox::{DEFAULT_MAX_STDERR_CHARS, DEFAULT_MAX_STDOUT_CHARS, SandboxConfig};
use tabnorm_validate::ValidateOptions;
use thiserror::Error;

use crate::request::{
    DEFAULT_EXECUTION_TIMEOUT, DEFAULT_GENERATION_TIMEOUT, DEFAULT_MAX_ATTEMPTS,
    NormalizationRequest,
};

/// Errors loading or checking a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Settings shared by every request a [`Normalizer`](crate::Normalizer)
/// serves. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    pub max_attempts: u32,
    pub generation_timeout_secs: u64,
    pub execution_timeout_secs: u64,
    /// Sample rows embedded in prompts.
    pub max_sample_rows: usize,
    pub dialect: ScriptDialect,
    /// Interpreter override; defaults to the dialect's interpreter.
    pub interpreter: Option<String>,
    pub max_program_bytes: usize,
    /// Tokens forbidden in addition to the built-in denylist.
    pub extra_denylist: Vec<String>,
    pub max_stdout_chars: usize,
    pub max_stderr_chars: usize,
    /// Reject output columns the schema does not name.
    pub strict_columns: bool,
    /// Parent of per-attempt scratch directories.
    pub scratch_root: Option<PathBuf>,
    pub max_input_bytes: u64,
    pub generation: GenerationSettings,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT.as_secs(),
            execution_timeout_secs: DEFAULT_EXECUTION_TIMEOUT.as_secs(),
            max_sample_rows: tabnorm_ingest::DEFAULT_SAMPLE_ROWS,
            dialect: ScriptDialect::default(),
            interpreter: None,
            max_program_bytes: DEFAULT_MAX_PROGRAM_BYTES,
            extra_denylist: Vec::new(),
            max_stdout_chars: DEFAULT_MAX_STDOUT_CHARS,
            max_stderr_chars: DEFAULT_MAX_STDERR_CHARS,
            strict_columns: false,
            scratch_root: None,
            max_input_bytes: MAX_CSV_FILE_SIZE,
            generation: GenerationSettings::default(),
        }
    }
}

impl NormalizerConfig {
    /// Load and check a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_attempts", u64::from(self.max_attempts)),
            ("generation_timeout_secs", self.generation_timeout_secs),
            ("execution_timeout_secs", self.execution_timeout_secs),
            ("max_sample_rows", self.max_sample_rows as u64),
            ("max_program_bytes", self.max_program_bytes as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: "must be at least 1".to_string(),
                });
            }
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ConfigError::Invalid {
                field: "generation.temperature",
                message: format!("{} is outside 0.0..=2.0", self.generation.temperature),
            });
        }
        Ok(())
    }

    /// A request using this configuration's attempt budget and timeouts.
    pub fn request(
        &self,
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        schema: TargetSchema,
    ) -> NormalizationRequest {
        NormalizationRequest::new(input_path, output_path, schema)
            .with_max_attempts(self.max_attempts)
            .with_generation_timeout(Duration::from_secs(self.generation_timeout_secs))
            .with_execution_timeout(Duration::from_secs(self.execution_timeout_secs))
    }

    pub fn contract_policy(&self) -> ContractPolicy {
        ContractPolicy::for_dialect(self.dialect)
            .with_max_bytes(self.max_program_bytes)
            .with_extra_tokens(self.extra_denylist.iter().cloned())
    }

    pub fn sandbox_config(&self) -> SandboxConfig {
        SandboxConfig {
            dialect: self.dialect,
            interpreter: self.interpreter.clone(),
            scratch_root: self.scratch_root.clone(),
            max_stdout_chars: self.max_stdout_chars,
            max_stderr_chars: self.max_stderr_chars,
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            max_file_size: self.max_input_bytes,
            ..ReadOptions::default()
        }
    }

    pub fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            strict_columns: self.strict_columns,
            read: self.read_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: NormalizerConfig = toml::from_str(
            r#"
max_attempts = 3
dialect = "shell"

[generation]
model = "gemini-2.5-pro"
"#,
        )
        .unwrap();

        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.dialect, ScriptDialect::Shell);
        assert_eq!(config.execution_timeout_secs, 60);
        assert_eq!(config.max_stderr_chars, 1000);
        assert_eq!(config.generation.model, "gemini-2.5-pro");
        assert_eq!(config.generation.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<NormalizerConfig, _> = toml::from_str("max_attempt = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn zero_attempts_are_invalid() {
        let config = NormalizerConfig {
            max_attempts: 0,
            ..NormalizerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "max_attempts",
                ..
            })
        ));
    }

    #[test]
    fn extra_denylist_reaches_the_policy() {
        let config = NormalizerConfig {
            extra_denylist: vec!["boto3".to_string()],
            max_program_bytes: 1234,
            ..NormalizerConfig::default()
        };
        let policy = config.contract_policy();
        assert_eq!(policy.max_bytes, 1234);
        assert!(policy.denylist.iter().any(|rule| rule.token == "boto3"));
    }
}
