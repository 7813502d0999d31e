//! Command runners. Each returns data; `main` decides how to print it.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tabnorm_contract::{ContractChecker, ContractViolation};
use tabnorm_core::{NormalizationRun, Normalizer, NormalizerConfig};
use tabnorm_generate::ChatCompletionsClient;
use tabnorm_ingest::summarize_with_options;
use tabnorm_model::{ScriptDialect, TabularProfile, TargetSchema};
use tabnorm_validate::{ValidationReport, validate};
use tracing::{debug, info};

use crate::cli::{CheckArgs, NormalizeArgs, ProfileArgs, ValidateArgs};

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<NormalizerConfig> {
    let Some(path) = path else {
        return Ok(NormalizerConfig::default());
    };
    let config = NormalizerConfig::load(path)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Read a target schema from a JSON array of `column_name`/`description`
/// objects.
pub fn load_schema(path: &Path) -> Result<TargetSchema> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid schema {}", path.display()))
}

/// Configuration for `normalize`: file values with command-line overrides.
pub fn normalize_config(args: &NormalizeArgs, config_path: Option<&Path>) -> Result<NormalizerConfig> {
    let mut config = load_config(config_path)?;
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(secs) = args.generation_timeout {
        config.generation_timeout_secs = secs;
    }
    if let Some(secs) = args.execution_timeout {
        config.execution_timeout_secs = secs;
    }
    if let Some(dialect) = args.dialect {
        config.dialect = ScriptDialect::from(dialect);
    }
    if let Some(interpreter) = &args.interpreter {
        config.interpreter = Some(interpreter.clone());
    }
    if args.strict {
        config.strict_columns = true;
    }
    config
        .validate()
        .context("invalid configuration after applying command-line flags")?;
    Ok(config)
}

pub fn run_normalize(args: &NormalizeArgs, config_path: Option<&Path>) -> Result<NormalizationRun> {
    let config = normalize_config(args, config_path)?;
    let schema = load_schema(&args.schema)?;
    let client = ChatCompletionsClient::from_env(config.generation.clone())
        .context("failed to create generation client")?;
    if !client.has_api_key() {
        info!(
            env = %config.generation.api_key_env,
            "no API key in the environment; the first generation call will fail"
        );
    }
    let normalizer = Normalizer::new(&config, Arc::new(client));
    let request = config.request(&args.input, &args.output, schema);
    let run = normalizer
        .run(&request)
        .with_context(|| format!("failed to normalize {}", args.input.display()))?;
    Ok(run)
}

pub fn run_profile(args: &ProfileArgs, config_path: Option<&Path>) -> Result<TabularProfile> {
    let config = load_config(config_path)?;
    let rows = args.rows.unwrap_or(config.max_sample_rows);
    let profile = summarize_with_options(&args.input, rows, &config.read_options())
        .with_context(|| format!("failed to profile {}", args.input.display()))?;
    Ok(profile)
}

pub fn run_check(args: &CheckArgs, config_path: Option<&Path>) -> Result<Vec<ContractViolation>> {
    let mut config = load_config(config_path)?;
    if let Some(dialect) = args.dialect {
        config.dialect = ScriptDialect::from(dialect);
    }
    let text = fs::read_to_string(&args.program)
        .with_context(|| format!("failed to read program {}", args.program.display()))?;
    let checker = ContractChecker::new(config.dialect, config.contract_policy());
    let violations = checker.check(&text);
    debug!(
        dialect = %config.dialect,
        violations = violations.len(),
        "checked program"
    );
    Ok(violations)
}

pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>) -> Result<ValidationReport> {
    let config = load_config(config_path)?;
    let schema = load_schema(&args.schema)?;
    let mut options = config.validate_options();
    if args.strict {
        options.strict_columns = true;
    }
    Ok(validate(&args.output, &schema, &options))
}
