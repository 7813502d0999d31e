//! Repair orchestration.
//!
//! [`Normalizer`] drives one request through a bounded loop:
//! generate a program, check it statically, execute it in the sandbox and
//! validate its output. Every failure becomes the feedback of the next
//! attempt until the output conforms or the attempt budget is spent.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabnorm_core::{Normalizer, NormalizerConfig};
//! use tabnorm_generate::ChatCompletionsClient;
//!
//! let config = NormalizerConfig::load(Path::new("tabnorm.toml"))?;
//! let client = ChatCompletionsClient::from_env(config.generation.clone())?;
//! let normalizer = Normalizer::new(&config, Arc::new(client));
//! let request = config.request("raw.csv", "clean.csv", schema);
//! let outcome = normalizer.normalize(&request)?;
//! ```

mod config;
mod error;
mod normalizer;
mod request;

pub use config::{ConfigError, NormalizerConfig};
pub use error::NormalizeError;
pub use normalizer::{NormalizationRun, Normalizer};
pub use request::{
    DEFAULT_EXECUTION_TIMEOUT, DEFAULT_GENERATION_TIMEOUT, DEFAULT_MAX_ATTEMPTS,
    NormalizationRequest,
};
