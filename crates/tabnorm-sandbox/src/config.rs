use std::path::PathBuf;

use tabnorm_model::ScriptDialect;

pub const DEFAULT_MAX_STDOUT_CHARS: usize = 500;
pub const DEFAULT_MAX_STDERR_CHARS: usize = 1000;

/// Executor settings shared by every attempt of every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxConfig {
    pub dialect: ScriptDialect,
    /// Interpreter command; `None` uses the dialect default.
    pub interpreter: Option<String>,
    /// Parent directory for scratch directories; `None` uses the system
    /// temp directory.
    pub scratch_root: Option<PathBuf>,
    pub max_stdout_chars: usize,
    pub max_stderr_chars: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::for_dialect(ScriptDialect::default())
    }
}

impl SandboxConfig {
    pub fn for_dialect(dialect: ScriptDialect) -> Self {
        Self {
            dialect,
            interpreter: None,
            scratch_root: None,
            max_stdout_chars: DEFAULT_MAX_STDOUT_CHARS,
            max_stderr_chars: DEFAULT_MAX_STDERR_CHARS,
        }
    }

    pub fn interpreter(&self) -> &str {
        self.interpreter
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| self.dialect.default_interpreter())
    }
}
