use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tempfile::{Builder, TempDir};
use tracing::{debug, trace, warn};

use crate::config::SandboxConfig;
use crate::error::{Result, SandboxError};
use crate::process;
use crate::report::{ExecutionReport, truncate_chars};

const SCRATCH_PREFIX: &str = "tabnorm-attempt-";

/// Host variables passed through to the child. Everything else, API keys
/// included, is dropped.
const INHERITED_ENV: &[&str] = &["PATH", "LANG", "LC_ALL", "SYSTEMROOT"];

/// Runs generated programs out of process.
///
/// A `Sandbox` holds only configuration, so one instance can serve any
/// number of concurrent executions.
#[derive(Debug, Clone, Default)]
pub struct Sandbox {
    config: SandboxConfig,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Run `program` against `input_path`, expecting it to write `output_path`.
    ///
    /// Returns `Err` only when the program could not be started. Non-zero
    /// exits and timeouts are reported in the [`ExecutionReport`].
    pub fn execute(
        &self,
        program: &str,
        input_path: &Path,
        output_path: &Path,
        timeout: Duration,
    ) -> Result<ExecutionReport> {
        let input = resolve(input_path)?;
        let output = resolve(output_path)?;

        let scratch = self.scratch_dir()?;
        let scratch_dir = scratch.path().to_path_buf();
        let script = scratch_dir.join(self.config.dialect.script_file_name());
        fs::write(&script, program).map_err(|source| SandboxError::WriteProgram {
            path: script.clone(),
            source,
        })?;

        let interpreter = self.config.interpreter().to_string();
        debug!(
            interpreter = %interpreter,
            scratch = %scratch_dir.display(),
            timeout_ms = timeout.as_millis() as u64,
            "executing program"
        );
        trace!(program = %program, "program text");

        let mut command = Command::new(&interpreter);
        command
            .arg(&script)
            .arg(&input)
            .arg(&output)
            .current_dir(&scratch_dir)
            .env_clear()
            .env("HOME", &scratch_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for key in INHERITED_ENV {
            if let Some(value) = std::env::var_os(key) {
                command.env(key, value);
            }
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // The timeout kills this whole group.
            command.process_group(0);
        }

        let start = Instant::now();
        let child = command.spawn().map_err(|source| SandboxError::Spawn {
            interpreter: interpreter.clone(),
            source,
        })?;
        let finished = process::supervise(child, timeout)?;
        let duration = start.elapsed();

        let report = ExecutionReport {
            exit_code: finished.status.code(),
            stdout: truncate_chars(
                &String::from_utf8_lossy(&finished.stdout),
                self.config.max_stdout_chars,
            ),
            stderr: truncate_chars(
                &String::from_utf8_lossy(&finished.stderr),
                self.config.max_stderr_chars,
            ),
            timed_out: finished.timed_out,
            duration,
            scratch_dir,
        };

        if report.timed_out {
            warn!(duration_ms = duration.as_millis() as u64, "program timed out");
        } else {
            debug!(
                exit_code = ?report.exit_code,
                duration_ms = duration.as_millis() as u64,
                "program finished"
            );
        }

        if let Err(error) = scratch.close() {
            warn!(scratch = %report.scratch_dir.display(), %error, "failed to remove scratch directory");
        }
        Ok(report)
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let mut builder = Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.config.scratch_root {
            Some(root) => {
                fs::create_dir_all(root).map_err(|source| SandboxError::ScratchDir { source })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        };
        dir.map_err(|source| SandboxError::ScratchDir { source })
    }
}

/// Absolute form of `path`; the child runs in the scratch directory, so
/// relative paths would resolve against the wrong place.
fn resolve(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|source| SandboxError::ResolvePath {
        path: path.to_path_buf(),
        source,
    })
}
