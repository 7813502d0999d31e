use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tabnorm_contract::ContractChecker;
use tabnorm_generate::{CodeGenerator, GenerationError, PromptBuilder, RepairContext, clean_response};
use tabnorm_ingest::{ReadOptions, summarize_with_options};
use tabnorm_model::{AttemptFailure, AttemptResult, GeneratedProgram, NormalizationOutcome};
use tabnorm_sandbox::{ExecutionReport, Sandbox};
use tabnorm_validate::{ValidateOptions, validate};
use tracing::{debug, info, info_span, trace, warn};

use crate::config::NormalizerConfig;
use crate::error::NormalizeError;
use crate::request::NormalizationRequest;

/// Outcome of a request plus the audit trail of its attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizationRun {
    pub outcome: NormalizationOutcome,
    pub attempts: Vec<AttemptResult>,
}

/// Runs the repair loop.
///
/// Holds only read-only settings and the generator, so one instance can
/// serve concurrent requests from several threads.
pub struct Normalizer {
    generator: Arc<dyn CodeGenerator>,
    checker: ContractChecker,
    prompts: PromptBuilder,
    sandbox: Sandbox,
    validate_options: ValidateOptions,
    read_options: ReadOptions,
    max_sample_rows: usize,
}

/// Most recent program and why it failed; the only state carried between
/// attempts.
struct Feedback {
    program: String,
    failure: AttemptFailure,
}

/// Result of the generation step of one attempt.
enum Generated {
    Program(GeneratedProgram),
    Failed(GenerationError),
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig, generator: Arc<dyn CodeGenerator>) -> Self {
        let checker = ContractChecker::new(config.dialect, config.contract_policy());
        let prompts = PromptBuilder::for_checker(&checker).with_strict_columns(config.strict_columns);
        Self {
            generator,
            checker,
            prompts,
            sandbox: Sandbox::new(config.sandbox_config()),
            validate_options: config.validate_options(),
            read_options: config.read_options(),
            max_sample_rows: config.max_sample_rows,
        }
    }

    /// Run a request and return only its outcome.
    pub fn normalize(
        &self,
        request: &NormalizationRequest,
    ) -> Result<NormalizationOutcome, NormalizeError> {
        self.run(request).map(|run| run.outcome)
    }

    /// Run a request and return its outcome with every attempt record.
    pub fn run(&self, request: &NormalizationRequest) -> Result<NormalizationRun, NormalizeError> {
        if request.max_attempts == 0 {
            return Err(NormalizeError::invalid("max_attempts must be at least 1"));
        }
        if resolve_path(&request.input_path) == resolve_path(&request.output_path) {
            return Err(NormalizeError::invalid(
                "output path must differ from the input path",
            ));
        }

        let span = info_span!(
            "normalize",
            input = %request.input_path.display(),
            max_attempts = request.max_attempts
        );
        let _guard = span.enter();

        let profile = summarize_with_options(
            &request.input_path,
            self.max_sample_rows,
            &self.read_options,
        )?;
        ensure_parent_dir(&request.output_path)?;
        info!(
            columns = profile.columns.len(),
            rows = profile.row_count,
            schema_columns = request.schema.len(),
            "input profiled"
        );

        let system = self.prompts.system_text();
        let mut attempts: Vec<AttemptResult> = Vec::new();
        let mut feedback: Option<Feedback> = None;
        let mut last_program: Option<GeneratedProgram> = None;

        for attempt_number in 1..=request.max_attempts {
            let attempt_span = info_span!("attempt", attempt = attempt_number);
            let _attempt_guard = attempt_span.enter();

            let previous = feedback.as_ref().map(|fb| RepairContext {
                program: &fb.program,
                failure: &fb.failure,
            });
            let user = self
                .prompts
                .user_text(&profile, &request.schema, previous.as_ref());

            let program = match self.generate(&system, &user, request) {
                Generated::Program(program) => program,
                Generated::Failed(error) => {
                    if attempt_number == 1 && error.is_unavailable() {
                        return Err(NormalizeError::GeneratorUnavailable {
                            message: error.to_string(),
                        });
                    }
                    let failure = AttemptFailure::Generation(vec![error.to_string()]);
                    warn!(kind = failure.kind(), "attempt failed");
                    // No new program: the next prompt repeats the last feedback.
                    attempts.push(AttemptResult::failed(
                        attempt_number,
                        None,
                        failure,
                        String::new(),
                    ));
                    continue;
                }
            };

            let result = self.evaluate(attempt_number, program, request)?;
            last_program.clone_from(&result.program);

            if result.success
                && let Some(final_program) = result.program.clone()
            {
                info!(attempts_used = attempt_number, "normalization succeeded");
                attempts.push(result);
                return Ok(NormalizationRun {
                    outcome: NormalizationOutcome::Success {
                        attempts_used: attempt_number,
                        final_program,
                        output_path: request.output_path.clone(),
                    },
                    attempts,
                });
            }

            if let (Some(program), Some(failure)) = (&result.program, &result.failure) {
                warn!(
                    kind = failure.kind(),
                    diagnostics = failure.messages().len(),
                    "attempt failed"
                );
                feedback = Some(Feedback {
                    program: program.text().to_string(),
                    failure: failure.clone(),
                });
            }
            attempts.push(result);
        }

        remove_stale_output(&request.output_path)?;
        let last_diagnostics = attempts
            .last()
            .map(|attempt| attempt.diagnostics().to_vec())
            .unwrap_or_default();
        warn!(
            attempts_used = request.max_attempts,
            "normalization failed after exhausting attempts"
        );
        Ok(NormalizationRun {
            outcome: NormalizationOutcome::Failure {
                attempts_used: request.max_attempts,
                last_diagnostics,
                last_program,
            },
            attempts,
        })
    }

    fn generate(&self, system: &str, user: &str, request: &NormalizationRequest) -> Generated {
        trace!(prompt = %user, "user prompt");
        match self
            .generator
            .generate(system, user, request.generation_timeout)
        {
            Ok(raw) => {
                let program = GeneratedProgram::new(clean_response(&raw));
                debug!(
                    program_sha256 = program.short_id(),
                    bytes = program.byte_len(),
                    "program generated"
                );
                Generated::Program(program)
            }
            Err(error) => Generated::Failed(error),
        }
    }

    /// Static check, execution and validation of one program.
    fn evaluate(
        &self,
        attempt_number: u32,
        program: GeneratedProgram,
        request: &NormalizationRequest,
    ) -> Result<AttemptResult, NormalizeError> {
        let violations = self.checker.check_messages(program.text());
        if !violations.is_empty() {
            return Ok(AttemptResult::failed(
                attempt_number,
                Some(program),
                AttemptFailure::ContractViolation(violations),
                String::new(),
            ));
        }

        remove_stale_output(&request.output_path)?;

        let report = match self.sandbox.execute(
            program.text(),
            &request.input_path,
            &request.output_path,
            request.execution_timeout,
        ) {
            Ok(report) => report,
            Err(error) => {
                return Ok(AttemptResult::failed(
                    attempt_number,
                    Some(program),
                    AttemptFailure::ExecutionError(vec![format!(
                        "The program could not be started: {error}"
                    )]),
                    String::new(),
                ));
            }
        };
        let stdout = report.stdout.clone();

        if let Some(failure) = execution_failure(&report, request) {
            return Ok(AttemptResult::failed(
                attempt_number,
                Some(program),
                failure,
                stdout,
            ));
        }

        let validation = validate(&request.output_path, &request.schema, &self.validate_options);
        if !validation.is_ok() {
            return Ok(AttemptResult::failed(
                attempt_number,
                Some(program),
                AttemptFailure::Validation(validation.messages()),
                stdout,
            ));
        }

        Ok(AttemptResult::succeeded(attempt_number, program, stdout))
    }
}

/// Diagnostics for a run that timed out or exited unsuccessfully.
fn execution_failure(report: &ExecutionReport, request: &NormalizationRequest) -> Option<AttemptFailure> {
    if report.timed_out {
        let mut messages = vec![format!(
            "Execution exceeded the {}s limit and was killed.",
            request.execution_timeout.as_secs_f64()
        )];
        push_stream(&mut messages, "STDERR", &report.stderr);
        return Some(AttemptFailure::ExecutionTimeout(messages));
    }

    match report.exit_code {
        Some(0) => None,
        code => {
            let headline = match code {
                Some(code) => format!("Runtime error: process exited with code {code}."),
                None => "Runtime error: process was terminated by a signal.".to_string(),
            };
            let mut messages = vec![headline];
            push_stream(&mut messages, "STDERR", &report.stderr);
            push_stream(&mut messages, "STDOUT", &report.stdout);
            Some(AttemptFailure::ExecutionError(messages))
        }
    }
}

fn push_stream(messages: &mut Vec<String>, label: &str, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        messages.push(format!("{label}:\n{text}"));
    }
}

fn remove_stale_output(path: &Path) -> Result<(), NormalizeError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale output");
            Ok(())
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Absolute form of `path` with symlinks and `..` resolved as far as the
/// filesystem allows. The file itself need not exist.
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or(absolute),
        _ => absolute,
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), NormalizeError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| NormalizeError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
