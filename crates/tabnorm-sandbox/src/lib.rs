//! Sandboxed execution of generated programs.
//!
//! Every execution gets its own scratch directory holding only the program
//! file. The interpreter runs there with a scrubbed environment, null stdin
//! and exactly two arguments: the input path and the output path. On unix
//! the child leads its own process group, and the whole group is killed when
//! the child outlives its timeout. Processes a program leaves running after
//! it exits on its own are not tracked. The scratch directory is removed when
//! the call returns, on every path.

mod config;
mod error;
mod executor;
mod process;
mod report;

pub use config::{DEFAULT_MAX_STDERR_CHARS, DEFAULT_MAX_STDOUT_CHARS, SandboxConfig};
pub use error::{Result, SandboxError};
pub use executor::Sandbox;
pub use report::{ExecutionReport, truncate_chars};
