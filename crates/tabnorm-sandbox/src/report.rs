use std::path::PathBuf;
use std::time::Duration;

/// What happened when a program ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout, truncated.
    pub stdout: String,
    /// Captured stderr, truncated.
    pub stderr: String,
    pub timed_out: bool,
    pub duration: Duration,
    /// Scratch directory used for this run. Already removed when the report
    /// is returned.
    pub scratch_dir: PathBuf,
}

impl ExecutionReport {
    /// Ran to completion with exit code zero.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Keep at most `max_chars` characters, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
