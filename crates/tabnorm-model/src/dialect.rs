//! Languages a generated transformation program may be written in.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the entry routine every generated program must define.
pub const ENTRY_ROUTINE: &str = "transform";

/// Script language of generated programs.
///
/// The dialect fixes the interpreter, the file the program is written to and
/// the wording of the I/O contract. The structural patterns and the denylist
/// live with the contract checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    /// Python 3 with pandas available.
    #[default]
    Python,
    /// POSIX shell with the standard text utilities.
    Shell,
}

impl ScriptDialect {
    /// Parse a dialect name (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "python" | "py" | "python3" => Some(Self::Python),
            "shell" | "sh" | "posix" => Some(Self::Shell),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Shell => "shell",
        }
    }

    /// Interpreter used when the configuration does not override it.
    pub fn default_interpreter(self) -> &'static str {
        match self {
            Self::Python => "python3",
            Self::Shell => "sh",
        }
    }

    /// File name the program is materialized as inside the scratch directory.
    pub fn script_file_name(self) -> &'static str {
        match self {
            Self::Python => "transform.py",
            Self::Shell => "transform.sh",
        }
    }

    /// Human-readable language name used in prompts.
    pub fn language_name(self) -> &'static str {
        match self {
            Self::Python => "Python 3",
            Self::Shell => "POSIX sh",
        }
    }

    /// Required entry routine definition, as shown to the generator.
    pub fn entry_signature(self) -> &'static str {
        match self {
            Self::Python => "def transform(input_path: str, output_path: str) -> None:",
            Self::Shell => "transform() {  # $1 = input_path, $2 = output_path",
        }
    }

    /// Required direct-execution guard, as shown to the generator.
    pub fn guard_example(self) -> &'static str {
        match self {
            Self::Python => {
                "if __name__ == \"__main__\":\n    import sys\n    if len(sys.argv) != 3:\n        raise SystemExit(\"Usage: python script.py <input_csv> <output_csv>\")\n    transform(sys.argv[1], sys.argv[2])"
            }
            Self::Shell => {
                "if [ \"$#\" -ne 2 ]; then\n    echo \"usage: sh script.sh <input_csv> <output_csv>\" >&2\n    exit 64\nfi\ntransform \"$1\" \"$2\""
            }
        }
    }

    /// Libraries or tools the generated program may rely on.
    pub fn allowed_libraries(self) -> &'static str {
        match self {
            Self::Python => "pandas, numpy, datetime, re, sys, os (path handling only), typing",
            Self::Shell => "awk, sed, cut, tr, sort, head, tail, printf, cat",
        }
    }
}

impl fmt::Display for ScriptDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(ScriptDialect::parse("Python3"), Some(ScriptDialect::Python));
        assert_eq!(ScriptDialect::parse(" sh "), Some(ScriptDialect::Shell));
        assert_eq!(ScriptDialect::parse("ruby"), None);
    }

    #[test]
    fn guard_invokes_entry_routine_with_two_arguments() {
        assert!(ScriptDialect::Python
            .guard_example()
            .contains("transform(sys.argv[1], sys.argv[2])"));
        assert!(ScriptDialect::Shell
            .guard_example()
            .contains("transform \"$1\" \"$2\""));
    }
}
