//! Size ceiling and denylist configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabnorm_model::ScriptDialect;

/// Default ceiling for generated program size in bytes.
pub const DEFAULT_MAX_PROGRAM_BYTES: usize = 40_000;

/// Why a denylist token is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCategory {
    ProcessSpawn,
    Network,
    DynamicEval,
    DestructiveFs,
    /// Added through configuration.
    Custom,
}

impl DenyCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::ProcessSpawn => "process spawning",
            Self::Network => "network access",
            Self::DynamicEval => "dynamic code evaluation",
            Self::DestructiveFs => "destructive filesystem operation",
            Self::Custom => "site policy",
        }
    }
}

impl fmt::Display for DenyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One forbidden token.
///
/// Tokens that start with a word character only match at a word boundary
/// that is not an attribute access, so `rm ` does not fire inside
/// `transform ` and `compile(` does not fire on `re.compile(`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyRule {
    pub token: String,
    pub category: DenyCategory,
}

impl DenyRule {
    pub fn new(token: impl Into<String>, category: DenyCategory) -> Self {
        Self {
            token: token.into(),
            category,
        }
    }

    /// Whether the token occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        if self.token.is_empty() {
            return false;
        }
        let needs_boundary = self.token.chars().next().is_some_and(is_word_char);
        text.match_indices(self.token.as_str()).any(|(idx, _)| {
            !needs_boundary
                || !text[..idx]
                    .chars()
                    .next_back()
                    .is_some_and(|ch| is_word_char(ch) || ch == '.')
        })
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

const PYTHON_DENYLIST: &[(&str, DenyCategory)] = &[
    ("subprocess", DenyCategory::ProcessSpawn),
    ("os.system", DenyCategory::ProcessSpawn),
    ("os.popen", DenyCategory::ProcessSpawn),
    ("os.spawn", DenyCategory::ProcessSpawn),
    ("os.exec", DenyCategory::ProcessSpawn),
    ("os.fork", DenyCategory::ProcessSpawn),
    ("pty", DenyCategory::ProcessSpawn),
    ("multiprocessing", DenyCategory::ProcessSpawn),
    ("requests", DenyCategory::Network),
    ("httpx", DenyCategory::Network),
    ("aiohttp", DenyCategory::Network),
    ("urllib", DenyCategory::Network),
    ("http.client", DenyCategory::Network),
    ("socket", DenyCategory::Network),
    ("ftplib", DenyCategory::Network),
    ("smtplib", DenyCategory::Network),
    ("eval(", DenyCategory::DynamicEval),
    ("exec(", DenyCategory::DynamicEval),
    ("compile(", DenyCategory::DynamicEval),
    ("__import__", DenyCategory::DynamicEval),
    ("builtins", DenyCategory::DynamicEval),
    ("importlib", DenyCategory::DynamicEval),
    ("shutil.rmtree", DenyCategory::DestructiveFs),
    ("shutil.move", DenyCategory::DestructiveFs),
    ("os.remove", DenyCategory::DestructiveFs),
    ("os.unlink", DenyCategory::DestructiveFs),
    ("os.rmdir", DenyCategory::DestructiveFs),
    ("os.removedirs", DenyCategory::DestructiveFs),
    ("os.rename", DenyCategory::DestructiveFs),
    (".unlink(", DenyCategory::DestructiveFs),
    (".rmdir(", DenyCategory::DestructiveFs),
];

const SHELL_DENYLIST: &[(&str, DenyCategory)] = &[
    ("sudo", DenyCategory::ProcessSpawn),
    ("nohup", DenyCategory::ProcessSpawn),
    ("xargs", DenyCategory::ProcessSpawn),
    ("kill ", DenyCategory::ProcessSpawn),
    ("python", DenyCategory::ProcessSpawn),
    ("perl", DenyCategory::ProcessSpawn),
    ("curl", DenyCategory::Network),
    ("wget", DenyCategory::Network),
    ("nc ", DenyCategory::Network),
    ("ncat", DenyCategory::Network),
    ("netcat", DenyCategory::Network),
    ("ssh", DenyCategory::Network),
    ("scp", DenyCategory::Network),
    ("telnet", DenyCategory::Network),
    ("/dev/tcp", DenyCategory::Network),
    ("/dev/udp", DenyCategory::Network),
    ("eval ", DenyCategory::DynamicEval),
    ("source ", DenyCategory::DynamicEval),
    ("sh -c", DenyCategory::DynamicEval),
    ("bash -c", DenyCategory::DynamicEval),
    ("rm ", DenyCategory::DestructiveFs),
    ("rmdir", DenyCategory::DestructiveFs),
    ("mv ", DenyCategory::DestructiveFs),
    ("dd ", DenyCategory::DestructiveFs),
    ("shred", DenyCategory::DestructiveFs),
    ("mkfs", DenyCategory::DestructiveFs),
    ("chmod", DenyCategory::DestructiveFs),
    ("chown", DenyCategory::DestructiveFs),
];

/// Size ceiling plus denylist applied by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPolicy {
    pub max_bytes: usize,
    pub denylist: Vec<DenyRule>,
}

impl ContractPolicy {
    /// Default ceiling and the built-in denylist of `dialect`.
    pub fn for_dialect(dialect: ScriptDialect) -> Self {
        let table = match dialect {
            ScriptDialect::Python => PYTHON_DENYLIST,
            ScriptDialect::Shell => SHELL_DENYLIST,
        };
        Self {
            max_bytes: DEFAULT_MAX_PROGRAM_BYTES,
            denylist: table
                .iter()
                .map(|(token, category)| DenyRule::new(*token, *category))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Append site-specific tokens; blank and already listed tokens are skipped.
    #[must_use]
    pub fn with_extra_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = token.into();
            if token.trim().is_empty() || self.denylist.iter().any(|rule| rule.token == token) {
                continue;
            }
            self.denylist.push(DenyRule::new(token, DenyCategory::Custom));
        }
        self
    }

    /// Tokens grouped by category, in a stable order, for prompt text.
    pub fn tokens_by_category(&self) -> Vec<(DenyCategory, Vec<&str>)> {
        let mut grouped: Vec<(DenyCategory, Vec<&str>)> = Vec::new();
        for rule in &self.denylist {
            match grouped.iter_mut().find(|(category, _)| *category == rule.category) {
                Some((_, tokens)) => tokens.push(rule.token.as_str()),
                None => grouped.push((rule.category, vec![rule.token.as_str()])),
            }
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_tokens_need_a_boundary() {
        let rule = DenyRule::new("rm ", DenyCategory::DestructiveFs);
        assert!(!rule.matches("transform \"$1\" \"$2\""));
        assert!(rule.matches("rm -f \"$2\""));
        assert!(rule.matches("x; rm -rf /"));
    }

    #[test]
    fn method_calls_are_not_builtin_calls() {
        let rule = DenyRule::new("compile(", DenyCategory::DynamicEval);
        assert!(!rule.matches("pattern = re.compile(r\"\\d+\")"));
        assert!(rule.matches("code = compile(source, 'x', 'exec')"));
        assert!(rule.matches("x=compile(source)"));
    }

    #[test]
    fn punctuation_tokens_match_anywhere() {
        let rule = DenyRule::new(".unlink(", DenyCategory::DestructiveFs);
        assert!(rule.matches("Path(p).unlink()"));
    }

    #[test]
    fn extra_tokens_are_deduplicated() {
        let policy = ContractPolicy::for_dialect(ScriptDialect::Python)
            .with_extra_tokens(["boto3", "subprocess", "  "]);
        let custom: Vec<&DenyRule> = policy
            .denylist
            .iter()
            .filter(|rule| rule.category == DenyCategory::Custom)
            .collect();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0].token, "boto3");
    }

    #[test]
    fn tokens_are_grouped_in_first_seen_order() {
        let policy = ContractPolicy::for_dialect(ScriptDialect::Python);
        let grouped = policy.tokens_by_category();
        let categories: Vec<DenyCategory> = grouped.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                DenyCategory::ProcessSpawn,
                DenyCategory::Network,
                DenyCategory::DynamicEval,
                DenyCategory::DestructiveFs,
            ]
        );
    }
}
