//! Structural patterns per dialect.

use std::sync::LazyLock;

use regex::Regex;
use tabnorm_model::ScriptDialect;

static PY_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*def[ \t]+transform[ \t]*\(([^)]*)\)").expect("valid python entry regex")
});

static PY_GUARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^if[ \t]+__name__[ \t]*==[ \t]*(?:"__main__"|'__main__')[ \t]*:"#)
        .expect("valid python guard regex")
});

static PY_INVOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\btransform[ \t]*\([ \t]*sys\.argv\[1\][ \t]*,[ \t]*sys\.argv\[2\][ \t]*\)")
        .expect("valid python invocation regex")
});

static SH_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:function[ \t]+)?transform[ \t]*\([ \t]*\)").expect("valid shell entry regex")
});

static SH_GUARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[[ \t]+"?\$#"?[ \t]+-(?:eq|ne)[ \t]+2[ \t]+\]"#).expect("valid shell guard regex")
});

static SH_INVOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*transform[ \t]+"\$1"[ \t]+"\$2"[ \t]*(?:$|[;&|#])"#)
        .expect("valid shell invocation regex")
});

/// Result of looking for the entry routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryMatch {
    Missing,
    /// Found; parameter count when the dialect declares parameters.
    Found(Option<usize>),
}

pub(crate) fn find_entry(dialect: ScriptDialect, text: &str) -> EntryMatch {
    match dialect {
        ScriptDialect::Python => match PY_ENTRY.captures(text) {
            Some(caps) => EntryMatch::Found(Some(
                caps.get(1).map_or(0, |params| count_parameters(params.as_str())),
            )),
            None => EntryMatch::Missing,
        },
        ScriptDialect::Shell => {
            if SH_ENTRY.is_match(text) {
                EntryMatch::Found(None)
            } else {
                EntryMatch::Missing
            }
        }
    }
}

/// Byte offset where the guard ends, if present.
pub(crate) fn find_guard(dialect: ScriptDialect, text: &str) -> Option<usize> {
    let guard = match dialect {
        ScriptDialect::Python => &*PY_GUARD,
        ScriptDialect::Shell => &*SH_GUARD,
    };
    guard.find(text).map(|found| found.end())
}

pub(crate) fn has_invocation(dialect: ScriptDialect, text: &str) -> bool {
    match dialect {
        ScriptDialect::Python => PY_INVOCATION.is_match(text),
        ScriptDialect::Shell => SH_INVOCATION.is_match(text),
    }
}

/// Call expected inside the guard, for messages.
pub(crate) fn expected_invocation(dialect: ScriptDialect) -> &'static str {
    match dialect {
        ScriptDialect::Python => "transform(sys.argv[1], sys.argv[2])",
        ScriptDialect::Shell => "transform \"$1\" \"$2\"",
    }
}

/// Count top-level parameters in a Python parameter list.
///
/// Commas nested in brackets (`dict[str, int]`) do not split, and the bare
/// `*` and `/` markers are not parameters.
fn count_parameters(params: &str) -> usize {
    let mut depth = 0usize;
    let mut parts = Vec::new();
    let mut current = String::new();
    for ch in params.chars() {
        match ch {
            '[' | '(' | '{' => {
                depth += 1;
                current.push(ch);
            }
            ']' | ')' | '}' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            ',' if depth == 0 => parts.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty() && *part != "*" && *part != "/")
        .count()
}
