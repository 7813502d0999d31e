//! Extraction of program text from raw generator responses.

use std::sync::LazyLock;

use regex::Regex;

/// Reasoning blocks some models emit before the answer. The regex crate has
/// no backreferences, so each tag gets its own pattern.
static REASONING_BLOCKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["thought", "thinking", "think", "reasoning", "analysis"]
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<\s*{tag}\s*>.*?<\s*/\s*{tag}\s*>"))
                .expect("valid reasoning block regex")
        })
        .collect()
});

/// Wrapper tags whose content is kept.
static WRAPPER_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<\s*/?\s*(?:code|script|program|answer|output|response)\s*>")
        .expect("valid wrapper tag regex")
});

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*[A-Za-z0-9_+.-]*[ \t]*\r?\n(.*?)```").expect("valid fenced block regex")
});

static STRAY_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*```[A-Za-z0-9_+.-]*[ \t]*(?:\r?\n|$)").expect("valid stray fence regex")
});

/// Turn a raw response into bare program text.
///
/// Removes reasoning blocks and wrapper tags, takes the body of the first
/// fenced code block when there is one (otherwise drops stray fence lines),
/// and trims surrounding whitespace. Only the listed tag names are touched,
/// so comparison operators in code survive.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw.to_string();
    for block in REASONING_BLOCKS.iter() {
        text = block.replace_all(&text, "").into_owned();
    }
    text = WRAPPER_TAGS.replace_all(&text, "").into_owned();

    if let Some(body) = FENCED_BLOCK.captures(&text).and_then(|caps| caps.get(1)) {
        return body.as_str().trim().to_string();
    }

    STRAY_FENCE.replace_all(&text, "").trim().to_string()
}
