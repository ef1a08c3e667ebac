//! Text normalization for model-emitted JSON payloads.
//!
//! Sonar Pro is instructed to return bare JSON but in practice sometimes
//! wraps it in a Markdown code fence, prefixes lines with `//` comments, or
//! leaves a trailing comma before a closing brace. [`normalize_payload`]
//! applies an ordered list of narrow transformations so the result can be
//! handed to a strict JSON parser:
//!
//! 1. strip one surrounding fenced code block (```` ```json ```` or ```` ``` ````),
//! 2. drop comment-only lines (lines whose first non-whitespace is `//`),
//! 3. remove trailing commas directly before `}` or `]`.
//!
//! Deliberately NOT handled: multiple or nested fenced blocks, block
//! comments (`/* … */`), and `//` or `,}` sequences inside string values —
//! a payload relying on those still fails structural parsing downstream.

use std::sync::LazyLock;

use regex::Regex;

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing-comma pattern compiles"));

/// Normalizes a raw model payload into parseable JSON text.
#[must_use]
pub fn normalize_payload(raw: &str) -> String {
    let unfenced = strip_code_fence(raw.trim());
    let uncommented = strip_comment_lines(&unfenced);
    strip_trailing_commas(&uncommented)
}

/// Strips one surrounding Markdown code fence, if present.
///
/// The opening fence may carry a language tag (```` ```json ````); both the
/// opening and closing fence lines are dropped. Text that is not fenced is
/// returned unchanged.
fn strip_code_fence(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }

    let mut lines = text.lines();
    // Drop the opening fence line, tag and all.
    lines.next();

    let mut body: Vec<&str> = lines.collect();
    if body.last().is_some_and(|l| l.trim() == "```") {
        body.pop();
    }
    body.join("\n")
}

/// Drops lines whose first non-whitespace characters are `//`.
fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes commas that directly precede a closing `}` or `]`.
fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_RE.replace_all(text, "$1").into_owned()
}
