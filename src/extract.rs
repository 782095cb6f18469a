//! Answer extraction from free-form model output.

use crate::dataset::Choice;
use regex::Regex;
use std::sync::LazyLock;

/// Matches "ANSWER", an optional colon, optional whitespace, then one option
/// letter. Case-insensitive; the first match in the text wins.
static ANSWER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ANSWER:?\s*([A-D])").expect("answer pattern is valid"));

/// Extract an option letter from raw model output.
///
/// Empty or whitespace-only text yields `None`, as does any text without the
/// `ANSWER: X` pattern. The matched letter is normalized to uppercase.
/// Pure and deterministic; safe on arbitrary untrusted text.
///
/// # Example
///
/// ```
/// use choicebench::{extract_answer, Choice};
///
/// assert_eq!(extract_answer("I believe the answer: b"), Some(Choice::B));
/// assert_eq!(extract_answer("no verdict here"), None);
/// ```
pub fn extract_answer(text: &str) -> Option<Choice> {
    if text.trim().is_empty() {
        return None;
    }

    ANSWER_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().chars().next())
        .and_then(Choice::from_char)
}
