//! Validation of model output before it reaches the caller.
//!
//! Output that fails any check is discarded whole and the rule-based result
//! is used instead. Nothing here repairs a malformed answer.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use thiserror::Error;

use star_core::split_star_segments;

lazy_static! {
    static ref NUMBER: Regex = Regex::new(r"\d+(?:[.,]\d+)*").unwrap();
    static ref PLACEHOLDER: Regex = Regex::new(r"\[[^\]\n]*\]").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^(?:\d+[.)]|[-*•])\s+").unwrap();
}

/// Smallest and largest number of follow-up questions accepted.
pub const FOLLOWUP_RANGE: std::ops::RangeInclusive<usize> = 3..=5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("output is empty")]
    Empty,

    #[error("output does not contain Situation, Task, Action and Result segments in order")]
    MissingSegments,

    #[error("output has text before the Situation segment")]
    Preamble,

    #[error("output has {words} words, limit is {limit}")]
    TooLong { words: usize, limit: usize },

    #[error("number '{0}' does not appear in the original answer")]
    InventedNumber(String),

    #[error("expected 3 to 5 questions, got {0}")]
    QuestionCount(usize),

    #[error("line is not a question: '{0}'")]
    NotAQuestion(String),
}

fn numbers(text: &str) -> BTreeSet<String> {
    NUMBER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Check a rewritten answer and return it in canonical segment form.
///
/// The word limit is one and a half times `max_words`. Numbers inside square
/// brackets are placeholders and exempt from the source check.
pub fn validate_rewrite(output: &str, answer: &str, max_words: usize) -> Result<String, ValidationError> {
    let output = output.trim();
    if output.is_empty() {
        return Err(ValidationError::Empty);
    }

    let segments = split_star_segments(output).ok_or(ValidationError::MissingSegments)?;
    if !output.starts_with("**Situation:**") {
        return Err(ValidationError::Preamble);
    }

    let limit = max_words * 3 / 2;
    let words = segments.word_count();
    if words > limit {
        return Err(ValidationError::TooLong { words, limit });
    }

    let known = numbers(answer);
    let unbracketed = PLACEHOLDER.replace_all(output, "");
    if let Some(invented) = numbers(&unbracketed).into_iter().find(|n| !known.contains(n)) {
        return Err(ValidationError::InventedNumber(invented));
    }

    Ok(segments.render())
}

/// Check follow-up output (one question per line) and keep at most `count`.
pub fn validate_followups(output: &str, count: usize) -> Result<Vec<String>, ValidationError> {
    let questions: Vec<String> = output
        .lines()
        .map(|line| LIST_MARKER.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(ValidationError::Empty);
    }
    if !FOLLOWUP_RANGE.contains(&questions.len()) {
        return Err(ValidationError::QuestionCount(questions.len()));
    }
    if let Some(bad) = questions.iter().find(|q| !q.ends_with('?')) {
        return Err(ValidationError::NotAQuestion(bad.clone()));
    }

    let keep = count.clamp(*FOLLOWUP_RANGE.start(), *FOLLOWUP_RANGE.end());
    Ok(questions.into_iter().take(keep).collect())
}
