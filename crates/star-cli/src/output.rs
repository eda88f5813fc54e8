//! Terminal rendering for evaluations, rewrites and question lists.

use serde::Serialize;
use star_core::{Question, StarEvaluation, MAX_COMPONENT_SCORE, MAX_TOTAL_SCORE};
use std::fmt::Write;

use crate::args::Format;

/// Serialize `value` for the json/yaml formats. `None` for text.
pub fn structured<T: Serialize>(value: &T, format: Format) -> anyhow::Result<Option<String>> {
    Ok(match format {
        Format::Json => Some(serde_json::to_string_pretty(value)?),
        Format::Yaml => Some(serde_yaml::to_string(value)?),
        Format::Text => None,
    })
}

pub fn evaluation(eval: &StarEvaluation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "STAR score: {}/{}", eval.total_score, MAX_TOTAL_SCORE);
    let _ = writeln!(out);
    for (component, score) in eval.components() {
        let _ = writeln!(
            out,
            "  {:<10} {}/{}  {}",
            component.label(),
            score.score,
            MAX_COMPONENT_SCORE,
            score.feedback
        );
    }

    if !eval.suggestions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Suggestions:");
        for suggestion in &eval.suggestions {
            let _ = writeln!(out, "  - {}", suggestion);
        }
    }
    out
}

pub fn followups(questions: &[String]) -> String {
    let mut out = String::new();
    for (i, question) in questions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, question);
    }
    out
}

pub fn questions<'a>(questions: impl IntoIterator<Item = &'a Question>) -> String {
    let mut out = String::new();
    for question in questions {
        let _ = writeln!(out, "{:>3}  {}", question.id, question.text);
    }
    if out.is_empty() {
        out.push_str("No matching questions.\n");
    }
    out
}
