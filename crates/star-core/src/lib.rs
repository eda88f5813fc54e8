//! # star-core
//!
//! Deterministic STAR interview answer evaluation and rewrite engine.
//!
//! This crate answers three questions about a behavioral interview answer:
//! - How well does it cover Situation, Task, Action and Result?
//! - What would a stronger STAR version look like?
//! - What would a recruiter ask next?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No LLM calls**: All evaluation is rule-based
//! 3. **Total**: Entry points accept any text and never panic or error
//! 4. **Traceable**: Every detected signal carries an evidence span
//!
//! ## Example
//!
//! ```rust
//! use star_core::{evaluate, rewrite};
//!
//! let evaluation = evaluate("I fixed a bug by improving logging");
//! assert_eq!(evaluation.task.score, 0);
//!
//! let rewritten = rewrite("Tell me about a bug you fixed", "I fixed a bug by improving logging");
//! assert!(rewritten.starts_with("**Situation:**"));
//! ```

pub mod domain;
pub mod evidence;
pub mod export;
pub mod followups;
pub mod questions;
pub mod rewriter;
pub mod rubric;
pub mod scorers;
pub mod signals;
pub mod synthesizer;
pub mod text;
pub mod types;

// Re-export main types at crate root
pub use domain::{Domain, DomainMatch};
pub use evidence::Evidence;
pub use export::{
    suggested_file_name, ExportError, JsonExporter, SessionExporter, SessionRecord,
    TextReportExporter,
};
pub use followups::FollowupGenerator;
pub use questions::{Question, QuestionBank, QuestionError, QuestionKind, QuestionSource};
pub use rewriter::{
    split_star_segments, RewriteOutcome, RewriteStrategy, Rewriter, StarSegments,
};
pub use rubric::{Rubric, RubricError};
pub use scorers::ComponentScorer;
pub use signals::{DetectedSignals, Signal, SignalHit};
pub use synthesizer::Synthesizer;
pub use types::{Component, ComponentScore, StarEvaluation, MAX_COMPONENT_SCORE, MAX_TOTAL_SCORE};

/// Evaluate an answer against the default rubric.
///
/// Accepts any text, including the empty string. Overlong input is truncated
/// to the rubric's `input.max_chars`.
pub fn evaluate(answer: &str) -> StarEvaluation {
    evaluate_with_rubric(answer, &Rubric::default())
}

/// Evaluate an answer under a custom rubric.
pub fn evaluate_with_rubric(answer: &str, rubric: &Rubric) -> StarEvaluation {
    let prepared = text::prepare(answer, rubric.input.max_chars);
    let detected = signals::detect(&prepared);
    Synthesizer::new(rubric).synthesize(&detected)
}

/// Rewrite an answer into `**Situation:**`/`**Task:**`/`**Action:**`/`**Result:**` segments.
pub fn rewrite(question: &str, answer: &str) -> String {
    rewrite_with_rubric(question, answer, &Rubric::default())
}

pub fn rewrite_with_rubric(question: &str, answer: &str, rubric: &Rubric) -> String {
    Rewriter::new(rubric).rewrite(question, answer)
}

/// Rewrite with follow-ups and improvement notes, under the default rubric.
pub fn rewrite_with_notes(question: &str, answer: &str) -> RewriteOutcome {
    Rewriter::new(&Rubric::default()).rewrite_with_notes(question, answer)
}

/// Generate three to five recruiter follow-up questions.
pub fn generate_followups(question: &str, answer: &str) -> Vec<String> {
    generate_followups_with_rubric(question, answer, &Rubric::default())
}

pub fn generate_followups_with_rubric(question: &str, answer: &str, rubric: &Rubric) -> Vec<String> {
    FollowupGenerator::new(rubric).generate(question, answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ACME: &str = "At Acme Corp in 2022, our checkout conversion dropped 15%. \
        I was responsible for diagnosing the regression. I audited the payment gateway logs, \
        identified a timeout bug, and shipped a fix within 48 hours. Conversion recovered to \
        baseline within a week, a 15% lift.";

    #[test]
    fn test_complete_answer_scores_full_marks() {
        let evaluation = evaluate(ACME);
        assert_eq!(evaluation.situation.score, 2);
        assert_eq!(evaluation.task.score, 2);
        assert_eq!(evaluation.action.score, 2);
        assert_eq!(evaluation.result.score, 2);
        assert_eq!(evaluation.total_score, 8);
        assert!(evaluation.suggestions.is_empty());
    }

    #[test]
    fn test_thin_answer() {
        let evaluation = evaluate("I fixed a bug by improving logging");
        assert_eq!(evaluation.task.score, 0);
        assert!(evaluation.result.score <= 1);
        assert!(evaluation.action.score > 0);
        assert!(evaluation.total_score <= 5);

        let suggestions = evaluation.suggestions.join(" ").to_lowercase();
        assert!(suggestions.contains("objective"));
        assert!(suggestions.contains("quantify"));
    }

    #[test]
    fn test_empty_answer() {
        let evaluation = evaluate("");
        assert_eq!(evaluation.total_score, 0);
        assert_eq!(evaluation.suggestions.len(), 4);
        for (_, score) in evaluation.components() {
            assert_eq!(score.score, 0);
            assert!(!score.feedback.is_empty());
        }
        assert_eq!(evaluate("   \n\t  "), evaluation);
    }

    #[test]
    fn test_overlong_input_is_truncated() {
        let long = format!("{} {}", ACME, "filler words here ".repeat(2000));
        let evaluation = evaluate(&long);
        assert_eq!(evaluation.total_score, 8);

        let mut rubric = Rubric::default();
        rubric.input.max_chars = 100;
        // The Result sentence is cut off.
        assert!(evaluate_with_rubric(ACME, &rubric).result.score < 2);
    }

    #[test]
    fn test_rewrite_has_segments() {
        let rewritten = rewrite("Tell me about a time you fixed a bug", "I fixed a bug by improving logging");
        assert!(split_star_segments(&rewritten).is_some());
    }

    #[test]
    fn test_generate_followups_count() {
        let followups = generate_followups("Tell me about a deadline", ACME);
        assert!((3..=5).contains(&followups.len()));
    }

    #[test]
    fn test_rewrite_with_notes_followups_come_from_rewrite() {
        let outcome = rewrite_with_notes("Tell me about a bug", "I fixed a bug by improving logging");
        assert!(!outcome.followups.is_empty());
        assert!(outcome.improvement_notes.contains("Task"));
    }

    proptest! {
        #[test]
        fn total_is_sum_of_components(answer in ".{0,500}") {
            let e = evaluate(&answer);
            let sum = e.situation.score + e.task.score + e.action.score + e.result.score;
            prop_assert_eq!(e.total_score, sum);
            prop_assert!(e.total_score <= MAX_TOTAL_SCORE);
            prop_assert_eq!(e.suggestions.len(), e.deficient().len());
        }

        #[test]
        fn evaluation_is_deterministic(answer in ".{0,300}") {
            prop_assert_eq!(evaluate(&answer), evaluate(&answer));
        }

        #[test]
        fn raw_bytes_never_break_the_engine(bytes in proptest::collection::vec(any::<u8>(), 0..400)) {
            let answer = text::normalize_bytes(&bytes);
            let e = evaluate(&answer);
            prop_assert!(e.total_score <= MAX_TOTAL_SCORE);
            prop_assert!(split_star_segments(&rewrite("", &answer)).is_some());
        }

        #[test]
        fn answers_without_digits_never_get_full_result(
            words in proptest::collection::vec(
                prop::sample::select(vec![
                    "improved", "the", "team", "reduced", "latency", "significantly", "as a result",
                    "customers", "were", "happier", "we", "increased", "revenue", "a lot", "saved", "time",
                ]),
                1..30,
            )
        ) {
            let answer = format!("{}.", words.join(" "));
            prop_assert!(evaluate(&answer).result.score <= 1);
        }
    }
}
