//! Session records and exporters.
//!
//! A `SessionRecord` captures one practice round: the question, the answer,
//! its evaluation, and optionally the rewrite with its re-evaluation.
//! Exporters turn a record into a downloadable document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

use crate::followups::FollowupGenerator;
use crate::questions::QuestionKind;
use crate::rewriter::Rewriter;
use crate::rubric::Rubric;
use crate::types::{StarEvaluation, MAX_COMPONENT_SCORE, MAX_TOTAL_SCORE};

const RULE_WIDTH: usize = 50;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize session: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Everything produced for one question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub question: String,
    pub question_source: QuestionKind,
    pub original_answer: String,
    pub evaluation: StarEvaluation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewritten_answer: Option<String>,

    /// Evaluation of the rewritten answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhanced_evaluation: Option<StarEvaluation>,

    #[serde(default)]
    pub followups: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_notes: Option<String>,

    pub exported_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Evaluate an answer and, if asked, rewrite it.
    pub fn build(
        question: &str,
        source: QuestionKind,
        answer: &str,
        rubric: &Rubric,
        with_rewrite: bool,
    ) -> Self {
        let mut record = Self {
            question: question.to_string(),
            question_source: source,
            original_answer: answer.to_string(),
            evaluation: crate::evaluate_with_rubric(answer, rubric),
            rewritten_answer: None,
            enhanced_evaluation: None,
            followups: Vec::new(),
            improvement_notes: None,
            exported_at: Utc::now(),
        };

        if with_rewrite {
            let outcome = Rewriter::new(rubric).rewrite_with_notes(question, answer);
            record.attach_rewrite(
                outcome.rewritten_answer,
                outcome.followups,
                outcome.improvement_notes,
                rubric,
            );
        } else {
            record.followups = FollowupGenerator::new(rubric).generate(question, answer);
        }

        record
    }

    /// Record a rewrite and re-evaluate it.
    pub fn attach_rewrite(
        &mut self,
        rewritten: String,
        followups: Vec<String>,
        notes: String,
        rubric: &Rubric,
    ) {
        self.enhanced_evaluation = Some(crate::evaluate_with_rubric(&rewritten, rubric));
        self.rewritten_answer = Some(rewritten);
        self.followups = followups;
        self.improvement_notes = Some(notes);
    }

    /// Change in total score from the original to the rewritten answer.
    pub fn improvement(&self) -> Option<i16> {
        self.enhanced_evaluation
            .as_ref()
            .map(|enhanced| i16::from(enhanced.total_score) - i16::from(self.evaluation.total_score))
    }
}

/// Serializes a session record into a document.
pub trait SessionExporter {
    fn export(&self, record: &SessionRecord) -> Result<String, ExportError>;

    /// File extension without the dot.
    fn file_extension(&self) -> &'static str;
}

/// Human-readable plain text report.
pub struct TextReportExporter;

impl SessionExporter for TextReportExporter {
    fn export(&self, record: &SessionRecord) -> Result<String, ExportError> {
        let rule = "=".repeat(RULE_WIDTH);
        let eval = &record.evaluation;
        let mut out = String::new();

        writeln!(out, "STAR Interview Mentor - Interview Session Report")?;
        writeln!(out, "{}", rule)?;
        writeln!(out)?;
        writeln!(out, "EXPORTED AT: {}", record.exported_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(out, "QUESTION SOURCE: {}", record.question_source)?;
        writeln!(out, "QUESTION:")?;
        writeln!(out, "{}", record.question)?;
        writeln!(out)?;
        writeln!(out, "ORIGINAL RESPONSE:")?;
        writeln!(out, "{}", record.original_answer)?;
        writeln!(out)?;
        writeln!(out, "ORIGINAL STAR EVALUATION:")?;
        for (component, score) in eval.components() {
            writeln!(
                out,
                "• {}: {}/{} - {}",
                component, score.score, MAX_COMPONENT_SCORE, score.feedback
            )?;
        }
        writeln!(out, "• Total Score: {}/{}", eval.total_score, MAX_TOTAL_SCORE)?;
        writeln!(out)?;
        writeln!(out, "IMPROVEMENT SUGGESTIONS:")?;
        if eval.suggestions.is_empty() {
            writeln!(out, "• None. Every component earned full credit.")?;
        }
        for suggestion in &eval.suggestions {
            writeln!(out, "• {}", suggestion)?;
        }

        if let Some(rewritten) = &record.rewritten_answer {
            writeln!(out)?;
            writeln!(out, "ENHANCED RESPONSE:")?;
            writeln!(out, "{}", rewritten)?;
            writeln!(out)?;
            writeln!(out, "ENHANCEMENT NOTES:")?;
            writeln!(out, "{}", record.improvement_notes.as_deref().unwrap_or(""))?;
        }

        writeln!(out)?;
        writeln!(out, "FOLLOW-UP QUESTIONS:")?;
        for (i, question) in record.followups.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, question)?;
        }

        if let (Some(enhanced), Some(improvement)) =
            (&record.enhanced_evaluation, record.improvement())
        {
            writeln!(out)?;
            writeln!(out, "ENHANCED EVALUATION:")?;
            writeln!(out, "• Total Score: {}/{}", enhanced.total_score, MAX_TOTAL_SCORE)?;
            writeln!(out, "• Improvement: {:+} points", improvement)?;
        }

        writeln!(out)?;
        writeln!(out, "{}", rule)?;
        writeln!(out, "Generated by STAR Interview Mentor")?;

        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

/// Pretty-printed JSON of the full record.
pub struct JsonExporter;

impl SessionExporter for JsonExporter {
    fn export(&self, record: &SessionRecord) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(record)?)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// `interview_session_<first 20 chars of the question>.<ext>`, spaces as underscores.
pub fn suggested_file_name(question: &str, extension: &str) -> String {
    let stem: String = question
        .trim()
        .chars()
        .take(20)
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();

    if stem.is_empty() {
        format!("interview_session.{}", extension)
    } else {
        format!("interview_session_{}.{}", stem, extension)
    }
}
