//! Interview question supply.
//!
//! A `QuestionBank` is an ordinary caller-owned value holding the built-in
//! sample questions plus any custom questions the user saves.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Built-in behavioral interview questions.
pub const SAMPLE_QUESTIONS: [&str; 10] = [
    "Tell me about a time you had to solve a difficult problem",
    "Describe a situation where you had to work with a difficult team member",
    "Give an example of a time you had to meet a tight deadline",
    "Tell me about a time you had to learn something new quickly",
    "Describe a situation where you had to lead a project",
    "Tell me about a time you had to handle a conflict at work",
    "Describe a challenging goal you set and how you achieved it",
    "Give an example of when you had to adapt to a significant change",
    "Tell me about a time you made a mistake and how you handled it",
    "Describe a situation where you had to influence others without authority",
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuestionError {
    #[error("Question text is empty")]
    Empty,

    #[error("No question with id {0}")]
    NotFound(usize),

    #[error("Question {0} is a built-in sample and cannot be deleted")]
    NotCustom(usize),
}

/// Where a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Sample,
    Custom,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Sample => "Sample Question",
            QuestionKind::Custom => "Custom Question",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: usize,
    pub text: String,
    pub kind: QuestionKind,
}

/// Anything that can supply interview questions.
pub trait QuestionSource {
    /// All questions, in id order.
    fn questions(&self) -> &[Question];

    fn get(&self, id: usize) -> Option<&Question> {
        self.questions().iter().find(|q| q.id == id)
    }

    /// Questions matching any whitespace-separated term, best match first.
    ///
    /// Ranked by the number of matched terms, then by id. A blank term
    /// returns every question.
    fn search(&self, term: &str) -> Vec<&Question> {
        let terms: Vec<String> = term.split_whitespace().map(|t| t.to_lowercase()).collect();
        if terms.is_empty() {
            return self.questions().iter().collect();
        }

        let mut ranked: Vec<(usize, &Question)> = self
            .questions()
            .iter()
            .map(|q| {
                let text = q.text.to_lowercase();
                (terms.iter().filter(|t| text.contains(t.as_str())).count(), q)
            })
            .filter(|(hits, _)| *hits > 0)
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        ranked.into_iter().map(|(_, q)| q).collect()
    }
}

/// Sample and custom questions owned by one caller.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    next_id: usize,
}

impl QuestionBank {
    /// An empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// A bank seeded with the built-in sample questions, ids starting at 1.
    pub fn with_samples() -> Self {
        let mut bank = Self::new();
        for text in SAMPLE_QUESTIONS {
            bank.push(text.to_string(), QuestionKind::Sample);
        }
        bank
    }

    fn push(&mut self, text: String, kind: QuestionKind) -> usize {
        self.next_id += 1;
        let id = self.next_id;
        self.questions.push(Question { id, text, kind });
        id
    }

    /// Save a custom question and return its id.
    ///
    /// Saving text that is already in the bank (ignoring case and
    /// surrounding whitespace) returns the existing id.
    pub fn save_custom(&mut self, text: &str) -> Result<usize, QuestionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QuestionError::Empty);
        }

        let lowered = text.to_lowercase();
        if let Some(existing) = self.questions.iter().find(|q| q.text.to_lowercase() == lowered) {
            tracing::debug!(id = existing.id, "Question already saved");
            return Ok(existing.id);
        }

        Ok(self.push(text.to_string(), QuestionKind::Custom))
    }

    /// Remove a custom question.
    pub fn delete_custom(&mut self, id: usize) -> Result<Question, QuestionError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.id == id)
            .ok_or(QuestionError::NotFound(id))?;

        if self.questions[index].kind != QuestionKind::Custom {
            return Err(QuestionError::NotCustom(id));
        }

        Ok(self.questions.remove(index))
    }

    /// Custom questions only, in the order they were saved.
    pub fn custom(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.kind == QuestionKind::Custom)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionSource for QuestionBank {
    fn questions(&self) -> &[Question] {
        &self.questions
    }
}
