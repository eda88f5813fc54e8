//! Core types for STAR evaluation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest score a single STAR component can earn.
pub const MAX_COMPONENT_SCORE: u8 = 2;

/// Highest total score across all four components.
pub const MAX_TOTAL_SCORE: u8 = MAX_COMPONENT_SCORE * 4;

/// The four STAR components, in rubric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Situation,
    Task,
    Action,
    Result,
}

impl Component {
    /// All components in S -> T -> A -> R order.
    pub const ALL: [Component; 4] = [
        Component::Situation,
        Component::Task,
        Component::Action,
        Component::Result,
    ];

    /// The question this component answers for an interviewer.
    pub fn criterion(&self) -> &'static str {
        match self {
            Component::Situation => "What was the context, and what problem were you facing?",
            Component::Task => "What were you personally responsible for achieving?",
            Component::Action => "What concrete steps did you take?",
            Component::Result => "What happened, and how much did it matter?",
        }
    }

    /// Segment label used in rewritten answers.
    pub fn label(&self) -> &'static str {
        match self {
            Component::Situation => "Situation",
            Component::Task => "Task",
            Component::Action => "Action",
            Component::Result => "Result",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score and feedback for one STAR component.
///
/// The score is always in `0..=2`; the only constructor clamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub score: u8,
    pub feedback: String,
}

impl ComponentScore {
    pub fn new(score: u8, feedback: impl Into<String>) -> Self {
        Self {
            score: score.min(MAX_COMPONENT_SCORE),
            feedback: feedback.into(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.score == MAX_COMPONENT_SCORE
    }
}

/// Structured result of evaluating one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarEvaluation {
    pub situation: ComponentScore,
    pub task: ComponentScore,
    pub action: ComponentScore,
    pub result: ComponentScore,

    /// Unweighted sum of the four component scores (0..=8)
    pub total_score: u8,

    /// One suggestion per component that scored below 2, in S -> T -> A -> R order
    pub suggestions: Vec<String>,
}

impl StarEvaluation {
    /// Get the score for a component.
    pub fn component(&self, component: Component) -> &ComponentScore {
        match component {
            Component::Situation => &self.situation,
            Component::Task => &self.task,
            Component::Action => &self.action,
            Component::Result => &self.result,
        }
    }

    /// Iterate components with their scores in rubric order.
    pub fn components(&self) -> impl Iterator<Item = (Component, &ComponentScore)> {
        Component::ALL.into_iter().map(move |c| (c, self.component(c)))
    }

    /// The first component holding the lowest score.
    pub fn weakest(&self) -> Component {
        self.components()
            .min_by_key(|(_, s)| s.score)
            .map(|(c, _)| c)
            .unwrap_or(Component::Situation)
    }

    /// Components that scored below the maximum.
    pub fn deficient(&self) -> Vec<Component> {
        self.components()
            .filter(|(_, s)| !s.is_full())
            .map(|(c, _)| c)
            .collect()
    }
}
