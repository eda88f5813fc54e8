//! Synthesizer: aggregates component scores into a `StarEvaluation`.
//!
//! The aggregation policy is fixed:
//! 1. `total_score` is the unweighted sum of the four component scores
//! 2. One suggestion per component below full credit, in S -> T -> A -> R order
//! 3. Identical input yields identical scores, wording and order

use crate::rubric::Rubric;
use crate::scorers::{scorer_for, score_all};
use crate::signals::DetectedSignals;
use crate::types::{Component, ComponentScore, StarEvaluation};

/// The Synthesizer turns detected signals into a final evaluation.
pub struct Synthesizer<'a> {
    rubric: &'a Rubric,
}

impl<'a> Synthesizer<'a> {
    pub fn new(rubric: &'a Rubric) -> Self {
        Self { rubric }
    }

    /// Score every component and assemble the evaluation.
    pub fn synthesize(&self, signals: &DetectedSignals) -> StarEvaluation {
        let [situation, task, action, result] = score_all(signals, self.rubric);
        let evaluation = Self::assemble(situation, task, action, result);

        tracing::debug!(
            situation = evaluation.situation.score,
            task = evaluation.task.score,
            action = evaluation.action.score,
            result = evaluation.result.score,
            total = evaluation.total_score,
            "STAR evaluation complete"
        );

        evaluation
    }

    /// Build an evaluation from already computed component scores.
    pub fn assemble(
        situation: ComponentScore,
        task: ComponentScore,
        action: ComponentScore,
        result: ComponentScore,
    ) -> StarEvaluation {
        let total_score = situation.score + task.score + action.score + result.score;
        let suggestions = Self::build_suggestions([
            (Component::Situation, &situation),
            (Component::Task, &task),
            (Component::Action, &action),
            (Component::Result, &result),
        ]);

        StarEvaluation {
            situation,
            task,
            action,
            result,
            total_score,
            suggestions,
        }
    }

    fn build_suggestions(scores: [(Component, &ComponentScore); 4]) -> Vec<String> {
        scores
            .into_iter()
            .filter(|(_, score)| !score.is_full())
            .map(|(component, score)| scorer_for(component).suggestion(score))
            .collect()
    }
}
