//! Task scorer
//!
//! **Question**: What were you personally responsible for achieving?

use crate::rubric::Rubric;
use crate::signals::{DetectedSignals, Signal};
use crate::types::{Component, ComponentScore};

use super::{first_quotes, quote_list, ComponentScorer};

pub struct TaskScorer;

impl ComponentScorer for TaskScorer {
    fn component(&self) -> Component {
        Component::Task
    }

    fn score(&self, signals: &DetectedSignals, rubric: &Rubric) -> ComponentScore {
        if signals.has(Signal::ObjectivePhrase) {
            let quotes = first_quotes(signals, &[Signal::ObjectivePhrase]);
            return ComponentScore::new(
                2,
                format!("Your objective is explicit: {}.", quote_list(&quotes)),
            );
        }

        if rubric.task.credit_implicit_objective && signals.has(Signal::ImplicitObjective) {
            return ComponentScore::new(
                1,
                "An objective can be inferred, but you never say what you personally owned.",
            );
        }

        ComponentScore::new(0, "No objective stated.")
    }

    fn suggestion(&self, _score: &ComponentScore) -> String {
        "State your objective explicitly, e.g. \"My goal was to...\" or \"I was responsible for...\".".to_string()
    }
}
