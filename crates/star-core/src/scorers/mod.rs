//! Per-component STAR scorers.
//!
//! Each scorer answers one rubric question:
//!
//! | Scorer | Question |
//! |--------|----------|
//! | Situation | What was the context, and what problem were you facing? |
//! | Task | What were you personally responsible for achieving? |
//! | Action | What concrete steps did you take? |
//! | Result | What happened, and how much did it matter? |
//!
//! Scorers read the shared [`DetectedSignals`] and never look at raw text,
//! so evaluation and rewriting agree on what an answer contains.

mod action;
mod result;
mod situation;
mod task;

pub use action::ActionScorer;
pub use result::ResultScorer;
pub use situation::SituationScorer;
pub use task::TaskScorer;

use crate::rubric::Rubric;
use crate::signals::{DetectedSignals, Signal};
use crate::types::{Component, ComponentScore};

/// Trait implemented by every component scorer.
pub trait ComponentScorer {
    /// Which component this scorer rates.
    fn component(&self) -> Component;

    /// The rubric question this scorer answers.
    fn criterion(&self) -> &'static str {
        self.component().criterion()
    }

    /// Rate the component from detected signals.
    fn score(&self, signals: &DetectedSignals, rubric: &Rubric) -> ComponentScore;

    /// Improvement advice for a component that scored below full credit.
    fn suggestion(&self, score: &ComponentScore) -> String;
}

/// The scorer for a component.
pub fn scorer_for(component: Component) -> &'static dyn ComponentScorer {
    match component {
        Component::Situation => &SituationScorer,
        Component::Task => &TaskScorer,
        Component::Action => &ActionScorer,
        Component::Result => &ResultScorer,
    }
}

/// Score all four components in rubric order.
pub fn score_all(signals: &DetectedSignals, rubric: &Rubric) -> [ComponentScore; 4] {
    Component::ALL.map(|c| scorer_for(c).score(signals, rubric))
}

/// First quoted occurrence of each of `kinds` that was detected, in `kinds` order.
pub(crate) fn first_quotes<'a>(signals: &'a DetectedSignals, kinds: &[Signal]) -> Vec<&'a str> {
    kinds
        .iter()
        .filter_map(|kind| {
            signals
                .hits(kind.component())
                .iter()
                .find(|h| h.signal == *kind)
                .and_then(|h| h.evidence.quote(&signals.text))
        })
        .collect()
}

/// Render quotes as `"a", "b"` for feedback text.
pub(crate) fn quote_list(quotes: &[&str]) -> String {
    quotes
        .iter()
        .map(|q| format!("\"{}\"", q))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::detect;

    #[test]
    fn test_scorer_for_matches_component() {
        for component in Component::ALL {
            assert_eq!(scorer_for(component).component(), component);
            assert_eq!(scorer_for(component).criterion(), component.criterion());
        }
    }

    #[test]
    fn test_score_all_on_empty_answer() {
        let scores = score_all(&detect(""), &Rubric::default());
        assert!(scores.iter().all(|s| s.score == 0));
        assert!(scores.iter().all(|s| !s.feedback.is_empty()));
    }

    #[test]
    fn test_quote_list() {
        assert_eq!(quote_list(&["2022", "Acme"]), "\"2022\", \"Acme\"");
        assert_eq!(quote_list(&[]), "");
    }
}
