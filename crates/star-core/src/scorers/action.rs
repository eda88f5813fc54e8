//! Action scorer
//!
//! **Question**: What concrete steps did you take?
//!
//! Counts distinct action-verb stems in active voice. "I improved it, then
//! improved it again" is one action; "the bug was fixed" is none.

use crate::rubric::Rubric;
use crate::signals::{DetectedSignals, Signal};
use crate::types::{Component, ComponentScore};

use super::ComponentScorer;

pub struct ActionScorer;

impl ComponentScorer for ActionScorer {
    fn component(&self) -> Component {
        Component::Action
    }

    fn score(&self, signals: &DetectedSignals, rubric: &Rubric) -> ComponentScore {
        let config = &rubric.action;
        let stems = signals.active_verb_stems();
        let count = stems.len();

        if count >= config.full_verb_count {
            return ComponentScore::new(
                2,
                format!("Concrete steps described with {} distinct action verbs.", count),
            );
        }

        if count > 0 {
            return ComponentScore::new(
                1,
                format!(
                    "Only {} distinct action verb{}; walk through the individual steps.",
                    count,
                    if count == 1 { "" } else { "s" }
                ),
            );
        }

        if config.credit_generic_action && signals.has(Signal::GenericAction) {
            return ComponentScore::new(
                1,
                "Actions are generic (\"worked on\", \"helped\"). Say exactly what you did.",
            );
        }

        if signals.has(Signal::PassiveAction) {
            return ComponentScore::new(
                0,
                "Actions are in passive voice, so it is unclear what you did yourself.",
            );
        }

        ComponentScore::new(0, "No actions described.")
    }

    fn suggestion(&self, score: &ComponentScore) -> String {
        if score.score == 0 {
            "Describe the specific steps you personally took, in active voice (\"I analyzed...\", \"I implemented...\").".to_string()
        } else {
            "Break your actions into concrete steps with strong verbs such as \"analyzed\", \"implemented\" or \"led\".".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::detect;

    fn score(text: &str) -> ComponentScore {
        ActionScorer.score(&detect(text), &Rubric::default())
    }

    #[test]
    fn test_multiple_verbs_full_credit() {
        assert_eq!(score("I fixed a bug by improving logging").score, 2);
        assert_eq!(
            score("I audited the logs, identified a timeout bug, and shipped a fix.").score,
            2
        );
    }

    #[test]
    fn test_repeated_verb_counts_once() {
        assert_eq!(score("I improved it, then improved it again").score, 1);
    }

    #[test]
    fn test_generic_action_partial_credit() {
        let result = score("I worked on the backend and helped the team");
        assert_eq!(result.score, 1);
        assert!(result.feedback.contains("generic"));
    }

    #[test]
    fn test_passive_only_scores_zero() {
        let result = score("The bug was fixed and the service was redesigned.");
        assert_eq!(result.score, 0);
        assert!(result.feedback.contains("passive"));
    }

    #[test]
    fn test_no_action() {
        assert_eq!(score("It was a long year").score, 0);
    }

    #[test]
    fn test_custom_verb_threshold() {
        let mut rubric = Rubric::default();
        rubric.action.full_verb_count = 3;
        let signals = detect("I fixed a bug by improving logging");
        assert_eq!(ActionScorer.score(&signals, &rubric).score, 1);
    }
}
