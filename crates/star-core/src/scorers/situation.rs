//! Situation scorer
//!
//! **Question**: What was the context, and what problem were you facing?
//!
//! Full credit needs several distinct strong markers: a time reference, a
//! named organization or team, and an explicit problem. One marker or vague
//! scene-setting earns partial credit.

use crate::rubric::Rubric;
use crate::signals::{DetectedSignals, Signal};
use crate::types::{Component, ComponentScore};

use super::{first_quotes, quote_list, ComponentScorer};

/// Markers that make a situation concrete.
pub const STRONG_MARKERS: [Signal; 3] = [
    Signal::TemporalMarker,
    Signal::NamedOrganization,
    Signal::ProblemStatement,
];

pub struct SituationScorer;

impl ComponentScorer for SituationScorer {
    fn component(&self) -> Component {
        Component::Situation
    }

    fn score(&self, signals: &DetectedSignals, rubric: &Rubric) -> ComponentScore {
        let config = &rubric.situation;
        let strong = signals.distinct_kinds(&STRONG_MARKERS);
        let quotes = first_quotes(signals, &STRONG_MARKERS);

        if strong >= config.full_marker_count {
            return ComponentScore::new(
                2,
                format!("Clear context anchored by {}.", quote_list(&quotes)),
            );
        }

        if strong > 0 {
            return ComponentScore::new(
                1,
                format!(
                    "Some context ({}), but not enough to picture the scene.",
                    quote_list(&quotes)
                ),
            );
        }

        if config.credit_vague_context && signals.has(Signal::VagueContext) {
            return ComponentScore::new(
                1,
                "The setting is vague. It names no time, organization or concrete problem.",
            );
        }

        ComponentScore::new(0, "No situation described.")
    }

    fn suggestion(&self, score: &ComponentScore) -> String {
        if score.score == 0 {
            "Open with the situation: when and where this happened, and the specific problem you faced.".to_string()
        } else {
            "Make the situation concrete: name the company or team, the timeframe, and the problem at stake.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::detect;

    fn score(text: &str) -> ComponentScore {
        SituationScorer.score(&detect(text), &Rubric::default())
    }

    #[test]
    fn test_two_strong_markers_full_credit() {
        let result = score("At Acme Corp in 2022, our checkout conversion dropped 15%.");
        assert_eq!(result.score, 2);
        assert!(result.feedback.contains("\"2022\""));
    }

    #[test]
    fn test_single_marker_partial_credit() {
        assert_eq!(score("I fixed a bug by improving logging").score, 1);
        assert_eq!(score("Last year I rewrote the parser").score, 1);
    }

    #[test]
    fn test_vague_context_partial_credit() {
        let result = score("Once at work my team shipped a feature");
        assert_eq!(result.score, 1);
        assert!(result.feedback.contains("vague"));
    }

    #[test]
    fn test_vague_context_credit_can_be_disabled() {
        let mut rubric = Rubric::default();
        rubric.situation.credit_vague_context = false;
        let result = SituationScorer.score(&detect("Once at work my team shipped a feature"), &rubric);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_no_context() {
        assert_eq!(score("I like pancakes").score, 0);
        assert_eq!(score("").score, 0);
    }

    #[test]
    fn test_stricter_marker_count() {
        let mut rubric = Rubric::default();
        rubric.situation.full_marker_count = 3;
        let signals = detect("In 2022 our service had an outage.");
        assert_eq!(SituationScorer.score(&signals, &rubric).score, 1);

        let signals = detect("At Acme Corp in 2022 our service had an outage.");
        assert_eq!(SituationScorer.score(&signals, &rubric).score, 2);
    }

    #[test]
    fn test_suggestion_wording_depends_on_score() {
        let absent = SituationScorer.suggestion(&ComponentScore::new(0, ""));
        let thin = SituationScorer.suggestion(&ComponentScore::new(1, ""));
        assert_ne!(absent, thin);
    }
}
