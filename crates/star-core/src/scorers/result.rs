//! Result scorer
//!
//! **Question**: What happened, and how much did it matter?
//!
//! Qualitative outcomes cap at partial credit. Full credit needs a
//! digit-bearing metric in a sentence that describes the outcome.

use crate::rubric::Rubric;
use crate::signals::{DetectedSignals, Signal};
use crate::types::{Component, ComponentScore};

use super::{first_quotes, quote_list, ComponentScorer};

pub struct ResultScorer;

impl ComponentScorer for ResultScorer {
    fn component(&self) -> Component {
        Component::Result
    }

    fn score(&self, signals: &DetectedSignals, rubric: &Rubric) -> ComponentScore {
        let config = &rubric.result;
        let has_metric = signals.has(Signal::QuantifiedMetric);
        let has_outcome = signals.has(Signal::OutcomeLanguage);

        if has_metric
            && has_outcome
            && (config.metric_anywhere || signals.metric_in_outcome_sentence())
        {
            let quotes = first_quotes(signals, &[Signal::QuantifiedMetric]);
            return ComponentScore::new(
                2,
                format!("Quantified outcome ({}).", quote_list(&quotes)),
            );
        }

        if has_outcome {
            return ComponentScore::new(
                1,
                "The outcome is described but not quantified.",
            );
        }

        if has_metric {
            return ComponentScore::new(
                config.metric_without_outcome_score,
                "A number is mentioned, but not tied to an outcome.",
            );
        }

        ComponentScore::new(0, "No result described.")
    }

    fn suggestion(&self, score: &ComponentScore) -> String {
        if score.score == 0 {
            "Finish with the result and quantify it: a percentage, time saved, revenue or users affected.".to_string()
        } else {
            "Quantify the result with a concrete metric (e.g. \"cut response time by 30%\").".to_string()
        }
    }
}
