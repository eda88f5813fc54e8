//! STAR signal detection.
//!
//! `detect` runs every predicate in [`patterns`] over a prepared answer and
//! records each hit with the evidence span that triggered it. The result is
//! shared by the scorers, the rewriter and the follow-up generator.

pub mod patterns;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::evidence::Evidence;
use crate::text::{self, Sentence};
use crate::types::Component;

/// Kinds of signal the detectors recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    TemporalMarker,
    NamedOrganization,
    ProblemStatement,
    VagueContext,
    ObjectivePhrase,
    ImplicitObjective,
    ActionVerb,
    PassiveAction,
    GenericAction,
    QuantifiedMetric,
    OutcomeLanguage,
}

impl Signal {
    /// The STAR component this signal informs.
    pub fn component(&self) -> Component {
        match self {
            Signal::TemporalMarker
            | Signal::NamedOrganization
            | Signal::ProblemStatement
            | Signal::VagueContext => Component::Situation,
            Signal::ObjectivePhrase | Signal::ImplicitObjective => Component::Task,
            Signal::ActionVerb | Signal::PassiveAction | Signal::GenericAction => Component::Action,
            Signal::QuantifiedMetric | Signal::OutcomeLanguage => Component::Result,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Signal::TemporalMarker => "temporal marker",
            Signal::NamedOrganization => "named organization",
            Signal::ProblemStatement => "problem statement",
            Signal::VagueContext => "vague context",
            Signal::ObjectivePhrase => "objective phrase",
            Signal::ImplicitObjective => "implicit objective",
            Signal::ActionVerb => "action verb",
            Signal::PassiveAction => "passive action",
            Signal::GenericAction => "generic action",
            Signal::QuantifiedMetric => "quantified metric",
            Signal::OutcomeLanguage => "outcome language",
        }
    }
}

/// One detected signal and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalHit {
    pub signal: Signal,
    pub evidence: Evidence,

    /// Canonical verb stem for action hits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
}

impl SignalHit {
    fn new(signal: Signal, text: &str, start: usize, end: usize) -> Self {
        let quote = &text[start..end];
        Self {
            signal,
            evidence: Evidence::from_answer(format!("{}: {}", signal.name(), quote), start, end),
            stem: None,
        }
    }
}

/// All signals detected in one answer, grouped by component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedSignals {
    /// The prepared answer the evidence spans index into
    pub text: String,
    pub situation: Vec<SignalHit>,
    pub task: Vec<SignalHit>,
    pub action: Vec<SignalHit>,
    pub result: Vec<SignalHit>,
}

impl DetectedSignals {
    /// Hits for one component.
    pub fn hits(&self, component: Component) -> &[SignalHit] {
        match component {
            Component::Situation => &self.situation,
            Component::Task => &self.task,
            Component::Action => &self.action,
            Component::Result => &self.result,
        }
    }

    /// Whether any hit of `signal` was found.
    pub fn has(&self, signal: Signal) -> bool {
        self.hits(signal.component()).iter().any(|h| h.signal == signal)
    }

    /// Number of distinct signal kinds among `kinds` that were found.
    pub fn distinct_kinds(&self, kinds: &[Signal]) -> usize {
        kinds.iter().filter(|k| self.has(**k)).count()
    }

    /// Distinct canonical stems of active-voice action verbs.
    pub fn active_verb_stems(&self) -> BTreeSet<&str> {
        self.action
            .iter()
            .filter(|h| h.signal == Signal::ActionVerb)
            .filter_map(|h| h.stem.as_deref())
            .collect()
    }

    /// Whether the answer has no text to analyze.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Sentences of the answer.
    pub fn sentences(&self) -> Vec<Sentence<'_>> {
        text::sentences(&self.text)
    }

    /// Sentences carrying at least one hit for `component`, in answer order.
    ///
    /// Hits of `exclude` kinds do not qualify a sentence on their own.
    pub fn sentences_for(&self, component: Component, exclude: &[Signal]) -> Vec<Sentence<'_>> {
        let hits: Vec<&SignalHit> = self
            .hits(component)
            .iter()
            .filter(|h| !exclude.contains(&h.signal))
            .collect();

        self.sentences()
            .into_iter()
            .filter(|s| hits.iter().any(|h| h.evidence.within(s.start, s.end)))
            .collect()
    }

    /// Whether some sentence carries both outcome language and a metric.
    pub fn metric_in_outcome_sentence(&self) -> bool {
        self.sentences().iter().any(|s| {
            let in_sentence = |signal: Signal| {
                self.result
                    .iter()
                    .any(|h| h.signal == signal && h.evidence.within(s.start, s.end))
            };
            in_sentence(Signal::OutcomeLanguage) && in_sentence(Signal::QuantifiedMetric)
        })
    }
}

fn collect(signal: Signal, text: &str, spans: Vec<(usize, usize)>, into: &mut Vec<SignalHit>) {
    into.extend(
        spans
            .into_iter()
            .map(|(start, end)| SignalHit::new(signal, text, start, end)),
    );
}

/// Detect every STAR signal in an already prepared answer.
pub fn detect(text: &str) -> DetectedSignals {
    let mut situation = Vec::new();
    collect(Signal::TemporalMarker, text, patterns::temporal_spans(text), &mut situation);
    collect(Signal::NamedOrganization, text, patterns::organization_spans(text), &mut situation);
    collect(Signal::ProblemStatement, text, patterns::problem_spans(text), &mut situation);
    collect(Signal::VagueContext, text, patterns::vague_context_spans(text), &mut situation);

    let mut task = Vec::new();
    collect(Signal::ObjectivePhrase, text, patterns::objective_spans(text), &mut task);
    collect(Signal::ImplicitObjective, text, patterns::implicit_objective_spans(text), &mut task);

    let mut action: Vec<SignalHit> = patterns::find_action_verbs(text)
        .into_iter()
        .map(|m| {
            let signal = if m.passive {
                Signal::PassiveAction
            } else {
                Signal::ActionVerb
            };
            let mut hit = SignalHit::new(signal, text, m.start, m.end);
            hit.stem = Some(m.stem);
            hit
        })
        .collect();
    collect(Signal::GenericAction, text, patterns::generic_action_spans(text), &mut action);

    let mut result = Vec::new();
    collect(Signal::QuantifiedMetric, text, patterns::metric_spans(text), &mut result);
    collect(Signal::OutcomeLanguage, text, patterns::outcome_spans(text), &mut result);

    for hits in [&mut situation, &mut task, &mut action, &mut result] {
        hits.sort_by_key(|h| (h.evidence.start, h.evidence.end));
    }

    DetectedSignals {
        text: text.to_string(),
        situation,
        task,
        action,
        result,
    }
}
