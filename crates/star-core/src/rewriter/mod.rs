//! Deterministic STAR rewriter.
//!
//! Components the answer already covers well are lifted from the user's own
//! sentences, lightly cleaned. Everything else comes from domain templates.
//! Each answer sentence is claimed by at most one segment, with the most
//! specific components claiming first: Task, Result, Action, then Situation.

mod segments;
mod templates;

pub use segments::{split_star_segments, StarSegments};
pub use templates::{segment_template, PLACEHOLDER_RESULT};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::{classify, DomainMatch};
use crate::followups::FollowupGenerator;
use crate::rubric::Rubric;
use crate::signals::patterns::{has_placeholder_metric, has_quantifiable_metric};
use crate::signals::{detect, DetectedSignals, Signal};
use crate::synthesizer::Synthesizer;
use crate::text::{self, Sentence};
use crate::types::{Component, StarEvaluation, MAX_TOTAL_SCORE};

lazy_static! {
    static ref FILLER_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:basically|um+|uh+|you know|kind of|sort of|actually|literally)\b,?\s*"
    ).unwrap();

    static ref SPACE_BEFORE_PUNCTUATION: Regex = Regex::new(r"\s+([,.;:!?])").unwrap();

    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    static ref SEGMENT_LABEL: Regex =
        Regex::new(r"(?i)\*\*(?:Situation|Task|Action|Result):\*\*").unwrap();

    static ref TOKEN: Regex = Regex::new(r"\S+").unwrap();
}

/// Fewest words a shortened sentence may keep before the segment falls back
/// to its template.
const MIN_SHORTENED_WORDS: usize = 6;

/// Order in which components claim answer sentences.
const CLAIM_ORDER: [Component; 4] = [
    Component::Task,
    Component::Result,
    Component::Action,
    Component::Situation,
];

/// How the rewrite treated the original answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteStrategy {
    /// The answer was already strong; mostly the user's sentences are kept
    Polished,
    /// The answer was rebuilt around the STAR structure
    Restructured,
}

/// Rewrite plus follow-ups and improvement notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    pub rewritten_answer: String,
    pub followups: Vec<String>,
    pub improvement_notes: String,
    pub strategy: RewriteStrategy,

    /// First lowest-scoring component of the original answer
    pub weakest: Component,
}

/// Remove filler words and stray segment labels, and tidy a lifted sentence.
pub fn polish_sentence(sentence: &str) -> String {
    let unlabeled = SEGMENT_LABEL.replace_all(sentence, " ");
    let stripped = FILLER_PATTERN.replace_all(&unlabeled, "");
    let collapsed = WHITESPACE.replace_all(stripped.trim(), " ");
    let tidied = SPACE_BEFORE_PUNCTUATION.replace_all(&collapsed, "$1");
    text::finish_sentence(&tidied)
}

/// Rewrites answers into STAR structure under a rubric.
pub struct Rewriter<'a> {
    rubric: &'a Rubric,
}

impl<'a> Rewriter<'a> {
    pub fn new(rubric: &'a Rubric) -> Self {
        Self { rubric }
    }

    /// Rewrite an answer into four labeled STAR segments.
    pub fn rewrite(&self, question: &str, answer: &str) -> String {
        self.compose(question, answer).0.render()
    }

    /// Rewrite and attach follow-ups and improvement notes.
    pub fn rewrite_with_notes(&self, question: &str, answer: &str) -> RewriteOutcome {
        let (segments, evaluation) = self.compose(question, answer);
        let rewritten_answer = segments.render();

        let strategy = if evaluation.total_score >= self.rubric.rewrite.polish_threshold {
            RewriteStrategy::Polished
        } else {
            RewriteStrategy::Restructured
        };
        let weakest = evaluation.weakest();
        let followups = FollowupGenerator::new(self.rubric).generate(question, &rewritten_answer);

        let improvement_notes = if question.trim().is_empty() && answer.trim().is_empty() {
            "No question or answer was provided, so a template STAR answer was produced. \
             Replace the bracketed placeholders with your own details."
                .to_string()
        } else {
            Self::notes(&evaluation, weakest, strategy)
        };

        RewriteOutcome {
            rewritten_answer,
            followups,
            improvement_notes,
            strategy,
            weakest,
        }
    }

    fn notes(evaluation: &StarEvaluation, weakest: Component, strategy: RewriteStrategy) -> String {
        let mut notes = format!(
            "Weakest component: {} ({}/2). ",
            weakest,
            evaluation.component(weakest).score
        );

        match strategy {
            RewriteStrategy::Polished => notes.push_str(&format!(
                "The original answer was already strong ({}/{}), so its own sentences were kept with minor edits for clarity.",
                evaluation.total_score, MAX_TOTAL_SCORE
            )),
            RewriteStrategy::Restructured => notes.push_str(&format!(
                "The original answer scored {}/{} and was restructured using the STAR method. \
                 Replace bracketed placeholders such as [Company] and [X%] with your real details.",
                evaluation.total_score, MAX_TOTAL_SCORE
            )),
        }

        notes
    }

    /// Build the segments and the evaluation of the original answer.
    fn compose(&self, question: &str, answer: &str) -> (StarSegments, StarEvaluation) {
        let max_chars = self.rubric.input.max_chars;
        let question = text::prepare(question, max_chars);
        let answer = text::prepare(answer, max_chars);

        let signals = detect(&answer);
        let evaluation = Synthesizer::new(self.rubric).synthesize(&signals);
        let domain = classify(
            &[(question.as_str(), 2), (answer.as_str(), 1)],
            self.rubric.followups.min_domain_score,
        );

        let sentences = signals.sentences();
        let mut claimed: HashSet<usize> = HashSet::new();
        let mut lifted: [Vec<String>; 4] = Default::default();

        for component in CLAIM_ORDER {
            if !evaluation.component(component).is_full() {
                continue;
            }
            lifted[component_index(component)] =
                self.lift(&signals, &sentences, component, &mut claimed);
        }

        let mut parts: Vec<Vec<String>> = Component::ALL
            .iter()
            .zip(lifted)
            .map(|(component, sentences)| {
                if sentences.is_empty() {
                    segment_template(domain.domain, *component, &domain.topic)
                } else {
                    sentences
                }
            })
            .collect();

        self.fit_budget(&mut parts, &domain);
        ensure_result_metric(&mut parts[component_index(Component::Result)]);

        log_composition(&domain, &evaluation);

        let mut joined = parts.into_iter().map(|p| p.join(" "));
        let segments = StarSegments {
            situation: joined.next().unwrap_or_default(),
            task: joined.next().unwrap_or_default(),
            action: joined.next().unwrap_or_default(),
            result: joined.next().unwrap_or_default(),
        };

        (segments, evaluation)
    }

    /// Pick the user's strongest unclaimed sentences for a component.
    fn lift(
        &self,
        signals: &DetectedSignals,
        sentences: &[Sentence<'_>],
        component: Component,
        claimed: &mut HashSet<usize>,
    ) -> Vec<String> {
        let cap = match component {
            Component::Action => self.rubric.rewrite.action_sentences,
            _ => self.rubric.rewrite.context_sentences,
        };
        let exclude = excluded_signals(component);

        let mut ranked: Vec<(usize, usize)> = sentences
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed.contains(i))
            .map(|(i, s)| (i, sentence_weight(signals, component, exclude, s)))
            .filter(|(_, weight)| *weight > 0)
            .collect();

        // Strongest first, answer order on ties.
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let mut chosen: Vec<usize> = ranked.into_iter().take(cap).map(|(i, _)| i).collect();
        chosen.sort_unstable();

        chosen
            .into_iter()
            .map(|i| {
                claimed.insert(i);
                polish_sentence(sentences[i].text)
            })
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Bring the rewrite within the word budget.
    ///
    /// Trailing sentences go first, from the longest multi-sentence segment.
    /// Once every segment is down to one sentence, the longest one is cut at
    /// a clause or word boundary. A segment that cannot keep
    /// `MIN_SHORTENED_WORDS` words is replaced by its template.
    fn fit_budget(&self, parts: &mut [Vec<String>], domain: &DomainMatch) {
        let max_words = self.rubric.rewrite.max_words;
        let mut templated = [false; 4];

        loop {
            let total: usize = parts.iter().map(|p| segment_words(p)).sum();
            if total <= max_words {
                break;
            }

            if let Some(part) = parts
                .iter_mut()
                .filter(|p| p.len() > 1)
                .max_by_key(|p| segment_words(p))
            {
                part.pop();
                continue;
            }

            let Some(index) = (0..parts.len())
                .filter(|&i| !templated[i] && !parts[i].is_empty())
                .max_by_key(|&i| segment_words(&parts[i]))
            else {
                break;
            };

            let keep = segment_words(&parts[index]).saturating_sub(total - max_words);
            match shorten_sentence(&parts[index][0], keep) {
                Some(shorter) => parts[index] = vec![shorter],
                None => {
                    parts[index] = segment_template(domain.domain, Component::ALL[index], &domain.topic);
                    templated[index] = true;
                }
            }
        }
    }
}

fn segment_words(part: &[String]) -> usize {
    part.iter().map(|s| text::word_count(s)).sum()
}

/// Cut a sentence to at most `keep` words, preferring the last clause break
/// that retains at least half of them.
fn shorten_sentence(sentence: &str, keep: usize) -> Option<String> {
    if keep < MIN_SHORTENED_WORDS {
        return None;
    }

    let mut words = 0;
    let mut end = 0;
    let mut clause: Option<(usize, usize)> = None;

    for token in TOKEN.find_iter(sentence) {
        let n = text::word_count(token.as_str());
        if words + n > keep {
            break;
        }
        words += n;
        end = token.end();
        if token.as_str().ends_with([',', ';', ':']) {
            clause = Some((end, words));
        }
    }

    let cut = match clause {
        Some((at, clause_words)) if clause_words >= MIN_SHORTENED_WORDS && clause_words * 2 >= words => at,
        _ => end,
    };

    let shortened = text::finish_sentence(&sentence[..cut]);
    (text::word_count(&shortened) >= MIN_SHORTENED_WORDS).then_some(shortened)
}

fn component_index(component: Component) -> usize {
    match component {
        Component::Situation => 0,
        Component::Task => 1,
        Component::Action => 2,
        Component::Result => 3,
    }
}

/// Signals that never qualify a sentence for lifting.
fn excluded_signals(component: Component) -> &'static [Signal] {
    match component {
        Component::Situation => &[Signal::VagueContext],
        Component::Action => &[Signal::PassiveAction, Signal::GenericAction],
        Component::Result => &[Signal::QuantifiedMetric],
        Component::Task => &[],
    }
}

/// How strongly a sentence carries a component; zero means not at all.
fn sentence_weight(
    signals: &DetectedSignals,
    component: Component,
    exclude: &[Signal],
    sentence: &Sentence<'_>,
) -> usize {
    let inside = |signal: Signal| {
        signals
            .hits(signal.component())
            .iter()
            .filter(|h| h.signal == signal && h.evidence.within(sentence.start, sentence.end))
            .count()
    };

    let qualifying: usize = signals
        .hits(component)
        .iter()
        .filter(|h| !exclude.contains(&h.signal) && h.evidence.within(sentence.start, sentence.end))
        .count();

    if qualifying == 0 {
        return 0;
    }

    // A Result sentence carrying its own metric outranks qualitative ones.
    match component {
        Component::Result if inside(Signal::QuantifiedMetric) > 0 => qualifying + 10,
        _ => qualifying,
    }
}

/// Append a placeholder metric when the Result segment has none.
fn ensure_result_metric(result: &mut Vec<String>) {
    let joined = result.join(" ");
    if !has_quantifiable_metric(&joined) && !has_placeholder_metric(&joined) {
        result.push(PLACEHOLDER_RESULT.to_string());
    }
}

fn log_composition(domain: &DomainMatch, evaluation: &StarEvaluation) {
    let lifted: Vec<&str> = evaluation
        .components()
        .filter(|(_, score)| score.is_full())
        .map(|(component, _)| component.label())
        .collect();

    tracing::debug!(
        domain = %domain.domain,
        topic = %domain.topic,
        lifted = ?lifted,
        total = evaluation.total_score,
        "Composed STAR rewrite"
    );
}
