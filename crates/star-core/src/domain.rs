//! Question/answer domain classification.
//!
//! Each domain has a keyword lexicon split into topic nouns (which can name
//! the subject of a template, e.g. "the database") and cues (which only add
//! weight, e.g. "debugged"). Sources are scored with per-source weights and
//! the highest scoring domain wins; ties go to the first declared domain.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interview question domains, in tie-breaking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Technical,
    Leadership,
    Conflict,
    Deadline,
    Project,
    General,
}

impl Domain {
    /// Domains with a keyword lexicon, in declared order.
    pub const CLASSIFIED: [Domain; 5] = [
        Domain::Technical,
        Domain::Leadership,
        Domain::Conflict,
        Domain::Deadline,
        Domain::Project,
    ];

    /// Topic used when no topic noun is found.
    pub fn default_topic(&self) -> &'static str {
        match self {
            Domain::Technical => "system",
            Domain::Leadership => "team",
            Domain::Conflict => "colleague",
            Domain::Deadline => "deadline",
            Domain::Project => "project",
            Domain::General => "challenge",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Technical => "technical",
            Domain::Leadership => "leadership",
            Domain::Conflict => "conflict",
            Domain::Deadline => "deadline",
            Domain::Project => "project",
            Domain::General => "general",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct Lexicon {
    domain: Domain,
    topics: Regex,
    cues: Regex,
}

impl Lexicon {
    fn new(domain: Domain, topics: &[&str], cues: &[&str]) -> Self {
        Self {
            domain,
            topics: Regex::new(&format!(r"(?i)\b({})(?:s|es)?\b", topics.join("|"))).unwrap(),
            cues: Regex::new(&format!(r"(?i)\b(?:{})\b", cues.join("|"))).unwrap(),
        }
    }
}

lazy_static! {
    static ref LEXICONS: Vec<Lexicon> = vec![
        Lexicon::new(
            Domain::Technical,
            &["system", "bug", "code", "codebase", "database", "server", "api", "website", "app", "service",
              "pipeline", "deployment", "infrastructure", "logging", "migration", "architecture", "query"],
            &["technical", r"debug\w*", r"crash\w*", "latency", "outage", "errors?", r"fix\w*", r"deploy\w*",
              "software", "performance", "scalab\\w*", "regression"],
        ),
        Lexicon::new(
            Domain::Leadership,
            &["team", "squad", "department", "group", "mentee", "direct report"],
            &["lead", "led", "leading", "leadership", r"mentor\w*", r"manag\w*", r"motivat\w*",
              r"delegat\w*", r"coach\w*", "hired?", r"onboard\w*", "vision"],
        ),
        Lexicon::new(
            Domain::Conflict,
            &["colleague", "coworker", "co-worker", "teammate", "stakeholder", "client", "customer", "vendor", "peer"],
            &[r"conflict\w*", r"disagree\w*", "difficult", "tension", r"argu\w*", "disputes?", "friction",
              r"mediat\w*", r"compromis\w*", "pushback", "confront\\w*"],
        ),
        Lexicon::new(
            Domain::Deadline,
            &["deadline", "release", "launch", "deliverable", "milestone", "demo", "presentation", "report"],
            &["pressure", "urgent", "tight", "timeline", "schedule", "late", "on time", "crunch", "overtime",
              "time-sensitive", "short on time", "out of time", "against the clock"],
        ),
        Lexicon::new(
            Domain::Project,
            &["project", "initiative", "rollout", "product", "feature", "roadmap", "process", "program"],
            &["scope", "requirements", "kickoff", r"plann\w*", "budget", "cross-functional", "improve\\w*"],
        ),
    ];
}

/// Result of classifying text into a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMatch {
    pub domain: Domain,

    /// Dominant topic noun, or the domain's default topic
    pub topic: String,

    /// Weighted keyword score of the winning domain
    pub score: usize,
}

impl DomainMatch {
    fn general() -> Self {
        Self {
            domain: Domain::General,
            topic: Domain::General.default_topic().to_string(),
            score: 0,
        }
    }
}

/// Weighted topic counts for one lexicon, in first-seen order.
fn tally(lexicon: &Lexicon, sources: &[(&str, usize)]) -> (usize, Vec<(String, usize)>) {
    let mut score = 0;
    let mut topics: Vec<(String, usize)> = Vec::new();

    for (text, weight) in sources {
        for caps in lexicon.topics.captures_iter(text) {
            score += weight;
            if let Some(word) = caps.get(1) {
                let word = word.as_str().to_lowercase();
                match topics.iter_mut().find(|(t, _)| *t == word) {
                    Some((_, count)) => *count += weight,
                    None => topics.push((word, *weight)),
                }
            }
        }
        score += weight * lexicon.cues.find_iter(text).count();
    }

    (score, topics)
}

/// Classify weighted text sources into a domain.
///
/// Each source is `(text, weight)`. A domain needs a weighted score of at
/// least `min_score` to win; otherwise the result is `General`.
pub fn classify(sources: &[(&str, usize)], min_score: usize) -> DomainMatch {
    let mut best: Option<(usize, &Lexicon, Vec<(String, usize)>)> = None;

    for lexicon in LEXICONS.iter() {
        let (score, topics) = tally(lexicon, sources);
        if best.as_ref().map_or(true, |(b, _, _)| score > *b) {
            best = Some((score, lexicon, topics));
        }
    }

    match best {
        Some((score, lexicon, topics)) if score > 0 && score >= min_score => {
            // Highest weighted topic; earliest seen on ties.
            let topic = topics
                .iter()
                .fold(None::<&(String, usize)>, |acc, t| match acc {
                    Some(a) if a.1 >= t.1 => Some(a),
                    _ => Some(t),
                })
                .map(|(t, _)| t.clone())
                .unwrap_or_else(|| lexicon.domain.default_topic().to_string());

            DomainMatch {
                domain: lexicon.domain,
                topic,
                score,
            }
        }
        _ => DomainMatch::general(),
    }
}
