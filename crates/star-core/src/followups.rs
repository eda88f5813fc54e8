//! Recruiter-style follow-up question generation.
//!
//! Candidates are emitted in priority order and then de-duplicated:
//! 1. A probe anchored on the first active action verb in the answer
//! 2. A metric probe when the answer has no quantified metric
//! 3. Templates for the dominant domain, filled with its topic
//! 4. Generic templates

use crate::domain::{classify, Domain};
use crate::rubric::Rubric;
use crate::signals::patterns::{find_action_verbs, has_quantifiable_metric};
use crate::text;

const METRIC_PROBE: &str = "How did you measure the impact, and what numbers can you share?";

const GENERIC_FOLLOWUPS: [&str; 5] = [
    "What specific challenges did you encounter during this process, and how did you overcome them?",
    "How did you measure the success of your solution, and what metrics did you track?",
    "If you had to approach this situation again, what would you do differently?",
    "How did this experience influence your approach to similar challenges in the future?",
    "What feedback did you receive from stakeholders, and how did you incorporate it?",
];

const IRREGULAR_PAST: &[&str] = &["led", "built", "rebuilt", "drove", "wrote", "rewrote", "set up"];

fn domain_followups(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Technical => &[
            "How did you confirm the root cause of the {topic} issue before changing anything?",
            "What tools or technologies did you rely on while working on the {topic}?",
            "How did you make sure the {topic} solution was scalable and maintainable?",
        ],
        Domain::Leadership => &[
            "How did you handle resistance or conflicting opinions within the {topic}?",
            "What strategies did you use to motivate and align the {topic}?",
            "How did you decide what to delegate and what to own yourself?",
        ],
        Domain::Conflict => &[
            "How did you open the conversation with the {topic}?",
            "What did you do to understand the {topic}'s point of view?",
            "How is your working relationship with the {topic} today?",
        ],
        Domain::Deadline => &[
            "How did you prioritize tasks when time before the {topic} was limited?",
            "What contingency plan did you have if the {topic} slipped?",
            "What did you decide to cut or defer to make the {topic}?",
        ],
        Domain::Project => &[
            "How did you keep stakeholders informed as the {topic} progressed?",
            "What was the biggest risk to the {topic}, and how did you manage it?",
            "How did you define success for the {topic} at the start?",
        ],
        Domain::General => &[],
    }
}

/// Probe built on an action verb as the candidate wrote it.
fn action_probe(word: &str) -> String {
    let word = word.to_lowercase();
    if word.ends_with("ed") || IRREGULAR_PAST.contains(&word.as_str()) {
        format!("You said you {}. Can you walk me through exactly how you did that?", word)
    } else if word.ends_with("ing") {
        format!("Can you walk me through what {} involved, step by step?", word)
    } else {
        format!("Can you walk me through how you approached \"{}\", step by step?", word)
    }
}

/// Generates follow-up questions under a rubric.
pub struct FollowupGenerator<'a> {
    rubric: &'a Rubric,
}

impl<'a> FollowupGenerator<'a> {
    pub fn new(rubric: &'a Rubric) -> Self {
        Self { rubric }
    }

    /// Produce between three and five follow-up questions.
    pub fn generate(&self, question: &str, answer: &str) -> Vec<String> {
        let max_chars = self.rubric.input.max_chars;
        let question = text::prepare(question, max_chars);
        let answer = text::prepare(answer, max_chars);

        let domain = classify(
            &[(answer.as_str(), 2), (question.as_str(), 1)],
            self.rubric.followups.min_domain_score,
        );

        let mut candidates: Vec<String> = Vec::new();

        if let Some(verb) = find_action_verbs(&answer).into_iter().find(|m| !m.passive) {
            candidates.push(action_probe(&verb.word));
        }

        if !has_quantifiable_metric(&answer) {
            candidates.push(METRIC_PROBE.to_string());
        }

        candidates.extend(
            domain_followups(domain.domain)
                .iter()
                .map(|t| t.replace("{topic}", &domain.topic)),
        );
        candidates.extend(GENERIC_FOLLOWUPS.iter().map(|s| s.to_string()));

        let mut followups: Vec<String> = Vec::new();
        for candidate in candidates {
            if !followups.contains(&candidate) {
                followups.push(candidate);
            }
        }
        followups.truncate(self.rubric.followups.effective_count());

        tracing::debug!(
            domain = %domain.domain,
            topic = %domain.topic,
            count = followups.len(),
            "Generated follow-up questions"
        );

        followups
    }
}
