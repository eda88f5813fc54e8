//! Shared detection patterns for STAR signals.
//!
//! Each pattern backs one small predicate. Scorers compose the predicates
//! into per-component policy; the rewriter and follow-up generator reuse
//! the same predicates so detection lives in exactly one place.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // =========================================================================
    // SITUATION
    // =========================================================================

    /// Years, quarters, relative periods and "when I was" framing
    pub static ref TEMPORAL_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:(?:19|20)\d{2}|q[1-4]|(?:last|this|that|previous|next|the following)\s+(?:year|quarter|month|week|summer|spring|fall|autumn|winter|sprint|semester)|(?:a few|several|two|three|\d+)\s+(?:years|months|weeks)\s+ago|(?:january|february|april|june|july|august|september|october|november|december)|(?:when|while)\s+i\s+(?:was|worked|joined)|at the time|during my (?:time|internship|first))\b"
    ).unwrap();

    /// Capitalized organization after "at/for/with/joined", or a named team.
    /// Case-sensitive on purpose: the capital letter is the signal.
    pub static ref NAMED_ORGANIZATION_PATTERN: Regex = Regex::new(
        r"\b(?:(?:[Aa]t|[Ff]or|[Ww]ith|[Jj]oined)\s+[A-Z][A-Za-z0-9&'.-]+(?:\s+[A-Z][A-Za-z0-9&'.-]+)*|(?:[Tt]he|[Oo]ur|[Mm]y)\s+[A-Z][A-Za-z0-9&-]+\s+(?:team|squad|group|department|org))\b"
    ).unwrap();

    /// Explicit problem statements
    pub static ref PROBLEM_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:problems?|issues?|challenges?|bugs?|outages?|incidents?|regressions?|crash(?:ed|es|ing)?|fail(?:ed|ing|ures?)|broke|broken|downtime|went down|dropp(?:ed|ing)|declin(?:e|ed|ing)|slow(?:ed|er|down)?|bottlenecks?|complain(?:t|ts|ed)|delay(?:ed|s)?|conflicts?|disagree(?:ment|d)|deadlines?|risks?|backlog|churn|escalations?|behind schedule|over budget|errors?)\b"
    ).unwrap();

    /// Scene-setting that names no specifics
    pub static ref VAGUE_CONTEXT_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:once|one time|there was|we had|a project|a situation|at work|previous (?:job|role|company|position)|a (?:team|client|company|customer)|(?:my|our|the) (?:team|company|department|organization|client|manager|boss|project|job)|when|where)\b"
    ).unwrap();

    // =========================================================================
    // TASK
    // =========================================================================

    /// First-person objective framing
    pub static ref OBJECTIVE_PHRASE_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:my (?:main |primary |specific |key )?(?:goal|objective|task|job|role|responsibility|mission|aim|assignment|mandate) (?:was|is|became|involved)|i was (?:responsible|accountable|tasked|asked|assigned|charged|brought in|hired|in charge|the one responsible|expected)|i (?:needed|had|wanted|aimed|set out) to|i (?:owned|took ownership of|volunteered to)|it was (?:my job|my responsibility|up to me)|i took (?:on|charge of|the lead on))\b"
    ).unwrap();

    /// Purpose clauses and objective vocabulary without first-person framing
    pub static ref IMPLICIT_OBJECTIVE_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:in order to|so that|so we could|needed to|had to|wanted to|the (?:goal|objective|aim|task|priority|mission) (?:was|is)|goals?|objectives?|responsib\w*|tasked|deliverables?|requirements?)\b"
    ).unwrap();

    // =========================================================================
    // ACTION
    // =========================================================================

    /// Concrete action verbs; the `stem` group is canonicalized for counting
    pub static ref ACTION_VERB_PATTERN: Regex = Regex::new(
        r"(?i)\b(?P<stem>analy[sz]|architect|audit|automat|benchmark|build|built|rebuilt|coach|collaborat|communicat|conduct|consolidat|coordinat|creat|debugg?|decid|delegat|deliver|deploy|design|develop|diagnos|document|draft|drove|driv|establish|facilitat|fix|gather|identif(?:y|ie)|implement|improv|instrument|interview|introduc|investigat|launch|led|lead|mediat|mentor|migrat|monitor|negotiat|optimi[sz]|organi[sz]|persuad|pilot|plann?|prioriti[sz]|profil|propos|prototyp|redesign|refactor|reorgani[sz]|reproduc|research|resolv|restructur|review|rewrote|rewrit|schedul|set up|shipp?|simplif(?:y|ie)|spearhead|standardi[sz]|streamlin|test|track|train|troubleshoot|updat|wrote|writ)(?:ing|es|ed|e|d|s)?\b"
    ).unwrap();

    /// Generic or vague action phrasing
    pub static ref GENERIC_ACTION_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:worked on|work on|helped|help out|handled|dealt with|took care of|was involved|got involved|contributed|participated|did|tried|made sure|looked into|figured (?:it )?out)\b"
    ).unwrap();

    // =========================================================================
    // RESULT
    // =========================================================================

    /// Digit-bearing quantities: percentages, multipliers, money, time, counts, ratios
    pub static ref METRIC_PATTERN: Regex = Regex::new(
        r"(?i)(?:\d+(?:[.,]\d+)?\s*(?:%|percent\b|x\b|times\b|k\b|ms\b|(?:milli)?seconds?\b|secs?\b|minutes?\b|mins?\b|hours?\b|hrs?\b|days?\b|weeks?\b|months?\b|years?\b|users?\b|customers?\b|clients?\b|people\b|engineers?\b|members?\b|tickets?\b|bugs?\b|incidents?\b|requests?\b|points?\b|dollars?\b|deals?\b|sales\b|leads\b|projects?\b|releases?\b|stars?\b)|[$€£]\s?\d[\d,.]*(?:\s?(?:k|m|million|billion|thousand)\b)?|\b\d+(?:\.\d+)?\s*/\s*\d+\b|\bfrom\s+\d[\d,.]*\s*\S*\s+to\s+\d)"
    ).unwrap();

    /// Bracketed placeholder metrics such as `[X%]` or `[Y hours]`
    pub static ref PLACEHOLDER_METRIC_PATTERN: Regex = Regex::new(
        r"\[[XYZN]\b[^\]]*\]"
    ).unwrap();

    /// Outcome framing, with or without numbers
    pub static ref OUTCOME_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:improv(?:e|ed|es|ing|ement|ements)|increas(?:e|ed|es|ing)|decreas(?:e|ed|es|ing)|reduc(?:e|ed|es|ing|tion)|sav(?:e|ed|es|ing|ings)|achiev(?:e|ed|es|ing)|delivered|recover(?:ed|y)|restor(?:ed|ing)|result(?:ed|s)?|outcomes?|impact|lift|grew|grow(?:th|n)|boost(?:ed)?|cut|success|successful|successfully|succeeded|resolved|won|earned|exceeded|surpassed|praised|recogni[sz]ed|promoted|adopted|on time|ahead of schedule|as a result|in the end|ended up|led to|which meant|lower(?:ed)?|higher|faster|shorter|fewer|more reliable|stabili[sz]ed|eliminat(?:ed|ing)|prevented|avoided|retained|satisf(?:ied|action)|feedback)\b"
    ).unwrap();
}

/// Auxiliaries that turn a following participle into passive voice.
const PASSIVE_AUXILIARIES: &[&str] = &["was", "were", "been", "being", "is", "are", "got", "get", "gets"];

/// Irregular participles the action pattern knows about.
const IRREGULAR_PARTICIPLES: &[&str] = &["built", "rebuilt", "led", "set up"];

/// A concrete action verb occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionVerbMatch {
    /// Canonical stem used for distinct counting
    pub stem: String,

    /// The word as written
    pub word: String,

    pub start: usize,
    pub end: usize,

    /// Whether the verb sits in a passive construction
    pub passive: bool,
}

fn spans(pattern: &Regex, content: &str) -> Vec<(usize, usize)> {
    pattern.find_iter(content).map(|m| (m.start(), m.end())).collect()
}

/// Check if content contains a temporal reference.
pub fn has_temporal_marker(content: &str) -> bool {
    TEMPORAL_PATTERN.is_match(content)
}

/// Check if content names an organization or team.
pub fn has_named_organization(content: &str) -> bool {
    NAMED_ORGANIZATION_PATTERN.is_match(content)
}

/// Check if content states a problem explicitly.
pub fn has_problem_statement(content: &str) -> bool {
    PROBLEM_PATTERN.is_match(content)
}

/// Check if content sets a scene without specifics.
pub fn has_vague_context(content: &str) -> bool {
    VAGUE_CONTEXT_PATTERN.is_match(content)
}

/// Check if content frames a first-person objective.
pub fn has_objective_phrase(content: &str) -> bool {
    OBJECTIVE_PHRASE_PATTERN.is_match(content)
}

/// Check if an objective can be inferred from purpose clauses.
pub fn has_implicit_objective(content: &str) -> bool {
    IMPLICIT_OBJECTIVE_PATTERN.is_match(content)
}

/// Check if content contains generic action phrasing.
pub fn has_generic_action(content: &str) -> bool {
    GENERIC_ACTION_PATTERN.is_match(content)
}

/// Check if content contains a digit-bearing metric.
pub fn has_quantifiable_metric(content: &str) -> bool {
    METRIC_PATTERN.is_match(content)
}

/// Check if content contains a bracketed placeholder metric.
pub fn has_placeholder_metric(content: &str) -> bool {
    PLACEHOLDER_METRIC_PATTERN.is_match(content)
}

/// Check if content describes an outcome.
pub fn has_outcome_language(content: &str) -> bool {
    OUTCOME_PATTERN.is_match(content)
}

pub fn temporal_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&TEMPORAL_PATTERN, content)
}

pub fn organization_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&NAMED_ORGANIZATION_PATTERN, content)
}

pub fn problem_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&PROBLEM_PATTERN, content)
}

pub fn vague_context_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&VAGUE_CONTEXT_PATTERN, content)
}

pub fn objective_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&OBJECTIVE_PHRASE_PATTERN, content)
}

pub fn implicit_objective_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&IMPLICIT_OBJECTIVE_PATTERN, content)
}

pub fn generic_action_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&GENERIC_ACTION_PATTERN, content)
}

pub fn metric_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&METRIC_PATTERN, content)
}

pub fn outcome_spans(content: &str) -> Vec<(usize, usize)> {
    spans(&OUTCOME_PATTERN, content)
}

/// Map a matched stem to the key used for distinct counting.
pub fn canonical_stem(stem: &str) -> String {
    let lower = stem.to_lowercase();
    let lemma = match lower.as_str() {
        "led" => "lead",
        "built" | "rebuilt" => "build",
        "drove" => "drive",
        "wrote" => "write",
        "rewrote" => "rewrite",
        other => other,
    };
    lemma.chars().take(5).collect()
}

fn is_participle(word: &str) -> bool {
    let lower = word.to_lowercase();
    lower.ends_with("ed") || IRREGULAR_PARTICIPLES.contains(&lower.as_str())
}

/// Whether the verb starting at `start` is preceded by a passive auxiliary.
fn preceded_by_auxiliary(content: &str, start: usize) -> bool {
    let mut words = content[..start].split_whitespace().rev();
    let mut previous = words.next();

    // Skip one adverb: "was quickly fixed"
    if previous.is_some_and(|w| w.to_lowercase().ends_with("ly")) {
        previous = words.next();
    }

    previous
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .is_some_and(|w| PASSIVE_AUXILIARIES.contains(&w.as_str()))
}

/// Find every concrete action verb with its canonical stem and voice.
pub fn find_action_verbs(content: &str) -> Vec<ActionVerbMatch> {
    ACTION_VERB_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let stem = caps.name("stem")?;
            let word = whole.as_str();
            let passive = is_participle(word) && preceded_by_auxiliary(content, whole.start());
            Some(ActionVerbMatch {
                stem: canonical_stem(stem.as_str()),
                word: word.to_string(),
                start: whole.start(),
                end: whole.end(),
                passive,
            })
        })
        .collect()
}

/// Count distinct action verbs in active voice.
pub fn count_action_verbs(content: &str) -> usize {
    let mut stems: Vec<String> = find_action_verbs(content)
        .into_iter()
        .filter(|m| !m.passive)
        .map(|m| m.stem)
        .collect();
    stems.sort();
    stems.dedup();
    stems.len()
}

/// Check if every action verb in content is passive.
///
/// Returns false when there are no action verbs at all.
pub fn is_entirely_passive(content: &str) -> bool {
    let verbs = find_action_verbs(content);
    !verbs.is_empty() && verbs.iter().all(|m| m.passive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporal_detection() {
        assert!(has_temporal_marker("At Acme Corp in 2022 we shipped"));
        assert!(has_temporal_marker("Last quarter our sales slipped"));
        assert!(has_temporal_marker("When I was at my first job"));
        assert!(has_temporal_marker("two years ago"));
        assert!(!has_temporal_marker("I fixed a bug by improving logging"));
    }

    #[test]
    fn test_named_organization_detection() {
        assert!(has_named_organization("At Acme Corp, things broke"));
        assert!(has_named_organization("I was working for Globex on payments"));
        assert!(has_named_organization("Our Payments team owned checkout"));
        assert!(!has_named_organization("at my company we had issues"));
        assert!(!has_named_organization("I fixed a bug"));
    }

    #[test]
    fn test_problem_detection() {
        assert!(has_problem_statement("conversion dropped 15%"));
        assert!(has_problem_statement("a nasty regression in checkout"));
        assert!(has_problem_statement("I fixed a bug"));
        assert!(!has_problem_statement("I like pancakes"));
    }

    #[test]
    fn test_vague_context_detection() {
        assert!(has_vague_context("Once at work we had a project"));
        assert!(has_vague_context("my team was small"));
        assert!(!has_vague_context("I fixed a bug by improving logging"));
    }

    #[test]
    fn test_objective_phrase_detection() {
        assert!(has_objective_phrase("I was responsible for diagnosing the regression"));
        assert!(has_objective_phrase("My goal was to cut latency"));
        assert!(has_objective_phrase("I was tasked with the migration"));
        assert!(has_objective_phrase("it was up to me to decide"));
        assert!(!has_objective_phrase("The team fixed a bug"));
    }

    #[test]
    fn test_implicit_objective_detection() {
        assert!(has_implicit_objective("we refactored the module so that releases were safer"));
        assert!(has_implicit_objective("the goal was stability"));
        assert!(!has_implicit_objective("I fixed a bug by improving logging"));
    }

    #[test]
    fn test_action_verbs_distinct_stems() {
        assert_eq!(count_action_verbs("I fixed a bug by improving logging"), 2);
        assert_eq!(count_action_verbs("I improved it, then improved it again"), 1);
        assert_eq!(
            count_action_verbs("I audited the logs, identified a timeout bug, and shipped a fix"),
            4
        );
        assert_eq!(count_action_verbs("I led the rollout, then I was leading it again"), 1);
        assert_eq!(count_action_verbs("We talked about things"), 0);
    }

    #[test]
    fn test_action_verbs_ignore_nouns() {
        assert_eq!(count_action_verbs("The improvement was an automation"), 0);
        assert_eq!(count_action_verbs("A new fixture"), 0);
    }

    #[test]
    fn test_passive_voice_detection() {
        assert!(is_entirely_passive("The bug was fixed and the service was quickly redesigned"));
        assert!(!is_entirely_passive("I fixed the bug"));
        assert!(!is_entirely_passive("Nothing happened"));
        assert_eq!(count_action_verbs("The bug was fixed"), 0);
    }

    #[test]
    fn test_generic_action_detection() {
        assert!(has_generic_action("I worked on the backend"));
        assert!(has_generic_action("I helped where I could"));
        assert!(!has_generic_action("I audited the logs"));
    }

    #[test]
    fn test_metric_detection() {
        assert!(has_quantifiable_metric("a 15% lift"));
        assert!(has_quantifiable_metric("shipped within 48 hours"));
        assert!(has_quantifiable_metric("saved $50,000"));
        assert!(has_quantifiable_metric("onboarded 300 users"));
        assert!(has_quantifiable_metric("went from 4 hours to 30 minutes"));
        assert!(has_quantifiable_metric("a 3x speedup"));
        assert!(!has_quantifiable_metric("In 2022 things changed"));
        assert!(!has_quantifiable_metric("a huge improvement in reliability"));
    }

    #[test]
    fn test_placeholder_metric_detection() {
        assert!(has_placeholder_metric("improved throughput by [X%]"));
        assert!(has_placeholder_metric("saving [Y hours] per week"));
        assert!(!has_placeholder_metric("improved throughput by 20%"));
        assert!(!has_placeholder_metric("see [docs]"));
    }

    #[test]
    fn test_outcome_detection() {
        assert!(has_outcome_language("Conversion recovered to baseline"));
        assert!(has_outcome_language("This improved team morale"));
        assert!(has_outcome_language("As a result, customers stayed"));
        assert!(!has_outcome_language("I wrote some code"));
    }

    #[test]
    fn test_spans_point_at_matches() {
        let text = "In 2022 we shipped";
        let (start, end) = temporal_spans(text)[0];
        assert_eq!(&text[start..end], "2022");
    }

    #[test]
    fn test_canonical_stem() {
        assert_eq!(canonical_stem("led"), canonical_stem("lead"));
        assert_eq!(canonical_stem("identifie"), canonical_stem("identify"));
        assert_eq!(canonical_stem("Built"), "build");
    }
}
