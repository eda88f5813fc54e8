//! Prompts for generative enhancement.
//!
//! System prompts are static so providers can cache them. Everything that
//! varies per call (question, answer, draft) goes into the user message.

use star_core::StarEvaluation;
use std::fmt::Write as _;

use crate::Operation;

/// System prompt for polishing a STAR rewrite.
pub const REWRITE_SYSTEM_PROMPT: &str = r#"
You are an interview coach polishing a candidate's behavioral interview answer.

You receive the interview question, the candidate's original answer, and a
rule-based STAR draft built from that answer. Improve the wording of the draft.

## Output Format
Exactly four paragraphs, in this order, separated by blank lines:

**Situation:** ...

**Task:** ...

**Action:** ...

**Result:** ...

Return nothing before or after the four paragraphs.

## Constraints
- Keep every fact from the original answer. Do not invent new facts.
- Never invent numbers. Only use numbers that appear in the original answer.
  Where a metric is missing, keep a bracketed placeholder such as [X%] or
  [Y hours] for the candidate to fill in.
- Write in the first person, active voice, past tense.
- Stay within the word limit given in the request.
"#;

/// System prompt for recruiter follow-up questions.
pub const FOLLOWUP_SYSTEM_PROMPT: &str = r#"
You are a recruiter preparing follow-up questions after a candidate's
behavioral interview answer.

## Output Format
One question per line. No numbering, no bullets, no blank lines, no other text.
Every line ends with a question mark.

## Constraints
- Probe the specific actions and results the candidate described.
- Ask how outcomes were measured when the answer has no numbers.
- Each question must stand on its own and be answerable in under two minutes.
"#;

pub fn system_prompt(operation: Operation) -> &'static str {
    match operation {
        Operation::Rewrite => REWRITE_SYSTEM_PROMPT,
        Operation::Followups => FOLLOWUP_SYSTEM_PROMPT,
    }
}

/// User message for `Operation::Rewrite`.
pub fn rewrite_user_prompt(
    question: &str,
    answer: &str,
    draft: &str,
    evaluation: &StarEvaluation,
    max_words: usize,
) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "## Interview Question\n{}\n", or_none(question));
    let _ = writeln!(prompt, "## Original Answer\n{}\n", or_none(answer));
    let _ = writeln!(prompt, "## Rule-Based Evaluation");
    for (component, score) in evaluation.components() {
        let _ = writeln!(prompt, "- {}: {}/2. {}", component, score.score, score.feedback);
    }
    let _ = writeln!(prompt, "\n## Draft\n{}\n", draft);
    let _ = write!(
        prompt,
        "Polish the draft. Use at most {} words across the four paragraphs.",
        max_words
    );
    prompt
}

/// User message for `Operation::Followups`.
pub fn followup_user_prompt(question: &str, answer: &str, count: usize) -> String {
    format!(
        "## Interview Question\n{}\n\n## Candidate Answer\n{}\n\nWrite exactly {} follow-up questions.",
        or_none(question),
        or_none(answer),
        count
    )
}

fn or_none(text: &str) -> &str {
    if text.trim().is_empty() {
        "(none given)"
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompts_name_their_format() {
        assert!(system_prompt(Operation::Rewrite).contains("**Result:**"));
        assert!(system_prompt(Operation::Followups).contains("question mark"));
    }

    #[test]
    fn test_rewrite_prompt_carries_inputs() {
        let evaluation = star_core::evaluate("I fixed a bug by improving logging");
        let prompt = rewrite_user_prompt(
            "Tell me about a bug",
            "I fixed a bug by improving logging",
            "**Situation:** draft",
            &evaluation,
            225,
        );
        assert!(prompt.contains("Tell me about a bug"));
        assert!(prompt.contains("- Task: 0/2."));
        assert!(prompt.contains("**Situation:** draft"));
        assert!(prompt.contains("at most 225 words"));
    }

    #[test]
    fn test_empty_inputs_are_marked() {
        let prompt = followup_user_prompt("", "  ", 4);
        assert_eq!(prompt.matches("(none given)").count(), 2);
        assert!(prompt.ends_with("exactly 4 follow-up questions."));
    }
}
