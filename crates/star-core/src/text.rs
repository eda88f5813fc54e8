//! Input normalization and sentence segmentation.
//!
//! The engine never rejects input. Undecodable bytes and control characters
//! are stripped, and overlong answers are cut on a char boundary.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SPACE_RUNS: Regex = Regex::new(r"[ \t]{2,}").unwrap();

    /// Sentence terminators followed by whitespace or end of text, or a line break.
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]+(?:\s+|$)|\n+").unwrap();

    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'%$.-]*").unwrap();
}

/// A sentence of the normalized answer with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Decode raw bytes, dropping anything that is not valid UTF-8.
pub fn normalize_bytes(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Strip control characters, collapse space runs and trim.
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    SPACE_RUNS.replace_all(cleaned.trim(), " ").into_owned()
}

/// Cut `input` to at most `max_chars` characters.
///
/// Returns the (possibly shortened) text and whether anything was dropped.
pub fn truncate_chars(input: &str, max_chars: usize) -> (&str, bool) {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&input[..byte_idx], true),
        None => (input, false),
    }
}

/// Normalize and bound an answer before analysis.
pub fn prepare(input: &str, max_chars: usize) -> String {
    let normalized = normalize(input);
    let (bounded, truncated) = truncate_chars(&normalized, max_chars);
    if truncated {
        tracing::debug!(
            original_chars = normalized.chars().count(),
            max_chars,
            "Answer truncated before analysis"
        );
    }
    bounded.to_string()
}

/// Split text into sentences, keeping byte spans into the original.
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut result = Vec::new();
    let mut cursor = 0;

    let mut push = |start: usize, end: usize| {
        let raw = &text[start..end];
        let trimmed_start = start + (raw.len() - raw.trim_start().len());
        let trimmed_end = end - (raw.len() - raw.trim_end().len());
        if trimmed_start < trimmed_end {
            result.push(Sentence {
                text: &text[trimmed_start..trimmed_end],
                start: trimmed_start,
                end: trimmed_end,
            });
        }
    };

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Keep the terminator with its sentence, drop the trailing whitespace.
        let terminator_len = boundary.as_str().trim_end().len();
        push(cursor, boundary.start() + terminator_len);
        cursor = boundary.end();
    }
    if cursor < text.len() {
        push(cursor, text.len());
    }

    result
}

/// Count words in text.
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Uppercase the first letter and make sure the sentence is terminated.
pub fn finish_sentence(sentence: &str) -> String {
    let trimmed = sentence.trim().trim_end_matches([',', ';', ':', '-']);
    let mut chars = trimmed.chars();
    let mut out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => return String::new(),
    };
    if !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bytes_drops_invalid() {
        let bytes = b"I led \xff\xfe the team";
        assert_eq!(normalize_bytes(bytes), "I led  the team");
    }

    #[test]
    fn test_normalize_strips_controls() {
        assert_eq!(normalize("  I\u{0007} fixed   it\r\nthen left  "), "I fixed it\n\nthen left");
        assert_eq!(normalize("\u{0000}\u{001b}"), "");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let (cut, truncated) = truncate_chars("héllo wörld", 4);
        assert_eq!(cut, "héll");
        assert!(truncated);

        let (kept, truncated) = truncate_chars("short", 10);
        assert_eq!(kept, "short");
        assert!(!truncated);
    }

    #[test]
    fn test_sentences_keep_decimal_numbers() {
        let text = "Uptime hit 99.9% last month. We were thrilled! Next";
        let parts: Vec<&str> = sentences(text).iter().map(|s| s.text).collect();
        assert_eq!(parts, vec!["Uptime hit 99.9% last month.", "We were thrilled!", "Next"]);
    }

    #[test]
    fn test_sentence_spans_index_into_source() {
        let text = "First one.  Second one?\nThird";
        for sentence in sentences(text) {
            assert_eq!(&text[sentence.start..sentence.end], sentence.text);
        }
    }

    #[test]
    fn test_sentences_of_empty_text() {
        assert!(sentences("").is_empty());
        assert!(sentences("   ").is_empty());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("I cut costs by 15% in Q3."), 7);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_finish_sentence() {
        assert_eq!(finish_sentence("we shipped it,"), "We shipped it.");
        assert_eq!(finish_sentence("Done!"), "Done!");
        assert_eq!(finish_sentence("   "), "");
    }
}
