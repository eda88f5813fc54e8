//! STAR segment rendering and parsing.

use serde::{Deserialize, Serialize};

use crate::text;
use crate::types::Component;

/// The four labeled segments of a rewritten answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarSegments {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

impl StarSegments {
    /// Segment text for a component.
    pub fn get(&self, component: Component) -> &str {
        match component {
            Component::Situation => &self.situation,
            Component::Task => &self.task,
            Component::Action => &self.action,
            Component::Result => &self.result,
        }
    }

    /// Render as `**Situation:** ...` blocks separated by blank lines.
    pub fn render(&self) -> String {
        Component::ALL
            .iter()
            .map(|c| format!("**{}:** {}", c.label(), self.get(*c)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Words across all four segments, labels excluded.
    pub fn word_count(&self) -> usize {
        Component::ALL
            .iter()
            .map(|c| text::word_count(self.get(*c)))
            .sum()
    }
}

fn marker(component: Component) -> String {
    format!("**{}:**", component.label())
}

/// Find the four labeled segments, in S -> T -> A -> R order.
///
/// Returns `None` when a label is missing, out of order, or has no content.
pub fn split_star_segments(text: &str) -> Option<StarSegments> {
    let mut bounds = Vec::with_capacity(4);
    let mut cursor = 0;

    for component in Component::ALL {
        let label = marker(component);
        let start = cursor + text.get(cursor..)?.find(&label)?;
        bounds.push((start, start + label.len()));
        cursor = start + label.len();
    }

    let mut parts = Vec::with_capacity(4);
    for (i, (_, content_start)) in bounds.iter().enumerate() {
        let content_end = bounds.get(i + 1).map_or(text.len(), |(next, _)| *next);
        let content = text[*content_start..content_end].trim();
        if content.is_empty() {
            return None;
        }
        parts.push(content.to_string());
    }

    let mut parts = parts.into_iter();
    Some(StarSegments {
        situation: parts.next()?,
        task: parts.next()?,
        action: parts.next()?,
        result: parts.next()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StarSegments {
        StarSegments {
            situation: "At Acme in 2022, checkout broke.".to_string(),
            task: "I was responsible for the fix.".to_string(),
            action: "I audited logs and shipped a patch.".to_string(),
            result: "Conversion recovered by 15%.".to_string(),
        }
    }

    #[test]
    fn test_render_layout() {
        let rendered = sample().render();
        assert!(rendered.starts_with("**Situation:** At Acme"));
        assert!(rendered.contains("\n\n**Task:** I was responsible"));
        assert!(rendered.contains("\n\n**Action:** "));
        assert!(rendered.ends_with("**Result:** Conversion recovered by 15%."));
    }

    #[test]
    fn test_split_recovers_segments() {
        let segments = sample();
        assert_eq!(split_star_segments(&segments.render()), Some(segments));
    }

    #[test]
    fn test_split_tolerates_surrounding_text() {
        let text = "Here you go:\n**Situation:** S.\n**Task:** T.\n**Action:** A.\n**Result:** R.\nGood luck";
        let segments = split_star_segments(text).unwrap();
        assert_eq!(segments.situation, "S.");
        assert_eq!(segments.result, "R.\nGood luck");
    }

    #[test]
    fn test_split_rejects_missing_or_empty() {
        assert!(split_star_segments("**Situation:** S.\n**Task:** T.\n**Result:** R.").is_none());
        assert!(split_star_segments("**Situation:** S.\n**Task:**\n**Action:** A.\n**Result:** R.").is_none());
        assert!(split_star_segments("").is_none());
    }

    #[test]
    fn test_split_rejects_wrong_order() {
        let text = "**Task:** T.\n**Situation:** S.\n**Action:** A.\n**Result:** R.";
        assert!(split_star_segments(text).is_none());
    }

    #[test]
    fn test_word_count_excludes_labels() {
        assert_eq!(sample().word_count(), 6 + 6 + 7 + 4);
    }
}
