//! Rubric parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_rubric_schema;

/// Errors that can occur when loading a rubric.
#[derive(Error, Debug)]
pub enum RubricError {
    #[error("Failed to read rubric file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rubric does not match schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Invalid rubric: {0}")]
    Invalid(String),
}

/// Input bounds applied before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Answers longer than this many characters are truncated
    pub max_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_chars: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SituationConfig {
    /// Distinct strong markers needed for full credit
    pub full_marker_count: usize,

    /// Whether vague scene-setting earns partial credit
    pub credit_vague_context: bool,
}

impl Default for SituationConfig {
    fn default() -> Self {
        Self {
            full_marker_count: 2,
            credit_vague_context: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Whether purpose clauses without first-person framing earn partial credit
    pub credit_implicit_objective: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            credit_implicit_objective: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionConfig {
    /// Distinct active verb stems needed for full credit
    pub full_verb_count: usize,

    /// Whether "worked on"/"helped" phrasing earns partial credit
    pub credit_generic_action: bool,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            full_verb_count: 2,
            credit_generic_action: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultConfig {
    /// Allow the metric to sit outside the outcome sentence
    pub metric_anywhere: bool,

    /// Score for a metric with no outcome framing (0 or 1)
    pub metric_without_outcome_score: u8,
}

impl Default for ResultConfig {
    fn default() -> Self {
        Self {
            metric_anywhere: false,
            metric_without_outcome_score: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Soft word budget for the rewritten answer
    pub max_words: usize,

    /// Original totals at or above this are polished rather than restructured
    pub polish_threshold: u8,

    /// Sentences lifted into the Situation, Task and Result segments
    pub context_sentences: usize,

    /// Sentences lifted into the Action segment
    pub action_sentences: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_words: 225,
            polish_threshold: 6,
            context_sentences: 2,
            action_sentences: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowupConfig {
    /// Number of follow-up questions, clamped to 3..=5
    pub count: usize,

    /// Weighted keyword score a domain needs to win classification
    pub min_domain_score: usize,
}

impl Default for FollowupConfig {
    fn default() -> Self {
        Self {
            count: 5,
            min_domain_score: 2,
        }
    }
}

impl FollowupConfig {
    pub const MIN_COUNT: usize = 3;
    pub const MAX_COUNT: usize = 5;

    /// The configured count inside the allowed range.
    pub fn effective_count(&self) -> usize {
        self.count.clamp(Self::MIN_COUNT, Self::MAX_COUNT)
    }
}

/// Tunable thresholds for evaluation, rewriting and follow-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rubric {
    /// Short identifier, also part of the runtime cache key
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub input: InputConfig,
    pub situation: SituationConfig,
    pub task: TaskConfig,
    pub action: ActionConfig,
    pub result: ResultConfig,
    pub rewrite: RewriteConfig,
    pub followups: FollowupConfig,
}

impl Default for Rubric {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            description: None,
            input: InputConfig::default(),
            situation: SituationConfig::default(),
            task: TaskConfig::default(),
            action: ActionConfig::default(),
            result: ResultConfig::default(),
            rewrite: RewriteConfig::default(),
            followups: FollowupConfig::default(),
        }
    }
}

impl Rubric {
    /// Parse a rubric from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RubricError> {
        if yaml.trim().is_empty() {
            return Self::from_value(serde_json::Value::Null);
        }
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a rubric from JSON string.
    pub fn from_json(json: &str) -> Result<Self, RubricError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a rubric from a file, choosing the format by extension.
    ///
    /// `.json` files are read as JSON; anything else as YAML.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Serialize the rubric as YAML.
    pub fn to_yaml(&self) -> Result<String, RubricError> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, RubricError> {
        // An empty document means "all defaults".
        let value = if value.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            value
        };

        validate_rubric_schema(&value).map_err(RubricError::Schema)?;

        let rubric: Rubric = serde_json::from_value(value)?;
        rubric.validate()?;

        tracing::debug!(rubric = %rubric.name, "Loaded rubric");
        Ok(rubric)
    }

    /// Check constraints the schema cannot express.
    pub fn validate(&self) -> Result<(), RubricError> {
        if self.name.trim().is_empty() {
            return Err(RubricError::Invalid("name must not be empty".to_string()));
        }

        if self.situation.full_marker_count == 0 || self.situation.full_marker_count > 3 {
            return Err(RubricError::Invalid(format!(
                "situation.full_marker_count must be 1..=3, got {}",
                self.situation.full_marker_count
            )));
        }

        if self.action.full_verb_count == 0 {
            return Err(RubricError::Invalid(
                "action.full_verb_count must be at least 1".to_string(),
            ));
        }

        if self.result.metric_without_outcome_score > 1 {
            return Err(RubricError::Invalid(format!(
                "result.metric_without_outcome_score must be 0 or 1, got {}",
                self.result.metric_without_outcome_score
            )));
        }

        if self.rewrite.context_sentences == 0 || self.rewrite.action_sentences == 0 {
            return Err(RubricError::Invalid(
                "rewrite sentence caps must be at least 1".to_string(),
            ));
        }

        // Four one-sentence segments must still fit.
        if self.rewrite.max_words < 40 {
            return Err(RubricError::Invalid(format!(
                "rewrite.max_words must be at least 40, got {}",
                self.rewrite.max_words
            )));
        }

        if self.input.max_chars == 0 {
            return Err(RubricError::Invalid("input.max_chars must be positive".to_string()));
        }

        Ok(())
    }
}
