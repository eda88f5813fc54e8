//! JSON Schema validation for rubric files.
//!
//! Rubrics are checked against `schema/rubric.schema.json`, which is embedded
//! at compile time and compiled once.

use std::sync::OnceLock;

const RUBRIC_SCHEMA_JSON: &str = include_str!("../../schema/rubric.schema.json");

static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn get_validator() -> Result<&'static jsonschema::Validator, String> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = serde_json::from_str(RUBRIC_SCHEMA_JSON)
            .map_err(|e| format!("Invalid schema JSON: {}", e))?;

        jsonschema::options()
            .build(&schema_value)
            .map_err(|e| format!("Failed to compile schema: {}", e))
    });

    result.as_ref().map_err(Clone::clone)
}

/// The embedded schema text, for tooling that wants to publish it.
pub fn rubric_schema() -> &'static str {
    RUBRIC_SCHEMA_JSON
}

/// Validate a rubric JSON value against the schema.
///
/// Returns every violation as "message at /instance/path".
pub fn validate_rubric_schema(rubric_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e])?;

    let errors: Vec<String> = validator
        .iter_errors(rubric_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(get_validator().is_ok());
    }

    #[test]
    fn test_empty_rubric_passes() {
        assert!(validate_rubric_schema(&serde_json::json!({})).is_ok());
    }

    #[test]
    fn test_full_rubric_passes() {
        let value = serde_json::json!({
            "name": "strict",
            "input": { "max_chars": 4000 },
            "situation": { "full_marker_count": 3, "credit_vague_context": true },
            "task": { "credit_implicit_objective": false },
            "action": { "full_verb_count": 3, "credit_generic_action": true },
            "result": { "metric_anywhere": false, "metric_without_outcome_score": 0 },
            "rewrite": { "max_words": 200, "polish_threshold": 7 },
            "followups": { "count": 4, "min_domain_score": 2 }
        });
        assert!(validate_rubric_schema(&value).is_ok());
    }

    #[test]
    fn test_out_of_range_threshold_fails() {
        let value = serde_json::json!({ "situation": { "full_marker_count": 5 } });
        let errors = validate_rubric_schema(&value).unwrap_err();
        assert!(errors.iter().any(|e| e.contains("/situation/full_marker_count")));
    }

    #[test]
    fn test_metric_without_outcome_score_is_enumerated() {
        let value = serde_json::json!({ "result": { "metric_without_outcome_score": 2 } });
        assert!(validate_rubric_schema(&value).is_err());
    }

    #[test]
    fn test_unknown_section_fails() {
        let value = serde_json::json!({ "scoring": {} });
        assert!(validate_rubric_schema(&value).is_err());
    }

    #[test]
    fn test_followup_count_bounds() {
        assert!(validate_rubric_schema(&serde_json::json!({ "followups": { "count": 2 } })).is_err());
        assert!(validate_rubric_schema(&serde_json::json!({ "followups": { "count": 6 } })).is_err());
        assert!(validate_rubric_schema(&serde_json::json!({ "followups": { "count": 3 } })).is_ok());
    }
}
