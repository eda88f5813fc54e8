//! Rubric configuration.
//!
//! Scoring thresholds, rewrite budgets and follow-up settings live in a
//! `Rubric`, loaded from YAML or JSON and validated against an embedded JSON
//! Schema. `Rubric::default()` is the built-in rubric.

mod parser;
mod schema;

pub use parser::{
    ActionConfig, FollowupConfig, InputConfig, ResultConfig, RewriteConfig, Rubric, RubricError,
    SituationConfig, TaskConfig,
};
pub use schema::{rubric_schema, validate_rubric_schema};
