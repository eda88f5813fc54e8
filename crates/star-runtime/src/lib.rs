//! # star-runtime
//!
//! Optional model-assisted polishing for STAR Mentor.
//!
//! `star-core` is deterministic and never calls a model. This crate wraps it
//! in `EnhancedRewriter`, which asks an LLM to polish the rule-based rewrite
//! and follow-up questions, validates what comes back, and falls back to the
//! rule-based output on any failure. Callers always get a well-formed result.
//!
//! ## Example
//!
//! ```rust,ignore
//! use star_runtime::{EnhancedRewriter, RuntimeConfig};
//!
//! let config = RuntimeConfig::from_yaml("provider:\n  type: anthropic\n")?;
//! let rewriter = EnhancedRewriter::builder().config(config).build()?;
//!
//! let report = rewriter.rewrite("Tell me about a bug", "I fixed a bug by improving logging").await;
//! println!("{} ({:?})", report.output, report.source);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod agents;
pub mod cache;
pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod resilience;
pub mod validator;

#[cfg(test)]
mod testing;

pub use agents::{AgentError, Enhancement, EnhancementRequest, Enhancer, LlmEnhancer};
pub use config::{ProviderConfig, RuntimeConfig};
pub use orchestrator::{
    EnhancedRewriter, EnhancedRewriterBuilder, FollowupReport, Report, ReportSource, RewriteReport,
};
pub use providers::{LlmProvider, ProviderError, ProviderRegistry};
pub use resilience::{FallbackReason, LlmUsage};
pub use validator::ValidationError;

/// What a model call is for. Budgets, circuits and cache entries are kept per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Rewrite,
    Followups,
}

impl Operation {
    pub const ALL: [Operation; 2] = [Operation::Rewrite, Operation::Followups];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Rewrite => "rewrite",
            Operation::Followups => "followups",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from setting up the runtime. Calls themselves never fail.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid runtime config: {0}")]
    Config(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::Rewrite.to_string(), "rewrite");
        assert_eq!(
            serde_json::to_string(&Operation::Followups).unwrap(),
            "\"followups\""
        );
    }

    #[test]
    fn test_config_error_converts() {
        let err: RuntimeError = RuntimeConfig::from_yaml("timeout: [").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid runtime config"));
    }
}
