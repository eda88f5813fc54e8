//! Why an enhancement fell back to the rule-based output.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Enhancement switched off in config
    Disabled,
    NoProvider,
    CircuitOpen,
    BudgetExceeded,
    Timeout,
    Provider(String),
    InvalidOutput(String),
}

impl FallbackReason {
    /// Whether this reason counts as a provider failure for the circuit breaker.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FallbackReason::Timeout | FallbackReason::Provider(_) | FallbackReason::InvalidOutput(_)
        )
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Disabled => f.write_str("enhancement disabled"),
            FallbackReason::NoProvider => f.write_str("no provider configured"),
            FallbackReason::CircuitOpen => f.write_str("circuit open"),
            FallbackReason::BudgetExceeded => f.write_str("token budget exceeded"),
            FallbackReason::Timeout => f.write_str("provider timed out"),
            FallbackReason::Provider(msg) => write!(f, "provider error: {}", msg),
            FallbackReason::InvalidOutput(msg) => write!(f, "invalid model output: {}", msg),
        }
    }
}
