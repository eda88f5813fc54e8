//! Circuit breaker for provider calls.
//!
//! After repeated failures the circuit for an operation opens and calls go
//! straight to the rule-based output until the recovery timeout passes.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::duration_str;
use crate::Operation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: u32,

    #[serde(with = "duration_str")]
    pub recovery_timeout: Duration,

    /// Successful trial calls needed to close it again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitState {
    Closed { failures: u32 },
    Open { opened_at: Instant },
    HalfOpen { successes: u32 },
}

/// One circuit per `Operation`.
pub struct CircuitBreaker {
    states: RwLock<HashMap<Operation, CircuitState>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// True while calls for `operation` should skip the provider.
    ///
    /// An open circuit whose recovery timeout has elapsed moves to half-open
    /// and lets the call through.
    pub fn is_open(&self, operation: Operation) -> bool {
        let mut states = self.states.write();
        let CircuitState::Open { opened_at } = self.current(&states, operation) else {
            return false;
        };
        if opened_at.elapsed() < self.config.recovery_timeout {
            return true;
        }
        states.insert(operation, CircuitState::HalfOpen { successes: 0 });
        tracing::info!(%operation, "Circuit half-open, allowing a trial call");
        false
    }

    pub fn record_success(&self, operation: Operation) {
        let mut states = self.states.write();
        let next = match self.current(&states, operation) {
            CircuitState::HalfOpen { successes } if successes + 1 < self.config.success_threshold => {
                CircuitState::HalfOpen {
                    successes: successes + 1,
                }
            }
            CircuitState::HalfOpen { .. } => {
                tracing::info!(%operation, "Circuit closed after recovery");
                CircuitState::Closed { failures: 0 }
            }
            open @ CircuitState::Open { .. } => open,
            CircuitState::Closed { .. } => CircuitState::Closed { failures: 0 },
        };
        states.insert(operation, next);
    }

    pub fn record_failure(&self, operation: Operation) {
        let mut states = self.states.write();
        let next = match self.current(&states, operation) {
            CircuitState::Closed { failures } if failures + 1 >= self.config.failure_threshold => {
                tracing::warn!(
                    %operation,
                    failures = failures + 1,
                    "Circuit opened after repeated failures"
                );
                CircuitState::Open {
                    opened_at: Instant::now(),
                }
            }
            CircuitState::Closed { failures } => CircuitState::Closed {
                failures: failures + 1,
            },
            CircuitState::HalfOpen { .. } => {
                tracing::warn!(%operation, "Trial call failed, circuit reopened");
                CircuitState::Open {
                    opened_at: Instant::now(),
                }
            }
            open @ CircuitState::Open { .. } => open,
        };
        states.insert(operation, next);
    }

    fn current(&self, states: &HashMap<Operation, CircuitState>, operation: Operation) -> CircuitState {
        states
            .get(&operation)
            .cloned()
            .unwrap_or(CircuitState::Closed { failures: 0 })
    }

    pub fn state(&self, operation: Operation) -> CircuitState {
        self.current(&self.states.read(), operation)
    }

    pub fn reset(&self) {
        self.states.write().clear();
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(failure_threshold: u32) -> CircuitBreaker {
        CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 1,
        })
    }

    #[test]
    fn test_starts_closed() {
        let cb = CircuitBreaker::default();
        assert!(!cb.is_open(Operation::Rewrite));
        assert_eq!(cb.state(Operation::Rewrite), CircuitState::Closed { failures: 0 });
    }

    #[tokio::test]
    async fn test_opens_after_threshold() {
        let cb = breaker(2);
        cb.record_failure(Operation::Rewrite);
        assert!(!cb.is_open(Operation::Rewrite));
        cb.record_failure(Operation::Rewrite);
        assert!(cb.is_open(Operation::Rewrite));
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let cb = breaker(3);
        cb.record_failure(Operation::Rewrite);
        cb.record_failure(Operation::Rewrite);
        cb.record_success(Operation::Rewrite);
        cb.record_failure(Operation::Rewrite);
        cb.record_failure(Operation::Rewrite);
        assert!(!cb.is_open(Operation::Rewrite));
    }

    #[tokio::test]
    async fn test_operations_are_independent() {
        let cb = breaker(1);
        cb.record_failure(Operation::Rewrite);
        assert!(cb.is_open(Operation::Rewrite));
        assert!(!cb.is_open(Operation::Followups));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_through_half_open() {
        let cb = breaker(1);
        cb.record_failure(Operation::Followups);
        assert!(cb.is_open(Operation::Followups));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!cb.is_open(Operation::Followups));
        assert_eq!(
            cb.state(Operation::Followups),
            CircuitState::HalfOpen { successes: 0 }
        );

        cb.record_success(Operation::Followups);
        assert_eq!(cb.state(Operation::Followups), CircuitState::Closed { failures: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_trial_reopens() {
        let cb = breaker(1);
        cb.record_failure(Operation::Rewrite);
        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!cb.is_open(Operation::Rewrite));

        cb.record_failure(Operation::Rewrite);
        assert!(cb.is_open(Operation::Rewrite));
    }
}
