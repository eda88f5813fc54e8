//! Resilience around provider calls: circuit breaker, token budget and
//! fallback reasons.

mod budget;
mod circuit_breaker;
mod fallback;

pub use budget::{BudgetTracker, LlmUsage, TokenBudget};
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use fallback::FallbackReason;
