//! Token budgets for provider calls.
//!
//! One budget per `Operation` plus a global one. A call is made only when
//! both can afford its estimate.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::providers::TokenUsage;
use crate::Operation;

pub struct TokenBudget {
    pub max_tokens: u32,
    used: AtomicU32,
}

impl TokenBudget {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            used: AtomicU32::new(0),
        }
    }

    pub fn can_afford(&self, tokens: u32) -> bool {
        self.remaining() >= tokens
    }

    pub fn record(&self, tokens: u32) {
        self.used.fetch_add(tokens, Ordering::SeqCst);
    }

    pub fn remaining(&self) -> u32 {
        self.max_tokens.saturating_sub(self.used())
    }

    pub fn used(&self) -> u32 {
        self.used.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.used.store(0, Ordering::SeqCst);
    }
}

/// Usage accumulated across provider calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmUsage {
    pub total_tokens: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub llm_calls: u32,

    /// USD, from list prices
    pub estimated_cost: f64,

    pub cache_read_tokens: u32,
    pub cache_creation_tokens: u32,
}

impl LlmUsage {
    /// Usage of a single call.
    pub fn from_call(usage: &TokenUsage, model: &str) -> Self {
        let mut total = Self::default();
        total.add(usage, model);
        total
    }

    pub fn add(&mut self, usage: &TokenUsage, model: &str) {
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
        self.total_tokens += usage.total();
        self.cache_read_tokens += usage.cache_read_tokens;
        self.cache_creation_tokens += usage.cache_creation_tokens;
        self.llm_calls += 1;
        self.estimated_cost += estimate_cost(usage, model);
    }
}

/// Price per million tokens: input, output, cache write, cache read.
fn rates(model: &str) -> (f64, f64, f64, f64) {
    match model {
        m if m.contains("haiku") => (1.0, 5.0, 1.25, 0.1),
        m if m.contains("opus") => (5.0, 25.0, 6.25, 0.5),
        _ => (3.0, 15.0, 3.75, 0.3),
    }
}

fn estimate_cost(usage: &TokenUsage, model: &str) -> f64 {
    let (input, output, cache_write, cache_read) = rates(model);
    let per_million = |tokens: u32, rate: f64| f64::from(tokens) / 1_000_000.0 * rate;

    per_million(usage.prompt_tokens, input)
        + per_million(usage.completion_tokens, output)
        + per_million(usage.cache_creation_tokens, cache_write)
        + per_million(usage.cache_read_tokens, cache_read)
}

pub struct BudgetTracker {
    operation_budgets: HashMap<Operation, TokenBudget>,
    global_budget: TokenBudget,
    usage: RwLock<LlmUsage>,
}

impl BudgetTracker {
    pub fn new(global_max: u32, per_operation_max: u32) -> Self {
        Self {
            operation_budgets: Operation::ALL
                .iter()
                .map(|op| (*op, TokenBudget::new(per_operation_max)))
                .collect(),
            global_budget: TokenBudget::new(global_max),
            usage: RwLock::new(LlmUsage::default()),
        }
    }

    pub fn can_afford(&self, operation: Operation, estimated_tokens: u32) -> bool {
        let operation_ok = self
            .operation_budgets
            .get(&operation)
            .map_or(true, |b| b.can_afford(estimated_tokens));

        operation_ok && self.global_budget.can_afford(estimated_tokens)
    }

    pub fn record_usage(&self, operation: Operation, usage: &TokenUsage, model: &str) {
        if let Some(budget) = self.operation_budgets.get(&operation) {
            budget.record(usage.total());
        }
        self.global_budget.record(usage.total());
        self.usage.write().add(usage, model);
    }

    pub fn usage(&self) -> LlmUsage {
        self.usage.read().clone()
    }

    pub fn remaining_global(&self) -> u32 {
        self.global_budget.remaining()
    }

    pub fn remaining(&self, operation: Operation) -> u32 {
        self.operation_budgets
            .get(&operation)
            .map_or(0, |b| b.remaining())
    }

    pub fn reset(&self) {
        for budget in self.operation_budgets.values() {
            budget.reset();
        }
        self.global_budget.reset();
        *self.usage.write() = LlmUsage::default();
    }
}

impl Default for BudgetTracker {
    fn default() -> Self {
        Self::new(20_000, 8_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(prompt: u32, completion: u32) -> TokenUsage {
        TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            ..TokenUsage::default()
        }
    }

    #[test]
    fn test_token_budget() {
        let budget = TokenBudget::new(100);
        assert!(budget.can_afford(100));
        assert!(!budget.can_afford(101));

        budget.record(70);
        assert_eq!(budget.remaining(), 30);
        assert!(!budget.can_afford(31));

        budget.record(70);
        assert_eq!(budget.remaining(), 0);

        budget.reset();
        assert_eq!(budget.used(), 0);
    }

    #[test]
    fn test_tracker_checks_both_budgets() {
        let tracker = BudgetTracker::new(1000, 300);
        tracker.record_usage(Operation::Rewrite, &usage(200, 50), "claude-sonnet-4-5");

        assert_eq!(tracker.remaining(Operation::Rewrite), 50);
        assert_eq!(tracker.remaining(Operation::Followups), 300);
        assert_eq!(tracker.remaining_global(), 750);
        assert!(!tracker.can_afford(Operation::Rewrite, 60));
        assert!(tracker.can_afford(Operation::Followups, 300));

        let totals = tracker.usage();
        assert_eq!(totals.llm_calls, 1);
        assert_eq!(totals.total_tokens, 250);
    }

    #[test]
    fn test_global_budget_caps_all_operations() {
        let tracker = BudgetTracker::new(100, 1000);
        tracker.record_usage(Operation::Rewrite, &usage(90, 0), "m");
        assert!(!tracker.can_afford(Operation::Followups, 20));
    }

    #[test]
    fn test_cost_estimate() {
        // 1000 * $3/M + 500 * $15/M = $0.0105
        let cost = LlmUsage::from_call(&usage(1000, 500), "claude-sonnet-4-5").estimated_cost;
        assert!((cost - 0.0105).abs() < 1e-9);

        let haiku = LlmUsage::from_call(&usage(1000, 500), "claude-haiku-4-5").estimated_cost;
        assert!(haiku < cost);
    }

    #[test]
    fn test_reset() {
        let tracker = BudgetTracker::default();
        tracker.record_usage(Operation::Followups, &usage(10, 10), "m");
        tracker.reset();
        assert_eq!(tracker.usage(), LlmUsage::default());
        assert_eq!(tracker.remaining_global(), 20_000);
    }
}
