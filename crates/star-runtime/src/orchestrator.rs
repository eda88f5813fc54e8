//! `EnhancedRewriter`: rule-based output, optionally polished by a model.
//!
//! Every call computes the canonical star-core result first. The model is
//! consulted only when enhancement is enabled, a provider is configured, the
//! circuit is closed and the budget allows it. Model output is validated
//! before use; any failure returns the canonical result.

use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use star_core::{FollowupGenerator, Rewriter, Rubric};

use crate::agents::{AgentError, Enhancement, EnhancementRequest, Enhancer, LlmEnhancer};
use crate::cache::{CacheKey, EnhancementCache};
use crate::config::RuntimeConfig;
use crate::providers::{LlmProvider, ProviderRegistry};
use crate::resilience::{BudgetTracker, CircuitBreaker, CircuitState, FallbackReason, LlmUsage};
use crate::validator::{validate_followups, validate_rewrite};
use crate::{Operation, RuntimeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    /// Rule-based output from star-core
    Canonical,
    /// Fresh, validated model output
    Enhanced,
    /// Validated model output from an earlier call
    Cached,
}

/// Output of one `EnhancedRewriter` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report<T> {
    pub output: T,
    pub source: ReportSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,

    /// Usage of this call only
    pub usage: LlmUsage,

    pub generated_at: DateTime<Utc>,
}

pub type RewriteReport = Report<String>;
pub type FollowupReport = Report<Vec<String>>;

impl<T> Report<T> {
    fn canonical(output: T, reason: FallbackReason) -> Self {
        Self {
            output,
            source: ReportSource::Canonical,
            fallback_reason: Some(reason),
            usage: LlmUsage::default(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_enhanced(&self) -> bool {
        self.source != ReportSource::Canonical
    }
}

struct Enhanced {
    text: String,
    source: ReportSource,
    usage: LlmUsage,
}

pub struct EnhancedRewriter {
    rubric: Rubric,
    config: RuntimeConfig,
    enhancer: Option<Arc<dyn Enhancer>>,
    circuit_breaker: CircuitBreaker,
    budget_tracker: BudgetTracker,
    cache: EnhancementCache,
}

impl EnhancedRewriter {
    /// A rewriter with no model; every call returns the canonical result.
    pub fn new(rubric: Rubric, config: RuntimeConfig) -> Self {
        Self {
            circuit_breaker: CircuitBreaker::new(config.circuit_breaker.clone()),
            budget_tracker: BudgetTracker::new(
                config.budget.global_max_tokens,
                config.budget.per_operation_max_tokens,
            ),
            cache: EnhancementCache::new(config.cache.max_entries, config.cache.ttl),
            enhancer: None,
            rubric,
            config,
        }
    }

    pub fn builder() -> EnhancedRewriterBuilder {
        EnhancedRewriterBuilder::new()
    }

    pub fn with_enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    pub fn with_provider(self, provider: Arc<dyn LlmProvider>) -> Self {
        let completion = self.config.completion();
        self.with_enhancer(Arc::new(LlmEnhancer::new(provider, completion)))
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    /// Rewrite an answer into STAR segments.
    pub async fn rewrite(&self, question: &str, answer: &str) -> RewriteReport {
        let canonical = Rewriter::new(&self.rubric).rewrite(question, answer);
        let request = self.request(Operation::Rewrite, question, answer, canonical.clone());

        match self.enhance(request).await {
            Ok(enhanced) => Report {
                output: enhanced.text,
                source: enhanced.source,
                fallback_reason: None,
                usage: enhanced.usage,
                generated_at: Utc::now(),
            },
            Err(reason) => Report::canonical(canonical, reason),
        }
    }

    /// Generate recruiter follow-up questions.
    pub async fn followups(&self, question: &str, answer: &str) -> FollowupReport {
        let canonical = FollowupGenerator::new(&self.rubric).generate(question, answer);
        let request = self.request(Operation::Followups, question, answer, canonical.join("\n"));

        match self.enhance(request).await {
            Ok(enhanced) => Report {
                output: enhanced.text.lines().map(str::to_string).collect(),
                source: enhanced.source,
                fallback_reason: None,
                usage: enhanced.usage,
                generated_at: Utc::now(),
            },
            Err(reason) => Report::canonical(canonical, reason),
        }
    }

    fn request(
        &self,
        operation: Operation,
        question: &str,
        answer: &str,
        draft: String,
    ) -> EnhancementRequest {
        EnhancementRequest {
            operation,
            question: question.to_string(),
            answer: answer.to_string(),
            draft,
            evaluation: star_core::evaluate_with_rubric(answer, &self.rubric),
            max_words: self.rubric.rewrite.max_words,
            followup_count: self.rubric.followups.effective_count(),
        }
    }

    async fn enhance(&self, request: EnhancementRequest) -> Result<Enhanced, FallbackReason> {
        let operation = request.operation;
        let result = self.try_enhance(&request).await;

        match &result {
            Ok(enhanced) => {
                tracing::debug!(%operation, source = ?enhanced.source, "Using model output");
            }
            Err(reason) if reason.is_failure() => {
                self.circuit_breaker.record_failure(operation);
                tracing::warn!(%operation, %reason, "Enhancement failed, using rule-based output");
            }
            Err(reason) => {
                tracing::debug!(%operation, %reason, "Enhancement skipped");
            }
        }

        result
    }

    async fn try_enhance(&self, request: &EnhancementRequest) -> Result<Enhanced, FallbackReason> {
        let operation = request.operation;

        if !self.config.enabled {
            return Err(FallbackReason::Disabled);
        }
        let enhancer = self.enhancer.as_ref().ok_or(FallbackReason::NoProvider)?;

        if self.circuit_breaker.is_open(operation) {
            return Err(FallbackReason::CircuitOpen);
        }
        if !self
            .budget_tracker
            .can_afford(operation, enhancer.estimate_tokens(request))
        {
            return Err(FallbackReason::BudgetExceeded);
        }

        let key = CacheKey::new(operation, &request.question, &request.answer, &self.rubric.name);
        if let Some(text) = self.cache.get(&key).await {
            return Ok(Enhanced {
                text,
                source: ReportSource::Cached,
                usage: LlmUsage::default(),
            });
        }

        let call = tokio::time::timeout(self.config.timeout, self.call(enhancer, request));
        let enhancement = match call.await {
            Err(_) => return Err(FallbackReason::Timeout),
            Ok(Err(AgentError::Timeout(_))) => return Err(FallbackReason::Timeout),
            Ok(Err(e)) => return Err(FallbackReason::Provider(e.to_string())),
            Ok(Ok(enhancement)) => enhancement,
        };

        self.budget_tracker
            .record_usage(operation, &enhancement.usage, &enhancement.model);

        let text = match operation {
            Operation::Rewrite => {
                validate_rewrite(&enhancement.text, &request.answer, request.max_words)
            }
            Operation::Followups => validate_followups(&enhancement.text, request.followup_count)
                .map(|questions| questions.join("\n")),
        }
        .map_err(|e| FallbackReason::InvalidOutput(e.to_string()))?;

        self.circuit_breaker.record_success(operation);
        self.cache.insert(key, text.clone()).await;

        Ok(Enhanced {
            text,
            source: ReportSource::Enhanced,
            usage: LlmUsage::from_call(&enhancement.usage, &enhancement.model),
        })
    }

    /// One enhancer call, retried with exponential backoff on rate limits.
    async fn call(
        &self,
        enhancer: &Arc<dyn Enhancer>,
        request: &EnhancementRequest,
    ) -> Result<Enhancement, AgentError> {
        let retry = &self.config.retry;
        let backoff = ExponentialBuilder::default()
            .with_min_delay(retry.min_delay)
            .with_max_delay(retry.max_delay)
            .with_max_times(retry.max_attempts);

        (move || async move { enhancer.enhance(request).await })
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(AgentError::is_retryable)
            .notify(|err: &AgentError, delay: Duration| {
                tracing::info!(
                    operation = %request.operation,
                    error = %err,
                    delay = %humantime::format_duration(delay),
                    "Retrying model call"
                );
            })
            .await
    }

    /// Usage accumulated since creation or the last `reset_budget`.
    pub fn usage(&self) -> LlmUsage {
        self.budget_tracker.usage()
    }

    pub fn reset_budget(&self) {
        self.budget_tracker.reset();
    }

    pub fn circuit_state(&self, operation: Operation) -> CircuitState {
        self.circuit_breaker.state(operation)
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}

pub struct EnhancedRewriterBuilder {
    rubric: Rubric,
    config: RuntimeConfig,
    provider: Option<Arc<dyn LlmProvider>>,
    enhancer: Option<Arc<dyn Enhancer>>,
    registry: Option<ProviderRegistry>,
}

impl EnhancedRewriterBuilder {
    pub fn new() -> Self {
        Self {
            rubric: Rubric::default(),
            config: RuntimeConfig::default(),
            provider: None,
            enhancer: None,
            registry: None,
        }
    }

    pub fn rubric(mut self, rubric: Rubric) -> Self {
        self.rubric = rubric;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn enhancer(mut self, enhancer: Arc<dyn Enhancer>) -> Self {
        self.enhancer = Some(enhancer);
        self
    }

    /// Registry used to build the provider named in `config.provider`.
    pub fn registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the rewriter.
    ///
    /// An explicit enhancer wins over an explicit provider, which wins over
    /// `config.provider`. With none of them the rewriter is rule-based only.
    pub fn build(self) -> Result<EnhancedRewriter, RuntimeError> {
        let provider = match (self.provider, &self.config.provider) {
            (Some(provider), _) => Some(provider),
            (None, Some(section)) if self.config.enabled && self.enhancer.is_none() => {
                let registry = self.registry.unwrap_or_else(ProviderRegistry::with_defaults);
                Some(registry.from_config(section)?)
            }
            (None, _) => None,
        };

        let rewriter = EnhancedRewriter::new(self.rubric, self.config);
        Ok(match (self.enhancer, provider) {
            (Some(enhancer), _) => rewriter.with_enhancer(enhancer),
            (None, Some(provider)) => rewriter.with_provider(provider),
            (None, None) => rewriter,
        })
    }
}

impl Default for EnhancedRewriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedProvider};
    use star_core::split_star_segments;

    const QUESTION: &str = "Tell me about a time you fixed a production bug";
    const ANSWER: &str = "I fixed a bug by improving logging";

    const POLISHED: &str = "**Situation:** Our checkout service kept failing in production.\n\n\
        **Task:** I was responsible for finding the cause.\n\n\
        **Action:** I added structured logging, traced the failing requests and fixed the bug.\n\n\
        **Result:** Errors dropped by [X%] within a week.";

    const FOLLOWUPS: &str = "How did you choose what to log?\nHow did you verify the fix?\nWho did you involve?\nWhat would you do differently?";

    fn rewriter_with(provider: Arc<ScriptedProvider>, config: RuntimeConfig) -> EnhancedRewriter {
        EnhancedRewriter::new(Rubric::default(), config).with_provider(provider)
    }

    #[tokio::test]
    async fn test_no_provider_returns_canonical() {
        let rewriter = EnhancedRewriter::new(Rubric::default(), RuntimeConfig::default());
        let report = rewriter.rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.source, ReportSource::Canonical);
        assert_eq!(report.fallback_reason, Some(FallbackReason::NoProvider));
        assert_eq!(report.output, star_core::rewrite(QUESTION, ANSWER));
    }

    #[tokio::test]
    async fn test_disabled_skips_provider() {
        let provider = Arc::new(ScriptedProvider::replying(POLISHED));
        let config = RuntimeConfig {
            enabled: false,
            ..RuntimeConfig::default()
        };
        let report = rewriter_with(provider.clone(), config).rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.fallback_reason, Some(FallbackReason::Disabled));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_output_is_used() {
        let provider = Arc::new(ScriptedProvider::replying(POLISHED));
        let rewriter = rewriter_with(provider, RuntimeConfig::default());
        let report = rewriter.rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.source, ReportSource::Enhanced);
        assert!(report.fallback_reason.is_none());
        assert_eq!(report.output, POLISHED);
        assert_eq!(report.usage.llm_calls, 1);
        assert_eq!(rewriter.usage().total_tokens, 150);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let provider = Arc::new(ScriptedProvider::replying(POLISHED));
        let rewriter = rewriter_with(provider.clone(), RuntimeConfig::default());

        let first = rewriter.rewrite(QUESTION, ANSWER).await;
        let second = rewriter.rewrite(QUESTION, ANSWER).await;

        assert_eq!(first.source, ReportSource::Enhanced);
        assert_eq!(second.source, ReportSource::Cached);
        assert_eq!(second.output, first.output);
        assert_eq!(second.usage, LlmUsage::default());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let provider = Arc::new(ScriptedProvider::scripted(vec![], Reply::ServerError));
        let rewriter = rewriter_with(provider, RuntimeConfig::default());
        let report = rewriter.rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.source, ReportSource::Canonical);
        assert!(matches!(report.fallback_reason, Some(FallbackReason::Provider(_))));
        assert_eq!(report.output, star_core::rewrite(QUESTION, ANSWER));
        assert_eq!(
            rewriter.circuit_state(Operation::Rewrite),
            CircuitState::Closed { failures: 1 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let provider = Arc::new(ScriptedProvider::scripted(vec![], Reply::Hang));
        let config = RuntimeConfig {
            timeout: Duration::from_secs(2),
            ..RuntimeConfig::default()
        };
        let report = rewriter_with(provider, config).rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.fallback_reason, Some(FallbackReason::Timeout));
        assert!(split_star_segments(&report.output).is_some());
    }

    #[tokio::test]
    async fn test_invalid_structure_falls_back() {
        let provider = Arc::new(ScriptedProvider::replying("Sure! Here is a stronger answer."));
        let report = rewriter_with(provider, RuntimeConfig::default())
            .rewrite(QUESTION, ANSWER)
            .await;

        assert_eq!(report.source, ReportSource::Canonical);
        assert!(matches!(report.fallback_reason, Some(FallbackReason::InvalidOutput(_))));
        assert!(split_star_segments(&report.output).is_some());
    }

    #[tokio::test]
    async fn test_invented_numbers_fall_back() {
        let provider = Arc::new(ScriptedProvider::replying(POLISHED.replace("[X%]", "40%")));
        let report = rewriter_with(provider, RuntimeConfig::default())
            .rewrite(QUESTION, ANSWER)
            .await;

        match report.fallback_reason {
            Some(FallbackReason::InvalidOutput(msg)) => assert!(msg.contains("'40'")),
            other => panic!("expected invalid output, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_circuit_skips_provider() {
        let provider = Arc::new(ScriptedProvider::scripted(vec![], Reply::ServerError));
        let mut config = RuntimeConfig::default();
        config.circuit_breaker.failure_threshold = 1;
        let rewriter = rewriter_with(provider.clone(), config);

        rewriter.rewrite(QUESTION, ANSWER).await;
        let report = rewriter.rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.fallback_reason, Some(FallbackReason::CircuitOpen));
        assert_eq!(provider.calls(), 1);

        // Followups keep their own circuit.
        let followups = rewriter.followups(QUESTION, ANSWER).await;
        assert!(matches!(followups.fallback_reason, Some(FallbackReason::Provider(_))));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limits_are_retried() {
        let provider = Arc::new(ScriptedProvider::scripted(
            vec![Reply::RateLimited, Reply::RateLimited],
            Reply::Text(POLISHED.to_string()),
        ));
        let report = rewriter_with(provider.clone(), RuntimeConfig::default())
            .rewrite(QUESTION, ANSWER)
            .await;

        assert_eq!(report.source, ReportSource::Enhanced);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_budget_exceeded_skips_provider() {
        let provider = Arc::new(ScriptedProvider::replying(POLISHED));
        let mut config = RuntimeConfig::default();
        config.budget.per_operation_max_tokens = 100;
        let report = rewriter_with(provider.clone(), config).rewrite(QUESTION, ANSWER).await;

        assert_eq!(report.fallback_reason, Some(FallbackReason::BudgetExceeded));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_followups_enhanced() {
        let provider = Arc::new(ScriptedProvider::replying(FOLLOWUPS));
        let report = rewriter_with(provider, RuntimeConfig::default())
            .followups(QUESTION, ANSWER)
            .await;

        assert_eq!(report.source, ReportSource::Enhanced);
        assert_eq!(report.output.len(), 4);
        assert_eq!(report.output[0], "How did you choose what to log?");
    }

    #[tokio::test]
    async fn test_invalid_followups_fall_back() {
        let provider = Arc::new(ScriptedProvider::replying("Tell me more.\nAnd then?"));
        let report = rewriter_with(provider, RuntimeConfig::default())
            .followups(QUESTION, ANSWER)
            .await;

        assert_eq!(report.source, ReportSource::Canonical);
        assert_eq!(report.output, star_core::generate_followups(QUESTION, ANSWER));
    }

    #[test]
    fn test_builder_without_provider() {
        let rewriter = EnhancedRewriter::builder().build().unwrap();
        assert!(rewriter.enhancer.is_none());
        assert_eq!(rewriter.rubric().name, "default");
    }

    #[test]
    fn test_builder_unknown_provider_type() {
        let config = RuntimeConfig::from_yaml("provider:\n  type: nonexistent\n").unwrap();
        let result = EnhancedRewriter::builder()
            .config(config)
            .registry(ProviderRegistry::new())
            .build();
        assert!(matches!(result, Err(RuntimeError::Provider(_))));
    }

    #[tokio::test]
    async fn test_report_serializes() {
        let rewriter = EnhancedRewriter::new(Rubric::default(), RuntimeConfig::default());
        let report = rewriter.followups(QUESTION, ANSWER).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["source"], "canonical");
        assert_eq!(json["fallback_reason"]["type"], "no_provider");
    }
}
