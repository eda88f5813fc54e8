//! Enhancer trait and request types.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use star_core::StarEvaluation;

use crate::providers::{ProviderError, TokenUsage};
use crate::validator::ValidationError;
use crate::Operation;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl AgentError {
    /// Rate limits are retried with backoff; everything else falls back at once.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AgentError::Provider(e) if e.is_retryable())
    }
}

/// Everything an enhancer needs for one call.
#[derive(Debug, Clone)]
pub struct EnhancementRequest {
    pub operation: Operation,
    pub question: String,
    pub answer: String,

    /// Rule-based output for the same input
    pub draft: String,

    pub evaluation: StarEvaluation,
    pub max_words: usize,
    pub followup_count: usize,
}

/// Raw, unvalidated model output.
#[derive(Debug, Clone)]
pub struct Enhancement {
    pub text: String,
    pub usage: TokenUsage,
    pub model: String,
}

#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn enhance(&self, request: &EnhancementRequest) -> Result<Enhancement, AgentError>;

    /// Upper estimate of the tokens one call will use, checked against the budget.
    fn estimate_tokens(&self, request: &EnhancementRequest) -> u32;

    fn name(&self) -> &str;
}
