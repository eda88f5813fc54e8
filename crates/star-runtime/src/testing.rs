//! Scripted provider for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    RateLimited,
    ServerError,
    /// Never answers
    Hang,
}

/// Plays back replies in order, then repeats `then` forever.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    then: Reply,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn scripted(replies: Vec<Reply>, then: Reply) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            then,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::scripted(Vec::new(), Reply::Text(text.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.then.clone());

        match reply {
            Reply::Text(content) => Ok(CompletionResponse {
                content,
                usage: TokenUsage {
                    prompt_tokens: 100,
                    completion_tokens: 50,
                    ..TokenUsage::default()
                },
                model: config.model.clone(),
                stop_reason: Some("end_turn".to_string()),
            }),
            Reply::RateLimited => Err(ProviderError::RateLimited { retry_after: None }),
            Reply::ServerError => Err(ProviderError::ApiError {
                status: 500,
                message: "internal error".to_string(),
            }),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Err(ProviderError::Timeout(config.timeout))
            }
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
