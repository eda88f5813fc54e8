//! Enhancer backed by an `LlmProvider`.

use async_trait::async_trait;
use std::sync::Arc;

use super::{AgentError, Enhancement, EnhancementRequest, Enhancer};
use crate::prompts;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider};
use crate::Operation;

pub struct LlmEnhancer {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
}

impl LlmEnhancer {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
        }
    }

    fn messages(&self, request: &EnhancementRequest) -> Vec<ChatMessage> {
        let user = match request.operation {
            Operation::Rewrite => prompts::rewrite_user_prompt(
                &request.question,
                &request.answer,
                &request.draft,
                &request.evaluation,
                request.max_words,
            ),
            Operation::Followups => prompts::followup_user_prompt(
                &request.question,
                &request.answer,
                request.followup_count,
            ),
        };

        vec![
            ChatMessage::system(prompts::system_prompt(request.operation)),
            ChatMessage::user(user),
        ]
    }
}

#[async_trait]
impl Enhancer for LlmEnhancer {
    async fn enhance(&self, request: &EnhancementRequest) -> Result<Enhancement, AgentError> {
        let response = self
            .provider
            .complete(self.messages(request), &self.completion)
            .await?;

        if response.content.trim().is_empty() {
            return Err(AgentError::EmptyResponse);
        }

        tracing::debug!(
            operation = %request.operation,
            provider = self.provider.name(),
            model = %response.model,
            tokens = response.usage.total(),
            "Model call completed"
        );

        Ok(Enhancement {
            text: response.content,
            usage: response.usage,
            model: response.model,
        })
    }

    fn estimate_tokens(&self, request: &EnhancementRequest) -> u32 {
        let prompt: u32 = self
            .messages(request)
            .iter()
            .map(|m| self.provider.estimate_tokens(&m.content))
            .sum();
        prompt.saturating_add(self.completion.max_tokens)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedProvider};

    fn request(operation: Operation) -> EnhancementRequest {
        let answer = "I fixed a bug by improving logging";
        EnhancementRequest {
            operation,
            question: "Tell me about a bug".to_string(),
            answer: answer.to_string(),
            draft: star_core::rewrite("Tell me about a bug", answer),
            evaluation: star_core::evaluate(answer),
            max_words: 225,
            followup_count: 5,
        }
    }

    #[tokio::test]
    async fn test_enhance_returns_raw_text() {
        let provider = Arc::new(ScriptedProvider::replying("Why?\nHow?\nWhat?"));
        let enhancer = LlmEnhancer::new(provider.clone(), CompletionConfig::default());

        let enhancement = enhancer.enhance(&request(Operation::Followups)).await.unwrap();
        assert_eq!(enhancement.text, "Why?\nHow?\nWhat?");
        assert_eq!(enhancement.usage.total(), 150);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_response_is_an_error() {
        let provider = Arc::new(ScriptedProvider::replying("  \n"));
        let enhancer = LlmEnhancer::new(provider, CompletionConfig::default());
        assert!(matches!(
            enhancer.enhance(&request(Operation::Rewrite)).await,
            Err(AgentError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let provider = Arc::new(ScriptedProvider::scripted(vec![], Reply::ServerError));
        let enhancer = LlmEnhancer::new(provider, CompletionConfig::default());
        assert!(matches!(
            enhancer.enhance(&request(Operation::Rewrite)).await,
            Err(AgentError::Provider(_))
        ));
    }

    #[test]
    fn test_messages_per_operation() {
        let enhancer = LlmEnhancer::new(
            Arc::new(ScriptedProvider::replying("")),
            CompletionConfig::default(),
        );

        let rewrite = enhancer.messages(&request(Operation::Rewrite));
        assert_eq!(rewrite[0].content, prompts::REWRITE_SYSTEM_PROMPT);
        assert!(rewrite[1].content.contains("## Draft\n**Situation:**"));

        let followups = enhancer.messages(&request(Operation::Followups));
        assert_eq!(followups[0].content, prompts::FOLLOWUP_SYSTEM_PROMPT);
        assert!(followups[1].content.contains("exactly 5 follow-up questions"));
    }

    #[test]
    fn test_estimate_includes_completion_budget() {
        let enhancer = LlmEnhancer::new(
            Arc::new(ScriptedProvider::replying("")),
            CompletionConfig::default(),
        );
        assert!(enhancer.estimate_tokens(&request(Operation::Rewrite)) > 800);
    }
}
