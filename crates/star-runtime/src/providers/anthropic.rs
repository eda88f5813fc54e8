//! Anthropic Messages API provider.

use super::{
    factory::ProviderFactory,
    secrets::{ApiCredential, CredentialSource},
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, Role,
    TokenUsage,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn build_client() -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| ProviderError::HttpError(format!("failed to build HTTP client: {}", e)))
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            "Anthropic API key",
        ))
    }

    pub fn from_env() -> Result<Self, ProviderError> {
        Self::with_credential(ApiCredential::from_env(
            ANTHROPIC_API_KEY_ENV,
            "Anthropic API key",
        )?)
    }

    /// `api_key` and `base_url` from config; the key falls back to `ANTHROPIC_API_KEY`.
    pub fn from_config(config: &JsonValue) -> Result<Self, ProviderError> {
        let credential = ApiCredential::from_config_or_env(
            config,
            "api_key",
            ANTHROPIC_API_KEY_ENV,
            "Anthropic API key",
        )?;

        let provider = Self::with_credential(credential)?;
        Ok(match config["base_url"].as_str() {
            Some(url) => provider.with_base_url(url),
            None => provider,
        })
    }

    fn with_credential(credential: ApiCredential) -> Result<Self, ProviderError> {
        Ok(Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: build_client()?,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    system: Vec<ContentBlock>,
    messages: Vec<ApiMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: Role,
    content: String,
}

#[derive(Debug, Serialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_control: Option<CacheControl>,
}

#[derive(Debug, Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
    #[serde(default)]
    cache_creation_input_tokens: u32,
    #[serde(default)]
    cache_read_input_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// System messages go into the top-level `system` field; the rest stay in order.
fn build_request(messages: Vec<ChatMessage>, config: &CompletionConfig) -> MessagesRequest {
    let mut system = Vec::new();
    let mut turns = Vec::new();

    for message in messages {
        match message.role {
            Role::System => system.push(ContentBlock {
                kind: "text",
                text: message.content,
                cache_control: config
                    .prompt_caching
                    .then_some(CacheControl { kind: "ephemeral" }),
            }),
            role => turns.push(ApiMessage {
                role,
                content: message.content,
            }),
        }
    }

    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        system,
        messages: turns,
        temperature: config.temperature,
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let request = build_request(messages, config);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ProviderError::AuthError);
        }

        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.error.message,
                Err(e) => format!("unreadable error body: {}", e),
            };
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Ok(CompletionResponse {
            content: body.content.into_iter().filter_map(|b| b.text).collect(),
            usage: TokenUsage {
                prompt_tokens: body.usage.input_tokens,
                completion_tokens: body.usage.output_tokens,
                cache_read_tokens: body.usage.cache_read_input_tokens,
                cache_creation_tokens: body.usage.cache_creation_input_tokens,
            },
            model: body.model,
            stop_reason: body.stop_reason,
        })
    }

    async fn health_check(&self) -> bool {
        !self.credential.is_empty()
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Builds `AnthropicProvider` from `{"api_key"?, "base_url"?}`.
pub struct AnthropicProviderFactory;

impl ProviderFactory for AnthropicProviderFactory {
    fn provider_type(&self) -> &'static str {
        "anthropic"
    }

    fn create(&self, config: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        Ok(Arc::new(AnthropicProvider::from_config(config)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        if !ApiCredential::is_available(config, "api_key", ANTHROPIC_API_KEY_ENV) {
            return Err(ProviderError::NotConfigured(format!(
                "Anthropic API key required: set 'api_key' in config or {}",
                ANTHROPIC_API_KEY_ENV
            )));
        }

        if let Some(url) = config["base_url"].as_str() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ProviderError::NotConfigured(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({ "base_url": DEFAULT_BASE_URL })
    }

    fn description(&self) -> &'static str {
        "Anthropic Messages API with prompt caching"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk-ant-test-0123456789";

    #[test]
    fn test_debug_hides_key() {
        let provider = AnthropicProvider::new(SECRET).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_from_config() {
        let config = serde_json::json!({
            "api_key": SECRET,
            "base_url": "https://proxy.example.test/v1/"
        });
        let provider = AnthropicProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url, "https://proxy.example.test/v1");
        assert_eq!(provider.credential.source(), CredentialSource::Config);
    }

    #[tokio::test]
    async fn test_health_check_requires_key() {
        assert!(AnthropicProvider::new(SECRET).unwrap().health_check().await);
        assert!(!AnthropicProvider::new("").unwrap().health_check().await);
    }

    #[test]
    fn test_request_moves_system_prompt() {
        let request = build_request(
            vec![ChatMessage::system("rules"), ChatMessage::user("answer")],
            &CompletionConfig::default(),
        );
        assert_eq!(request.system.len(), 1);
        assert!(request.system[0].cache_control.is_some());
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["system"][0]["cache_control"]["type"], "ephemeral");
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_factory_rejects_bad_base_url() {
        let factory = AnthropicProviderFactory;
        let config = serde_json::json!({ "api_key": SECRET, "base_url": "ftp://nope" });
        assert!(factory.validate_config(&config).is_err());
        assert!(factory.create(&serde_json::json!({ "api_key": SECRET })).is_ok());
    }
}
