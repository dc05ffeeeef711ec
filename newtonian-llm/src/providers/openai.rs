use crate::config::{ChatRequest, ChatResponse, Usage};
use crate::error::{LLMError, Result};
use crate::providers::trait_impl::ChatProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub struct OpenAIProvider {
    api_key: Option<String>,
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenAIProvider {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| LLMError::MissingApiKey("OpenAI".to_string()))
    }
}

#[async_trait]
impl ChatProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.get_api_key()?;

        // Only alphanumeric, dash, underscore and dot reach the request body
        let model = request
            .model
            .as_ref()
            .map(|m| {
                m.chars()
                    .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
                    .take(100)
                    .collect::<String>()
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let body = json!({
            "model": model,
            "messages": request.messages.iter().map(|m| {
                json!({
                    "role": m.role.as_str(),
                    "content": m.content,
                })
            }).collect::<Vec<_>>(),
            "temperature": request.temperature.unwrap_or(0.3).clamp(0.0, 2.0),
            "max_tokens": request.max_tokens.map(|t| t.min(4096)).unwrap_or(20),
        });

        if !self.base_url.starts_with("https://") {
            return Err(LLMError::InvalidResponse("Invalid base URL".to_string()));
        }

        tracing::debug!("Requesting chat completion from {} ({})", self.base_url, model);

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == 429 {
            return Err(LLMError::RateLimit);
        }

        if status == 401 || status == 403 {
            return Err(LLMError::AuthenticationFailed);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let text: String = text.chars().take(500).collect();
            return Err(LLMError::Provider(format!("HTTP {}: {}", status, text)));
        }

        let json: serde_json::Value = response.json().await?;
        parse_chat_response(&json, &model)
    }
}

fn parse_chat_response(json: &serde_json::Value, model: &str) -> Result<ChatResponse> {
    let choice = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .ok_or_else(|| LLMError::InvalidResponse("No choices in response".to_string()))?;

    let content = choice["message"]["content"]
        .as_str()
        .ok_or_else(|| LLMError::InvalidResponse("Choice has no message content".to_string()))?
        .to_string();

    let usage = json.get("usage").and_then(|u| {
        Some(Usage {
            prompt_tokens: u["prompt_tokens"].as_u64()? as u32,
            completion_tokens: u["completion_tokens"].as_u64()? as u32,
            total_tokens: u["total_tokens"].as_u64()? as u32,
        })
    });

    Ok(ChatResponse {
        content,
        model: json["model"].as_str().unwrap_or(model).to_string(),
        usage,
        finish_reason: choice["finish_reason"].as_str().map(|s| s.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Message;

    #[test]
    fn test_parse_chat_response() {
        let json = json!({
            "model": "gpt-3.5-turbo-0125",
            "choices": [{"message": {"role": "assistant", "content": "mars"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 60, "completion_tokens": 1, "total_tokens": 61}
        });
        let response = parse_chat_response(&json, DEFAULT_MODEL).unwrap();
        assert_eq!(response.content, "mars");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.usage.unwrap().total_tokens, 61);
    }

    #[test]
    fn test_parse_empty_choices() {
        let json = json!({"choices": []});
        assert!(matches!(
            parse_chat_response(&json, DEFAULT_MODEL),
            Err(LLMError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_key() {
        let provider = OpenAIProvider::new("https://api.openai.com/v1", Some("  ".to_string()), Duration::from_secs(1));
        assert!(!provider.has_api_key());
        let request = ChatRequest {
            messages: vec![Message::user("where is mars")],
            model: None,
            temperature: None,
            max_tokens: None,
        };
        assert!(matches!(
            tokio_test::block_on(provider.chat(request)),
            Err(LLMError::MissingApiKey(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_plain_http_base_url() {
        let provider = OpenAIProvider::new("http://example.com/v1", Some("sk-test".to_string()), Duration::from_secs(1));
        let request = ChatRequest {
            messages: vec![Message::user("where is mars")],
            model: Some("gpt-3.5-turbo".to_string()),
            temperature: Some(0.3),
            max_tokens: Some(20),
        };
        assert!(matches!(
            provider.chat(request).await,
            Err(LLMError::InvalidResponse(_))
        ));
    }
}
