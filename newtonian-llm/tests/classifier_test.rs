//! Tests for the object classifier against a scripted provider

use async_trait::async_trait;
use newtonian_core::AiConfig;
use newtonian_llm::{
    ChatProvider, ChatRequest, ChatResponse, LLMError, MessageRole, ObjectClassifier,
    OpenAiClassifier,
};
use parking_lot::Mutex;
use std::sync::Arc;

struct ScriptedProvider {
    reply: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn has_api_key(&self) -> bool {
        true
    }

    async fn chat(&self, request: ChatRequest) -> newtonian_llm::Result<ChatResponse> {
        self.requests.lock().push(request);
        match &self.reply {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "scripted".to_string(),
                usage: None,
                finish_reason: Some("stop".to_string()),
            }),
            Err(e) => Err(LLMError::Provider(e.clone())),
        }
    }
}

#[tokio::test]
async fn test_classify_sends_prompt_and_settings() {
    let provider = ScriptedProvider::replying("Mars.");
    let classifier = OpenAiClassifier::with_provider(provider.clone(), &AiConfig::default());

    let token = classifier.classify("track the red planet").await.unwrap();
    assert_eq!(token, "mars");

    let requests = provider.requests.lock();
    let request = &requests[0];
    assert_eq!(request.model.as_deref(), Some("gpt-3.5-turbo"));
    assert_eq!(request.temperature, Some(0.3));
    assert_eq!(request.max_tokens, Some(20));
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert!(request.messages[0].content.contains("telescope assistant"));
    assert_eq!(request.messages[1].role, MessageRole::User);
    assert_eq!(request.messages[1].content, "track the red planet");
}

#[tokio::test]
async fn test_successful_classification_is_cached() {
    let provider = ScriptedProvider::replying("jupiter");
    let classifier = OpenAiClassifier::with_provider(provider.clone(), &AiConfig::default());

    classifier.classify("the giant planet").await.unwrap();
    let again = classifier.classify("  The Giant Planet ").await.unwrap();
    assert_eq!(again, "jupiter");
    assert_eq!(provider.calls(), 1);
    assert_eq!(classifier.cached_entries(), 1);
}

#[tokio::test]
async fn test_unknown_is_not_cached() {
    let provider = ScriptedProvider::replying("unknown");
    let classifier = OpenAiClassifier::with_provider(provider.clone(), &AiConfig::default());

    assert_eq!(classifier.classify("make me a sandwich").await.unwrap(), "unknown");
    assert_eq!(classifier.classify("make me a sandwich").await.unwrap(), "unknown");
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_empty_reply_is_unknown() {
    let provider = ScriptedProvider::replying("   ");
    let classifier = OpenAiClassifier::with_provider(provider, &AiConfig::default());
    assert_eq!(classifier.classify("hmm").await.unwrap(), "unknown");
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let provider = ScriptedProvider::failing("HTTP 500");
    let classifier = OpenAiClassifier::with_provider(provider, &AiConfig::default());
    assert!(classifier.classify("show me venus").await.is_err());
}

#[test]
fn test_from_config_requires_key() {
    let config = AiConfig {
        api_key: None,
        ..Default::default()
    };
    assert!(OpenAiClassifier::from_config(&config).is_none());

    let config = AiConfig {
        api_key: Some("sk-test".to_string()),
        enabled: false,
        ..Default::default()
    };
    assert!(OpenAiClassifier::from_config(&config).is_none());

    let config = AiConfig {
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    };
    assert!(OpenAiClassifier::from_config(&config).is_some());
}
