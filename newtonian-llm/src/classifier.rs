//! Object classification: free text to a single celestial object name

use crate::cache::ResponseCache;
use crate::config::{ChatRequest, Message};
use crate::error::Result;
use crate::providers::{ChatProvider, OpenAIProvider};
use async_trait::async_trait;
use newtonian_core::AiConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Token returned when the text names no celestial object
pub const UNKNOWN_OBJECT: &str = "unknown";

const SYSTEM_PROMPT: &str = "You are a telescope assistant. Extract the celestial object name \
from the user's command. Reply with ONLY the object name (moon, mars, jupiter, saturn, venus, \
mercury, sun, etc.) or 'unknown' if not a celestial object.";

/// Maps a phrase to one lower-case object token, or [`UNKNOWN_OBJECT`]
#[async_trait]
pub trait ObjectClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Trim, lower-case and drop trailing punctuation from a model reply
pub fn normalize_token(raw: &str) -> String {
    let first_line = raw.lines().next().unwrap_or("");
    first_line
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '`')
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_lowercase()
}

pub struct OpenAiClassifier {
    provider: Arc<dyn ChatProvider>,
    cache: ResponseCache,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiClassifier {
    /// Build from configuration; `None` when AI is disabled or no key is set
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        if !config.is_available() {
            return None;
        }
        let provider = OpenAIProvider::new(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_secs),
        );
        info!("AI disambiguation enabled ({})", config.model);
        Some(Self::with_provider(Arc::new(provider), config))
    }

    pub fn with_provider(provider: Arc<dyn ChatProvider>, config: &AiConfig) -> Self {
        Self {
            provider,
            cache: ResponseCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_secs),
            ),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl ObjectClassifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        let key = text.trim().to_lowercase();
        if let Some(hit) = self.cache.get(&key) {
            debug!("Classification cache hit: '{}' -> {}", key, hit);
            return Ok(hit);
        }

        let request = ChatRequest {
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(text)],
            model: Some(self.model.clone()),
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };

        let response = self.provider.chat(request).await?;
        let token = normalize_token(&response.content);
        let token = if token.is_empty() {
            UNKNOWN_OBJECT.to_string()
        } else {
            token
        };
        debug!("AI classified '{}' as '{}'", text, token);

        if token != UNKNOWN_OBJECT {
            self.cache.set(&key, token.clone());
        }
        Ok(token)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
