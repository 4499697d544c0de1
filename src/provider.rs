use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Model;
use crate::prompts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: Model,
    pub prompt: String,
    pub thinking: bool,
    pub translate: bool,
}

impl GenerateRequest {
    pub fn plain(model: Model, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            thinking: false,
            translate: false,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("invalid or missing API credential")]
    InvalidCredential,
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("generation failed: {0}")]
    Failed(String),
}

impl ProviderError {
    /// Sorts a raw client error message into one of the known failure kinds.
    pub fn classify(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("quota") || lowered.contains("429") || lowered.contains("resource_exhausted")
        {
            ProviderError::QuotaExceeded
        } else if lowered.contains("api key")
            || lowered.contains("api_key")
            || lowered.contains("401")
            || lowered.contains("403")
            || lowered.contains("auth")
        {
            ProviderError::InvalidCredential
        } else {
            ProviderError::Failed(message.to_string())
        }
    }
}

/// Something that turns a prompt into finished response text.
#[async_trait]
pub trait ResponseProvider: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError>;
}

/// Calls the hosted model through genai.
pub struct GenaiProvider {
    client: Client,
    system_prompt: String,
    temperature: f64,
}

impl GenaiProvider {
    pub fn new(system_prompt: &str, temperature: f64) -> Self {
        Self {
            client: Client::default(),
            system_prompt: system_prompt.to_string(),
            temperature,
        }
    }
}

#[async_trait]
impl ResponseProvider for GenaiProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError> {
        debug!(
            model = %request.model,
            thinking = request.thinking,
            translate = request.translate,
            "generating response"
        );
        let system = prompts::system_message(&self.system_prompt, request.thinking, request.translate);
        let chat_req = ChatRequest::new(vec![
            ChatMessage::system(system),
            ChatMessage::user(request.prompt),
        ]);
        let options = ChatOptions::default().with_temperature(self.temperature);

        let chat_res = self
            .client
            .exec_chat(request.model.id(), chat_req, Some(&options))
            .await
            .map_err(|e| {
                warn!(error = %e, "model call failed");
                ProviderError::classify(&e.to_string())
            })?;
        chat_res
            .into_first_text()
            .ok_or_else(|| ProviderError::Failed("empty response".to_string()))
    }
}

/// Offline provider answering with fixed placeholder texts.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedProvider;

#[async_trait]
impl ResponseProvider for CannedProvider {
    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError> {
        let prompt = &request.prompt;
        let text = if request.thinking {
            format!(
                "I'm thinking deeply about \"{prompt}\"... Let me analyze this step by step.\n\n\
                 First, let's consider the key aspects of your question. There are several important elements to address.\n\n\
                 1. The primary concept involves understanding the underlying principles.\n\
                 2. We need to examine the historical context and how it evolved over time.\n\
                 3. Current research suggests multiple perspectives on this topic.\n\n\
                 After careful consideration, I believe the most comprehensive answer would acknowledge both \
                 the traditional viewpoint and more recent developments in this field."
            )
        } else if request.translate {
            format!(
                "Translation of \"{prompt}\":\n\n\
                 French: [French translation would appear here]\n\
                 Spanish: [Spanish translation would appear here]\n\
                 German: [German translation would appear here]\n\
                 Japanese: [Japanese translation would appear here]\n\
                 Chinese: [Chinese translation would appear here]"
            )
        } else {
            format!(
                "Thank you for your message. Here's my response to \"{prompt}\":\n\n\
                 This is an interesting topic that deserves careful consideration. Based on my understanding, \
                 there are multiple perspectives to consider. The key points to remember are:\n\n\
                 1. Context matters significantly when addressing this question\n\
                 2. Recent developments have changed how we think about this\n\
                 3. There are practical applications worth exploring\n\n\
                 Would you like me to elaborate on any specific aspect of this topic?"
            )
        };
        Ok(text)
    }
}
