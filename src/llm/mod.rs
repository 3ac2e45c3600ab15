pub mod extract;
pub mod prompts;
pub mod providers;
pub mod summarizer;
pub mod synthesizer;

#[cfg(test)]
pub(crate) mod mock;

use crate::config::LlmConfig;
use async_trait::async_trait;
use prompts::PromptLibrary;
use std::error::Error;
use std::fmt;
use tracing::info;

#[derive(Debug)]
pub enum LlmError {
    ConnectionError(String),
    ResponseError(String),
    ConfigError(String),
    PromptError(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ConnectionError(msg) => write!(f, "LLM connection error: {}", msg),
            LlmError::ResponseError(msg) => write!(f, "LLM response error: {}", msg),
            LlmError::ConfigError(msg) => write!(f, "LLM configuration error: {}", msg),
            LlmError::PromptError(msg) => write!(f, "LLM prompt error: {}", msg),
        }
    }
}

impl Error for LlmError {}

/// A text-completion backend.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one user prompt and returns the model's text answer, capped at
    /// `max_tokens` output tokens. A truncated answer is returned as-is.
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

/// Output budgets and dialect shared by both model calls of a request.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub query_max_tokens: usize,
    pub summary_max_tokens: usize,
    pub sql_dialect: String,
}

impl From<&LlmConfig> for GenerationSettings {
    fn from(config: &LlmConfig) -> Self {
        Self {
            query_max_tokens: config.query_max_tokens,
            summary_max_tokens: config.summary_max_tokens,
            sql_dialect: config.sql_dialect.clone(),
        }
    }
}

/// The configured model client plus everything needed to talk to it.
/// Created once at start-up and shared by every request.
pub struct LlmManager {
    model: Box<dyn LanguageModel>,
    prompts: PromptLibrary,
    settings: GenerationSettings,
}

impl LlmManager {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let model: Box<dyn LanguageModel> = match config.backend.as_str() {
            "anthropic" => Box::new(providers::anthropic::AnthropicProvider::new(config)?),
            "remote" => Box::new(providers::remote::RemoteLlmProvider::new(config)?),
            "ollama" => Box::new(providers::ollama::OllamaProvider::new(config)?),
            _ => {
                return Err(LlmError::ConfigError(format!(
                    "Unsupported LLM backend: {}",
                    config.backend
                )))
            }
        };

        Self::with_model(model, GenerationSettings::from(config))
    }

    pub fn with_model(
        model: Box<dyn LanguageModel>,
        settings: GenerationSettings,
    ) -> Result<Self, LlmError> {
        info!("Using language model {}", model.model_name());
        Ok(Self {
            model,
            prompts: PromptLibrary::new()?,
            settings,
        })
    }

    pub fn prompts(&self) -> &PromptLibrary {
        &self.prompts
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        self.model.complete(prompt, max_tokens).await
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            query_max_tokens: 300,
            summary_max_tokens: 300,
            sql_dialect: "DuckDB".to_string(),
        }
    }
}
