use crate::config::LlmConfig;
use crate::llm::{LanguageModel, LlmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

pub struct OllamaProvider {
    client: reqwest::Client,
    api_url: String,
    model: String,
}

#[derive(Serialize, Debug)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Debug)]
struct OllamaOptions {
    temperature: f32,
    num_predict: usize,
}

#[derive(Deserialize, Debug)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
}

impl OllamaProvider {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434/api/generate".to_string());

        let client = reqwest::Client::new();

        Ok(Self {
            client,
            api_url,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaProvider {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        info!("Sending request to Ollama with model: {}", self.model);
        debug!("API URL: {}", self.api_url);

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false, // Explicitly disable streaming
            options: OllamaOptions {
                temperature: 0.1,
                num_predict: max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::ConnectionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            // Try to get the error message from the response body
            let error_body = match response.text().await {
                Ok(body) => format!(" - Response body: {}", body),
                Err(_) => String::new(),
            };

            error!("Ollama API responded with status code: {}{}", status, error_body);
            return Err(LlmError::ResponseError(format!(
                "Ollama API responded with status code: {}{}",
                status, error_body
            )));
        }

        // Get the raw text response first for diagnostics
        let response_text = response
            .text()
            .await
            .map_err(|e| LlmError::ResponseError(format!("Failed to read response body: {}", e)))?;

        let ollama_response = match serde_json::from_str::<OllamaResponse>(&response_text) {
            Ok(resp) => resp,
            Err(e) => {
                error!("Failed to parse Ollama response: {} - Response was: {}", e, response_text);
                return Err(LlmError::ResponseError(format!(
                    "Failed to parse Ollama response: {} - Response was: {}",
                    e, response_text
                )));
            }
        };

        if ollama_response.done_reason.as_deref() == Some("length") {
            debug!("Ollama stopped at the {} token limit", max_tokens);
        }

        Ok(ollama_response.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::providers::stub_server;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn sends_generate_request_with_token_limit() {
        let (url, seen) = stub_server::start(
            StatusCode::OK,
            json!({"model": "test-model", "response": "SELECT 1", "done": true, "done_reason": "stop"}),
        )
        .await;
        let provider = OllamaProvider::new(&stub_server::config("ollama", &url)).unwrap();

        assert_eq!(provider.complete("Count tracks", 250).await.unwrap(), "SELECT 1");

        let seen = seen.lock().unwrap();
        let body = &seen[0].body;
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["prompt"], "Count tracks");
        assert_eq!(body["stream"], false);
        assert_eq!(body["options"]["num_predict"], 250);
    }

    #[tokio::test]
    async fn error_status_carries_the_body() {
        let (url, _) = stub_server::start(
            StatusCode::NOT_FOUND,
            json!({"error": "model 'test-model' not found"}),
        )
        .await;
        let provider = OllamaProvider::new(&stub_server::config("ollama", &url)).unwrap();

        match provider.complete("q", 10).await {
            Err(LlmError::ResponseError(msg)) => {
                assert!(msg.contains("404"), "{}", msg);
                assert!(msg.contains("not found"), "{}", msg);
            }
            other => panic!("expected a response error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unparseable_answer_is_a_response_error() {
        let (url, _) = stub_server::start(StatusCode::OK, json!({"unexpected": true})).await;
        let provider = OllamaProvider::new(&stub_server::config("ollama", &url)).unwrap();

        assert!(matches!(
            provider.complete("q", 10).await,
            Err(LlmError::ResponseError(_))
        ));
    }
}
