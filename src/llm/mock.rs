use crate::llm::{GenerationSettings, LanguageModel, LlmError, LlmManager};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned answers and records every prompt it receives.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    answers: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub prompts: Arc<Mutex<Vec<(String, usize)>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, text: &str) -> Self {
        self.answers.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.answers.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn manager(&self) -> LlmManager {
        LlmManager::with_model(Box::new(self.clone()), GenerationSettings::default()).unwrap()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, max_tokens: usize) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push((prompt.to_string(), max_tokens));
        match self.answers.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(LlmError::ResponseError(message)),
            None => Err(LlmError::ResponseError("no scripted answer left".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
