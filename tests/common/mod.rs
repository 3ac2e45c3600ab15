#![allow(dead_code)]

use askql::config::DatabaseConfig;
use askql::db::registry::ConnectionRegistry;
use askql::llm::{GenerationSettings, LanguageModel, LlmError, LlmManager};
use async_trait::async_trait;
use duckdb::Connection;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Replays canned answers in order and records the prompts it was sent.
#[derive(Clone, Default)]
pub struct ScriptedModel {
    answers: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
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

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn manager(&self) -> LlmManager {
        LlmManager::with_model(Box::new(self.clone()), GenerationSettings::default()).unwrap()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &str, _max_tokens: usize) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
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

/// A small music catalogue on disk.
pub fn music_db(dir: &Path) -> String {
    let path = dir.join("music.duckdb");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE tracks (id INTEGER, artist VARCHAR, name VARCHAR);
         INSERT INTO tracks VALUES
            (1, 'Iron Maiden', 'Aces High'),
            (2, 'Iron Maiden', 'The Trooper'),
            (3, 'Iron Maiden', 'Wasted Years'),
            (4, 'U2', 'One'),
            (5, 'U2', 'Bad'),
            (6, 'Queen', 'Jazz'),
            (7, 'Metallica', 'One');",
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

pub fn registry(dir: &TempDir, read_only: bool) -> ConnectionRegistry {
    let path = music_db(dir.path());
    ConnectionRegistry::new(vec![DatabaseConfig {
        id: "music".to_string(),
        label: "Music".to_string(),
        path,
        read_only,
    }])
}
