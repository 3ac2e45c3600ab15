use crate::config::AppConfig;
use crate::db::registry::ConnectionRegistry;
use crate::llm::LlmManager;
use crate::pipeline::Analyzer;

/// Shared application state for the web server
pub struct AppState {
    pub config: AppConfig,
    pub registry: ConnectionRegistry,
    pub llm_manager: LlmManager,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, registry: ConnectionRegistry, llm_manager: LlmManager) -> Self {
        Self {
            config,
            registry,
            llm_manager,
            startup_time: chrono::Utc::now(),
        }
    }

    pub fn analyzer(&self) -> Analyzer<'_> {
        Analyzer::new(&self.registry, &self.llm_manager)
    }
}
