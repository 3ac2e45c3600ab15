use askql::config::{AppConfig, CliArgs};
use askql::db::registry::ConnectionRegistry;
use askql::llm::LlmManager;
use askql::util::logging::init_tracing;
use askql::web::{self, state::AppState};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_tracing(args.log_json);

    // Load configuration
    let config = match AppConfig::new(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if config.databases.is_empty() {
        warn!("No databases configured; add [[databases]] entries to the configuration file");
    }
    for db in &config.databases {
        info!("Database '{}' ({}) at {}", db.id, db.label, db.path);
    }
    let registry = ConnectionRegistry::new(config.databases.clone());

    // Initialize LLM manager
    info!("Initializing LLM manager with backend: {}", config.llm.backend);
    let llm_manager = LlmManager::new(&config.llm)?;

    let web_config = config.web.clone();
    let app_state = Arc::new(AppState::new(config, registry, llm_manager));

    // Start the web server
    info!("Starting askql server on {}:{}", web_config.host, web_config.port);
    match web::run_server(web_config, app_state).await {
        Ok(_) => info!("Server stopped gracefully"),
        Err(e) => {
            error!("Server error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
