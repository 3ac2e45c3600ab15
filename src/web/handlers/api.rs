use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::db::schema_inspector::SchemaDescription;
use crate::pipeline::AnalysisReport;
use crate::web::state::AppState;

// Request types

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzeRequest {
    pub question: String,
    pub database: String,
    pub title: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct DatabaseInfo {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub database: String,
    pub text: String,
    pub schema: SchemaDescription,
}

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub database_count: usize,
    pub model: String,
}

// API Implementations

/// Runs one question through the whole pipeline.
///
/// Stage failures are part of the report, so a failed analysis still
/// answers 200 with whatever was produced before the failure.
pub async fn analyze(
    state: State<Arc<AppState>>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisReport>, (StatusCode, String)> {
    if payload.question.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Please enter a question to analyze.".to_string(),
        ));
    }

    if !state.registry.contains(&payload.database) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Database '{}' not found", payload.database),
        ));
    }

    info!("Analyzing '{}' against database '{}'", payload.question, payload.database);
    let report = state
        .analyzer()
        .analyze(&payload.question, &payload.database, payload.title.as_deref())
        .await;

    Ok(Json(report))
}

pub async fn list_databases(state: State<Arc<AppState>>) -> Json<Vec<DatabaseInfo>> {
    let databases = state
        .registry
        .databases()
        .iter()
        .map(|db| DatabaseInfo {
            id: db.id.clone(),
            label: db.label.clone(),
        })
        .collect();

    Json(databases)
}

pub async fn get_schema(
    state: State<Arc<AppState>>,
    Path(database): Path<String>,
) -> Result<Json<SchemaResponse>, (StatusCode, String)> {
    if !state.registry.contains(&database) {
        return Err((StatusCode::NOT_FOUND, format!("Database '{}' not found", database)));
    }

    let schema = state.analyzer().describe(&database).await.map_err(|e| {
        error!("Failed to describe database {}: {}", database, e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(SchemaResponse {
        database,
        text: schema.to_string(),
        schema,
    }))
}

// System status
pub async fn system_status(state: State<Arc<AppState>>) -> Json<SystemStatus> {
    let now = chrono::Utc::now();
    let uptime = now.signed_duration_since(state.startup_time).num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        database_count: state.config.databases.len(),
        model: state.llm_manager.model_name().to_string(),
    })
}
