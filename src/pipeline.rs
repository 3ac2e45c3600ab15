use crate::chart::{visualize, ChartSpec};
use crate::db::db_pool::DuckDBConnectionManager;
use crate::db::executor::execute;
use crate::db::registry::ConnectionRegistry;
use crate::db::result_set::ResultSet;
use crate::db::schema_inspector::{describe_schema, SchemaDescription};
use crate::error::{BoxError, PipelineError, Stage};
use crate::llm::extract::GeneratedQuery;
use crate::llm::summarizer::summarize;
use crate::llm::synthesizer::synthesize_query;
use crate::llm::LlmManager;
use duckdb::Connection;
use r2d2::Pool;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, warn};

pub const NO_DATA_NOTICE: &str = "No data returned from the query.";

#[derive(Debug, Clone, Serialize)]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

/// Everything one question produced, stage by stage.
///
/// Outputs of stages that finished before a failure are kept.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub question: String,
    pub database: String,
    pub query: Option<GeneratedQuery>,
    pub results: Option<ResultSet>,
    pub summary: Option<String>,
    pub chart: Option<ChartSpec>,
    pub notice: Option<String>,
    pub error: Option<StageFailure>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub elapsed_ms: u64,
}

impl AnalysisReport {
    fn new(question: &str, database: &str) -> Self {
        Self {
            question: question.to_string(),
            database: database.to_string(),
            query: None,
            results: None,
            summary: None,
            chart: None,
            notice: None,
            error: None,
            started_at: chrono::Utc::now(),
            elapsed_ms: 0,
        }
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.error.as_ref().map(|e| e.stage)
    }
}

/// Runs questions through schema → query → rows → summary → chart.
pub struct Analyzer<'a> {
    registry: &'a ConnectionRegistry,
    llm: &'a LlmManager,
}

impl<'a> Analyzer<'a> {
    pub fn new(registry: &'a ConnectionRegistry, llm: &'a LlmManager) -> Self {
        Self { registry, llm }
    }

    /// Runs every stage in order, stopping at the first failure.
    ///
    /// `title` labels the chart and defaults to the question.
    pub async fn analyze(&self, question: &str, database: &str, title: Option<&str>) -> AnalysisReport {
        let start_time = Instant::now();
        let mut report = AnalysisReport::new(question, database);

        if let Err(e) = self.run(&mut report, title.unwrap_or(question)).await {
            error!("Analysis of '{}' failed at {:?}: {}", question, e.stage(), e);
            report.error = Some(StageFailure {
                stage: e.stage(),
                message: e.to_string(),
            });
        }

        report.elapsed_ms = start_time.elapsed().as_millis() as u64;
        report
    }

    async fn run(&self, report: &mut AnalysisReport, title: &str) -> Result<(), PipelineError> {
        let pool = self.registry.pool(&report.database)?;

        let schema = self.schema(pool.clone()).await?;
        info!("Schema of '{}' has {} tables", report.database, schema.tables.len());

        let query = synthesize_query(self.llm, &report.question, &schema).await?;
        let sql = query.sql.clone();
        report.query = Some(query);

        let results = with_connection(pool, PipelineError::Execution, move |conn| execute(conn, &sql)).await?;
        let results: &ResultSet = report.results.insert(results);

        if results.is_empty() {
            warn!("{}", NO_DATA_NOTICE);
            report.notice = Some(NO_DATA_NOTICE.to_string());
            return Ok(());
        }

        report.summary = Some(summarize(self.llm, results).await?);
        report.chart = visualize(results, title)?;

        Ok(())
    }

    /// Reads the current schema of `database`.
    pub async fn describe(&self, database: &str) -> Result<SchemaDescription, PipelineError> {
        let pool = self.registry.pool(database)?;
        self.schema(pool).await
    }

    async fn schema(&self, pool: Pool<DuckDBConnectionManager>) -> Result<SchemaDescription, PipelineError> {
        with_connection(pool, PipelineError::Schema, describe_schema).await
    }
}

/// Runs blocking driver work on the cached connection.
async fn with_connection<T, F>(
    pool: Pool<DuckDBConnectionManager>,
    stage: fn(BoxError) -> PipelineError,
    work: F,
) -> Result<T, PipelineError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, PipelineError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = pool.get().map_err(|e| PipelineError::Connection(Box::new(e)))?;
        work(&conn)
    })
    .await
    .map_err(|e| stage(Box::new(e)))?
}
