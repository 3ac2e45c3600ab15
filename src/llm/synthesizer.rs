use crate::db::schema_inspector::SchemaDescription;
use crate::error::PipelineError;
use crate::llm::extract::{extract_query, GeneratedQuery};
use crate::llm::LlmManager;
use tracing::{debug, info, warn};

/// Asks the model for a query answering `question` against `schema`.
///
/// One call, no retry. Whatever the model answers is run through
/// [`extract_query`]; the result is not validated.
pub async fn synthesize_query(
    llm: &LlmManager,
    question: &str,
    schema: &SchemaDescription,
) -> Result<GeneratedQuery, PipelineError> {
    let settings = llm.settings();
    let prompt = llm
        .prompts()
        .query_prompt(&schema.to_string(), question, &settings.sql_dialect)
        .map_err(|e| PipelineError::Synthesis(Box::new(e)))?;
    debug!("Query prompt: {}", prompt);

    info!("Requesting SQL from {} for: {}", llm.model_name(), question);
    let response = llm
        .complete(&prompt, settings.query_max_tokens)
        .await
        .map_err(|e| PipelineError::Synthesis(Box::new(e)))?;
    debug!("Raw model response: {}", response);

    let query = extract_query(&response);
    if query.is_clean() {
        info!("Extracted SQL ({:?}): {}", query.method, query.sql);
    } else {
        warn!("No fenced block in model response, using it verbatim: {}", query.sql);
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema_inspector::{ColumnDescription, TableDescription};
    use crate::error::Stage;
    use crate::llm::extract::ExtractionMethod;
    use crate::llm::mock::ScriptedModel;

    fn tracks_schema() -> SchemaDescription {
        SchemaDescription {
            tables: vec![TableDescription {
                name: "tracks".to_string(),
                columns: vec![
                    ColumnDescription { name: "artist".into(), data_type: "VARCHAR".into() },
                    ColumnDescription { name: "name".into(), data_type: "VARCHAR".into() },
                ],
            }],
        }
    }

    #[tokio::test]
    async fn top_artists_scenario() {
        let model = ScriptedModel::new().answer(
            "```sql\nSELECT artist, COUNT(*) FROM tracks GROUP BY artist ORDER BY COUNT(*) DESC LIMIT 3\n```",
        );
        let llm = model.manager();

        let query = synthesize_query(&llm, "top 3 artists by track count", &tracks_schema())
            .await
            .unwrap();

        assert_eq!(
            query.sql,
            "SELECT artist, COUNT(*) FROM tracks GROUP BY artist ORDER BY COUNT(*) DESC LIMIT 3"
        );
        assert_eq!(query.method, ExtractionMethod::LabeledBlock);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let (prompt, max_tokens) = &prompts[0];
        assert_eq!(*max_tokens, 300);
        assert!(prompt.contains("Table: tracks\nColumns: artist (VARCHAR), name (VARCHAR)"));
        assert!(prompt.contains("top 3 artists by track count"));
    }

    #[tokio::test]
    async fn conversational_answer_is_passed_through() {
        let model = ScriptedModel::new().answer("I'm not sure which table holds artists.");
        let llm = model.manager();

        let query = synthesize_query(&llm, "who?", &tracks_schema()).await.unwrap();

        assert_eq!(query.sql, "I'm not sure which table holds artists.");
        assert_eq!(query.method, ExtractionMethod::RawResponse);
    }

    #[tokio::test]
    async fn model_failure_is_a_synthesis_error() {
        let model = ScriptedModel::new().fail("429 Too Many Requests");
        let llm = model.manager();

        let err = synthesize_query(&llm, "anything", &tracks_schema()).await.unwrap_err();

        assert_eq!(err.stage(), Stage::Synthesis);
        assert_eq!(
            err.to_string(),
            "Query generation error: LLM response error: 429 Too Many Requests"
        );
        assert_eq!(model.calls(), 1);
    }
}
