use crate::db::result_set::ResultSet;
use crate::error::PipelineError;
use crate::llm::LlmManager;
use tracing::{debug, info};

/// Asks the model for a short markdown summary of `results`.
///
/// An empty result set gives an empty summary without calling the model.
/// Otherwise every row goes into the prompt; large results can exceed the
/// model's input limit and fail there.
pub async fn summarize(llm: &LlmManager, results: &ResultSet) -> Result<String, PipelineError> {
    if results.is_empty() {
        return Ok(String::new());
    }

    let table = results.to_markdown();
    let prompt = llm
        .prompts()
        .summary_prompt(&table)
        .map_err(|e| PipelineError::Summary(Box::new(e)))?;
    debug!("Summary prompt: {}", prompt);

    info!("Requesting summary of {} rows from {}", results.row_count(), llm.model_name());
    let response = llm
        .complete(&prompt, llm.settings().summary_max_tokens)
        .await
        .map_err(|e| PipelineError::Summary(Box::new(e)))?;

    Ok(response.trim().to_string())
}
