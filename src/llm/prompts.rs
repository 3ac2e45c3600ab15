use crate::llm::LlmError;
use minijinja::{context, Environment};

const QUERY_PROMPT: &str = r#"Given this database schema:
{{ schema }}

Generate ONLY the {{ dialect }} SQL query (no explanations) for: {{ question }}
The response should contain only the SQL query itself, nothing else."#;

const SUMMARY_PROMPT: &str = r#"Please summarize the following query results:

{{ table }}

Focus on the key insights and trends in the data. Be concise and highlight the most important findings as markdown bullet points."#;

/// Prompt templates for the two model calls.
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    pub fn new() -> Result<Self, LlmError> {
        let mut env = Environment::new();

        // Plain-text templates: names without an html extension are never auto-escaped
        env.add_template("query.txt", QUERY_PROMPT)
            .map_err(|e| LlmError::PromptError(e.to_string()))?;
        env.add_template("summary.txt", SUMMARY_PROMPT)
            .map_err(|e| LlmError::PromptError(e.to_string()))?;

        Ok(Self { env })
    }

    pub fn query_prompt(&self, schema: &str, question: &str, dialect: &str) -> Result<String, LlmError> {
        self.render("query.txt", context! { schema, question, dialect })
    }

    pub fn summary_prompt(&self, table: &str) -> Result<String, LlmError> {
        self.render("summary.txt", context! { table })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, LlmError> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| LlmError::PromptError(format!("{}: {}", name, e)))?;
        template
            .render(ctx)
            .map_err(|e| LlmError::PromptError(format!("{}: {}", name, e)))
    }
}
