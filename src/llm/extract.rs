use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// ```sql ... ``` (label matched case-insensitively; "sqlite" and "sql-server" do not count)
static LABELED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[ \t]*(?i:sql)(?:[ \t]*\n|[ \t]*\z|[ \t]+)(.*?)(?:```|\z)").unwrap()
});

static ANY_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)(?:```|\z)").unwrap());

// Info string on the opening fence line, e.g. "postgresql" or "mysql"
static INFO_STRING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ \t]*[\w.+#-]*[ \t]*$").unwrap());

// A lone statement keyword on the fence line is query text, not a label
static STATEMENT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[ \t]*(select|with|insert|update|delete|merge|create|drop|alter|show|describe|explain|pragma|values|from|summarize)[ \t]*$",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Contents of a fence labeled `sql`
    LabeledBlock,
    /// Contents of the first fence of any kind
    AnyBlock,
    /// No fence at all; the whole answer
    RawResponse,
}

/// What the query synthesizer made of a model answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedQuery {
    pub raw_response: String,
    pub sql: String,
    pub method: ExtractionMethod,
}

impl GeneratedQuery {
    pub fn is_clean(&self) -> bool {
        self.method != ExtractionMethod::RawResponse
    }
}

/// Pulls the query text out of a model answer.
///
/// Prefers a block fenced as ```sql, then any fenced block, then the whole
/// answer. The text is trimmed but otherwise not checked: prose and
/// truncated statements come back unchanged. A fence that is never closed
/// runs to the end of the answer.
pub fn extract_query(response: &str) -> GeneratedQuery {
    let (sql, method) = if let Some(caps) = LABELED_BLOCK.captures(response) {
        (caps[1].trim().to_string(), ExtractionMethod::LabeledBlock)
    } else if let Some(caps) = ANY_BLOCK.captures(response) {
        (strip_info_string(&caps[1]).trim().to_string(), ExtractionMethod::AnyBlock)
    } else {
        (response.trim().to_string(), ExtractionMethod::RawResponse)
    };

    GeneratedQuery {
        raw_response: response.to_string(),
        sql,
        method,
    }
}

fn strip_info_string(block: &str) -> &str {
    match block.split_once('\n') {
        Some((first_line, rest))
            if INFO_STRING.is_match(first_line) && !STATEMENT_KEYWORD.is_match(first_line) =>
        {
            rest
        }
        _ => block,
    }
}
