use serde::Serialize;
use std::error::Error;
use std::fmt;

pub type BoxError = Box<dyn Error + Send + Sync>;

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Connection,
    Schema,
    Synthesis,
    Execution,
    Summary,
    Visualization,
}

/// A stage failure. Each variant only adds a label in front of the
/// underlying error, whose message is kept as-is.
#[derive(Debug)]
pub enum PipelineError {
    Connection(BoxError),
    Schema(BoxError),
    Synthesis(BoxError),
    Execution(BoxError),
    Summary(BoxError),
    Visualization(BoxError),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Connection(_) => Stage::Connection,
            PipelineError::Schema(_) => Stage::Schema,
            PipelineError::Synthesis(_) => Stage::Synthesis,
            PipelineError::Execution(_) => Stage::Execution,
            PipelineError::Summary(_) => Stage::Summary,
            PipelineError::Visualization(_) => Stage::Visualization,
        }
    }

    fn inner(&self) -> &BoxError {
        match self {
            PipelineError::Connection(e)
            | PipelineError::Schema(e)
            | PipelineError::Synthesis(e)
            | PipelineError::Execution(e)
            | PipelineError::Summary(e)
            | PipelineError::Visualization(e) => e,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Connection(e) => write!(f, "Database connection error: {}", e),
            PipelineError::Schema(e) => write!(f, "Schema extraction error: {}", e),
            PipelineError::Synthesis(e) => write!(f, "Query generation error: {}", e),
            PipelineError::Execution(e) => write!(f, "Query execution error: {}", e),
            PipelineError::Summary(e) => write!(f, "Summarization error: {}", e),
            PipelineError::Visualization(e) => write!(f, "Visualization error: {}", e),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner().as_ref())
    }
}
