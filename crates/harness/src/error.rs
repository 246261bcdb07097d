use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Scenario {name} failed with {count} failure(s):\n{summary}")]
    ScenarioFailed {
        name: String,
        count: usize,
        summary: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
