use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecflowError {
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("invalid {kind} '{value}'")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("check '{check}' produced score {score} outside 0-100")]
    InvalidCheckScore { check: String, score: f64 },

    #[error("ai analysis failed: {0}")]
    Ai(String),

    #[error("no API key found: set the {0} environment variable")]
    MissingApiKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SpecflowError>;
