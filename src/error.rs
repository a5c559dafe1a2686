use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git error: {0}")]
    Git(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("AI request failed: {0}")]
    Transport(String),

    #[error("AI endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed AI response: {0}")]
    Envelope(String),

    #[error("Review cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        ScoutError::Transport(err.to_string())
    }
}

pub type ScoutResult<T> = Result<T, ScoutError>;
