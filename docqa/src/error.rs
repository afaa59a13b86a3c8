use thiserror::Error;

/// Recoverable failure while pulling text out of a PDF.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not parse PDF: {0}")]
    Parse(String),

    #[error("PDF library aborted while reading the document")]
    Panicked,

    #[error("could not read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Recoverable failure while asking the model for an answer.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Azure OpenAI credentials are missing (set AZURE_OPENAI_API_KEY and AZURE_OPENAI_ENDPOINT)")]
    MissingCredentials,

    #[error("question is empty")]
    EmptyQuestion,

    #[error("request to the completion endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion endpoint returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode completion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("completion contained no answer text")]
    EmptyCompletion,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a number, got {value:?}")]
    InvalidNumber { key: String, value: String },
}

/// Why a question could not be answered in a session.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("Please upload a document first.")]
    NoDocument,

    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error(transparent)]
    Generation(#[from] GenerateError),
}
