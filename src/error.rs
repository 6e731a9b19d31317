use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("OPENAI_API_KEY is not set. Export it or run `sprinkler-report config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file type for {file}: {mime} (images and PDF only)")]
    UnsupportedType { file: String, mime: String },

    #[error("Payload for {file} is not valid base64")]
    InvalidPayload { file: String },

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("No report files found in: {0}")]
    NoReportsFound(String),

    #[error("Inference API error ({status}): {body}")]
    RemoteService { status: u16, body: String },

    #[error("No response content from inference API")]
    EmptyResponse,

    #[error("Input error: {0}")]
    Prompt(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] sprinkler_report_common::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
