use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the completion service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to send completion request: {0}")]
    Send(#[source] reqwest::Error),
    #[error("completion request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to read completion response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("malformed completion payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("completion stream reported an error: {0}")]
    Stream(String),
    #[error("completion returned no choices")]
    NoChoices,
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("completion carried no message content")]
    EmptyCompletion,
}
