use serde::Serialize;
use thiserror::Error;

/// Errors that end a submission
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not extract a video ID from {0:?}")]
    InvalidUrl(String),

    #[error("no captions available for video {0}")]
    NoCaptionsAvailable(String),

    #[error("transcript fetch failed: {0}")]
    Fetch(String),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Fetch(e.to_string())
    }
}

impl Error {
    /// Message for the person who submitted the URL
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidUrl(_) => {
                "Could not extract a video ID from the URL. Use a youtube.com/watch?v=, youtu.be/ or /embed/ link."
                    .to_string()
            }
            Error::NoCaptionsAvailable(_) => {
                "Could not extract a transcript. The video might not have captions.".to_string()
            }
            Error::Fetch(reason) => format!("Error extracting transcript: {reason}"),
        }
    }
}

/// A single generator call that did not produce text
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response format")]
    Malformed,

    #[error("empty response")]
    Empty,
}

/// One candidate model that failed, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelFailure {
    pub model: String,
    pub reason: String,
}

/// Why no AI summary was produced; the caller falls back to simple extraction
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "failures", rename_all = "snake_case")]
pub enum Unavailable {
    #[error("no API key configured")]
    NoCredential,

    #[error("no candidate models configured")]
    NoModels,

    #[error("all {} candidate models failed", .0.len())]
    AllModelsFailed(Vec<ModelFailure>),
}
