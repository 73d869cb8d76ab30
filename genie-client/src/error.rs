use reqwest::StatusCode;
use thiserror::Error;

/// Everything a backend call can fail with. None of these are fatal; the
/// caller reports them and stays usable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required input, detected before any request is sent.
    #[error("{0}")]
    Validation(String),

    /// The server rejected our token. The stored session is already cleared.
    #[error("session expired or invalid; sign in again with `genie login`")]
    Unauthorized,

    #[error("not signed in; run `genie login` first")]
    NotSignedIn,

    /// Parse-task output with no usable JSON object.
    #[error("AI response did not contain a task: {snippet}")]
    MalformedAiResponse { snippet: String },

    /// A generation is already in flight.
    #[error("an AI request is already in progress")]
    Busy,

    #[error("server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local failures around the request, e.g. the session store.
    #[error(transparent)]
    Local(#[from] anyhow::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<genie_core::DraftError> for ApiError {
    fn from(e: genie_core::DraftError) -> Self {
        ApiError::Validation(e.to_string())
    }
}
