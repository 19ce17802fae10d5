//! Client Errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` is what the service said, as close to
    /// verbatim as the body allows.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Auth session missing!")]
    MissingSession,
}

impl Error {
    /// Build an API error from a response body.
    ///
    /// GoTrue answers with `error_description` or `msg`, PostgREST with
    /// `message`; anything else falls back to the raw body.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|value| {
                ["error_description", "msg", "message", "error"]
                    .iter()
                    .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
            })
            .map(str::to_owned)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            })
            .unwrap_or_else(|| format!("request failed with status {}", status));

        Error::Api { status, message }
    }

    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True when the service itself rejected the request
    pub fn is_api(&self) -> bool {
        matches!(self, Error::Api { .. })
    }
}

/// Turn non-2xx responses into [`Error::Api`]
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::from_body(status.as_u16(), &body))
}
