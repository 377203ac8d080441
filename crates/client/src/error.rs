use haulbook_core::DomainError;
use haulbook_parties::ValidationErrors;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failures of a data-access call, by origin.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: DNS, connect, timeout, reset.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx status from the API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    /// 2xx response carrying `{ "success": false }`.
    #[error("{0}")]
    Rejected(String),
    /// Body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
    /// Input refused locally; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Transport-level failures, as opposed to answers from the API.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}
