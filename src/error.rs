use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single outbound call to Telegram, the weather provider or SpeechKit.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} API returned {status}")]
    Status {
        service: &'static str,
        status: StatusCode,
    },

    #[error("malformed {service} response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

impl ClientError {
    pub fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        ClientError::Malformed {
            service,
            reason: reason.into(),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Only a plain 200 counts as success; any other status is `ClientError::Status`.
pub fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status == StatusCode::OK {
        Ok(response)
    } else {
        Err(ClientError::Status { service, status })
    }
}
