use thiserror::Error;

pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The backend answered with something other than 200.
    #[error("API error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Status failures only empty their own section; everything else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FetchError::Status { .. })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_status_errors_are_recoverable() {
        let status = FetchError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert!(status.is_recoverable());
        assert!(!FetchError::Transport("refused".into()).is_recoverable());
        assert!(!FetchError::Decode("eof".into()).is_recoverable());
    }

    #[test]
    fn status_error_carries_code_and_body() {
        let err = FetchError::Status {
            status: 404,
            body: r#"{"message":"relation does not exist"}"#.into(),
        };
        assert_eq!(
            err.to_string(),
            r#"API error (status 404): {"message":"relation does not exist"}"#
        );
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: FetchError = serde_json::from_str::<Vec<u8>>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
