use reqwest::StatusCode;
use thiserror::Error;

/// Failures talking to the recommendation backend.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot build request url from base {0}")]
    InvalidUrl(String),
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Input rejected locally, before any network call. The `Display` text is the message
/// shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a user ID")]
    EmptyUserId,

    #[error("Please enter feedback.")]
    EmptyFeedback,

    #[error("Error: No active user session. Please fetch data first.")]
    NoActiveSession,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected_from_status() {
        let err = RequestError::Status {
            url: "http://localhost/mf/recommendations/42".into(),
            status: StatusCode::NOT_FOUND,
            body: "{\"detail\":\"User recommendation not found\"}".into(),
        };
        assert!(err.is_not_found());

        let err = RequestError::Status {
            url: "http://localhost/mf/recommendations/42".into(),
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        };
        assert!(!err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn status_error_message_carries_response_body() {
        let err = RequestError::Status {
            url: "http://localhost/mf/recommendations/42".into(),
            status: StatusCode::NOT_FOUND,
            body: "{\"detail\":\"User recommendation not found\"}".into(),
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/mf/recommendations/42 returned HTTP 404 Not Found: \
             {\"detail\":\"User recommendation not found\"}"
        );
    }

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(ValidationError::EmptyUserId.to_string(), "Please enter a user ID");
        assert_eq!(
            ValidationError::NoActiveSession.to_string(),
            "Error: No active user session. Please fetch data first."
        );
    }
}
