use serde::{Deserialize, Serialize};
use std::fmt;

/// A user identifier as typed by the user, trimmed and known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /mf/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub user_id: UserId,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_trims_and_rejects_blank() {
        assert_eq!(UserId::parse("  42\t").unwrap().as_str(), "42");
        assert!(UserId::parse("").is_none());
        assert!(UserId::parse(" \n ").is_none());
    }

    #[test]
    fn feedback_request_wire_shape() {
        let req = FeedbackRequest {
            user_id: UserId::parse("42").unwrap(),
            feedback: "more debt funds".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"user_id": "42", "feedback": "more debt funds"})
        );
    }
}
