use thiserror::Error;

/// Errors produced by a single position poll.
///
/// Every variant is recovered inside the poller: it is logged, counted and
/// the previously published gauge values are left untouched.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Transport failure: {message}")]
    Transport { message: String },

    #[error("Malformed response body: {message}")]
    Parse { message: String },

    #[error("Upstream returned {status} {status_text} for {url}")]
    Status {
        status: u16,
        status_text: String,
        url: String,
        body: serde_json::Value,
    },

    #[error("Unexpected payload ({reason}): {payload}")]
    Validation {
        reason: String,
        payload: serde_json::Value,
    },
}

impl PollError {
    /// Request was aborted through its cancellation token.
    pub fn cancelled() -> Self {
        Self::Transport {
            message: "request cancelled".to_string(),
        }
    }

    /// Short label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Parse { .. } => "parse",
            Self::Status { .. } => "status",
            Self::Validation { .. } => "validation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_mentions_status_text() {
        let err = PollError::Status {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            url: "http://localhost/iss".to_string(),
            body: json!({"error": "boom"}),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("Internal Server Error"));
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_cancelled_is_transport() {
        let err = PollError::cancelled();
        assert_eq!(err.kind(), "transport");
        assert!(err.to_string().contains("cancelled"));
    }
}
