use thiserror::Error;

/// Failure of a single call against the users service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("request rejected with status {status}{}", message_suffix(.message))]
    Rejected { status: u16, message: Option<String> },
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl RemoteError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// Text to show the operator: the server's own message when it sent one,
    /// otherwise the raw failure description.
    pub fn operator_reason(&self) -> String {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_reason_prefers_server_message() {
        let err = RemoteError::rejected(400, "duplicate email");
        assert_eq!(err.operator_reason(), "duplicate email");
        assert_eq!(
            err.to_string(),
            "request rejected with status 400: duplicate email"
        );
    }

    #[test]
    fn operator_reason_falls_back_to_failure_description() {
        let err = RemoteError::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(err.operator_reason(), "request rejected with status 502");

        let err = RemoteError::transport("connection refused");
        assert_eq!(err.operator_reason(), "network error: connection refused");
    }
}
