use thiserror::Error;

/// A convenience `Result` alias using [`AddaError`].
pub type AddaResult<T> = Result<T, AddaError>;

/// Top-level error type for Adda.
///
/// Only [`AddaError::Config`] is allowed to stop a deployment. Everything a
/// turn can raise is caught by the turn runner and shown to the user as an
/// in-character reply instead.
#[derive(Error, Debug)]
pub enum AddaError {
    /// Missing credential or invalid configuration. Fatal at startup.
    #[error("Config error: {0}")]
    Config(String),

    /// Transport failure talking to the completion provider.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The provider answered, but with an error status or error payload.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Illegal turn state transition.
    #[error("Session error: {0}")]
    Session(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AddaError {
    /// Whether this error must halt the deployment rather than a single turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AddaError::Config(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn only_config_errors_are_fatal() {
        assert!(AddaError::Config("GROQ_API_KEY not set".into()).is_fatal());
        assert!(!AddaError::Http("connection refused".into()).is_fatal());
        assert!(!AddaError::Provider("401 Unauthorized".into()).is_fatal());
        assert!(!AddaError::Session("bad transition".into()).is_fatal());
    }

    #[test]
    fn display_carries_detail() {
        let err = AddaError::Http("connection reset".into());
        assert_eq!(err.to_string(), "HTTP error: connection reset");
    }

    #[test]
    fn every_variant_is_classified() {
        let io = std::io::Error::other("disk");
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            AddaError::Config("c".into()),
            AddaError::Http("h".into()),
            AddaError::Provider("p".into()),
            AddaError::Session("s".into()),
            AddaError::Json(json),
            AddaError::Io(io),
        ];
        for err in &errors {
            // Exhaustive: a new variant must decide whether it is fatal.
            let fatal = match err {
                AddaError::Config(_) => true,
                AddaError::Http(_)
                | AddaError::Provider(_)
                | AddaError::Session(_)
                | AddaError::Json(_)
                | AddaError::Io(_) => false,
            };
            assert_eq!(err.is_fatal(), fatal);
        }
    }
}
