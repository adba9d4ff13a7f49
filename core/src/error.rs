use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// The error type for vaultsign operations
#[derive(Error, Debug)]
#[error("{message}{}", display_context(.context))]
pub struct Error {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<anyhow::Error>,
    context: Vec<String>,
    status: Option<StatusCode>,
    response_body: Option<String>,
}

/// The kind of error that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Configuration error (missing fields, empty values)
    ///
    /// Raised before any network attempt is made.
    ConfigInvalid,

    /// Request cannot be assembled (invalid uri, header, etc.)
    RequestInvalid,

    /// The HTTP call failed to complete or returned a non-success status
    Transport,

    /// The call succeeded but the response lacks the expected token shape
    AuthResultInvalid,

    /// Unexpected errors
    Unexpected,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            context: Vec::new(),
            status: None,
            response_body: None,
        }
    }

    /// Add a source error
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a context line, for example the endpoint that was called.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Attach the HTTP status of the failed response.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the body of the failed response.
    pub fn with_response_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message without context lines.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context lines attached to this error.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Get the HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Get the body of the failed response, if any.
    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        self.kind == ErrorKind::ConfigInvalid
    }

    /// Check if this is a transport or protocol error
    pub fn is_transport_error(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    /// Check if this is an authentication result error
    pub fn is_auth_result_error(&self) -> bool {
        self.kind == ErrorKind::AuthResultInvalid
    }
}

// Convenience constructors
impl Error {
    /// Create a config invalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a request invalid error
    pub fn request_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RequestInvalid, message)
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Create an authentication result error
    pub fn auth_result_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthResultInvalid, message)
    }

    /// Create an unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

fn display_context(context: &[String]) -> String {
    if context.is_empty() {
        return String::new();
    }
    format!(" ({})", context.join(", "))
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConfigInvalid => write!(f, "invalid configuration"),
            ErrorKind::RequestInvalid => write!(f, "invalid request"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::AuthResultInvalid => write!(f, "invalid authentication result"),
            ErrorKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Common From implementations
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::unexpected(err.to_string()).with_source(err)
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Self::request_invalid(err.to_string()).with_source(anyhow::Error::from(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_with_context() {
        let err = Error::transport("vault login failed")
            .with_context("url: http://127.0.0.1:8200/v1/auth/aws/login")
            .with_context("role: my-role");

        assert_eq!(
            err.to_string(),
            "vault login failed (url: http://127.0.0.1:8200/v1/auth/aws/login, role: my-role)"
        );
        assert_eq!(err.message(), "vault login failed");
    }

    #[test]
    fn test_transport_error_carries_status() {
        let err = Error::transport("vault login failed")
            .with_status(StatusCode::FORBIDDEN)
            .with_response_body(r#"{"errors":["permission denied"]}"#);

        assert!(err.is_transport_error());
        assert!(!err.is_auth_result_error());
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(
            err.response_body(),
            Some(r#"{"errors":["permission denied"]}"#)
        );
    }

    #[test]
    fn test_source_is_chained() {
        let cause = serde_like_failure();
        let err = Error::auth_result_invalid("unable to authenticate to vault").with_source(cause);

        assert!(err.is_auth_result_error());
        let source = err.source().expect("source must be kept");
        assert_eq!(source.to_string(), "missing field `client_token`");
    }

    fn serde_like_failure() -> anyhow::Error {
        anyhow::anyhow!("missing field `client_token`")
    }
}
