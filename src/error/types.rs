//! Snippet error types

use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use aws_smithy_types::error::operation::BuildError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Result alias used by every snippet
pub type Result<T, E = SnippetError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum SnippetError {
    /// The service answered with a modeled or unmodeled error
    #[error("{code}: {message}")]
    Service {
        code: String,
        message: String,
        kind: ServiceErrorKind,
    },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Failed to dispatch request: {0}")]
    Dispatch(String),

    #[error("Failed to construct request: {0}")]
    Construction(String),

    #[error("Unparsable response: {0}")]
    Response(String),

    /// A request type was built without one of its required fields
    #[error("Invalid request shape: {0}")]
    Build(#[from] BuildError),

    #[error("Body stream error: {0}")]
    ByteStream(#[from] aws_smithy_types::byte_stream::error::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Waiter failed: {0}")]
    Waiter(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Coarse category of a service error, derived from its error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceErrorKind {
    NotFound,
    AlreadyExists,
    AccessDenied,
    Throttling,
    Validation,
    Other,
}

impl ServiceErrorKind {
    /// Classify an AWS error code such as `NoSuchKey` or `ResourceNotFoundException`
    pub fn from_code(code: &str) -> Self {
        const NOT_FOUND: &[&str] = &["NotFound", "NoSuch"];
        const ALREADY_EXISTS: &[&str] = &["AlreadyExists", "AlreadyOwnedByYou", "ResourceInUse"];
        const ACCESS_DENIED: &[&str] = &["AccessDenied", "Unauthorized", "AuthorizationError", "Forbidden"];
        const THROTTLING: &[&str] = &[
            "Throttl",
            "TooManyRequests",
            "ProvisionedThroughputExceeded",
            "SlowDown",
            "RequestLimitExceeded",
        ];
        const VALIDATION: &[&str] = &["Validation", "InvalidParameter", "InvalidRequest", "MalformedPolicy"];

        let matches = |needles: &[&str]| needles.iter().any(|n| code.contains(n));

        if matches(NOT_FOUND) {
            ServiceErrorKind::NotFound
        } else if matches(ALREADY_EXISTS) {
            ServiceErrorKind::AlreadyExists
        } else if matches(ACCESS_DENIED) {
            ServiceErrorKind::AccessDenied
        } else if matches(THROTTLING) {
            ServiceErrorKind::Throttling
        } else if matches(VALIDATION) {
            ServiceErrorKind::Validation
        } else {
            ServiceErrorKind::Other
        }
    }
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceErrorKind::NotFound => "not_found",
            ServiceErrorKind::AlreadyExists => "already_exists",
            ServiceErrorKind::AccessDenied => "access_denied",
            ServiceErrorKind::Throttling => "throttling",
            ServiceErrorKind::Validation => "validation",
            ServiceErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

impl SnippetError {
    /// Error code reported by the service, if this is a service error
    pub fn code(&self) -> Option<&str> {
        match self {
            SnippetError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Category of the service error, if this is a service error
    pub fn kind(&self) -> Option<ServiceErrorKind> {
        match self {
            SnippetError::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether the SDK would normally consider this error transient.
    ///
    /// Snippets never retry on their own; this is only reported to the user.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SnippetError::Timeout(_)
                | SnippetError::Dispatch(_)
                | SnippetError::Service {
                    kind: ServiceErrorKind::Throttling,
                    ..
                }
        )
    }

    /// Wrap a waiter failure
    pub fn waiter<E: std::error::Error>(err: E) -> Self {
        SnippetError::Waiter(DisplayErrorContext(&err).to_string())
    }

    /// Shorthand for [`SnippetError::InvalidInput`]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        SnippetError::InvalidInput(msg.into())
    }
}

impl<E, R> From<SdkError<E, R>> for SnippetError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        match &err {
            SdkError::ServiceError(service_err) => {
                let inner = service_err.err();
                let code = inner.code().unwrap_or("Unknown").to_string();
                let message = inner
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(inner).to_string());
                let kind = ServiceErrorKind::from_code(&code);
                SnippetError::Service {
                    code,
                    message,
                    kind,
                }
            }
            SdkError::TimeoutError(_) => SnippetError::Timeout(DisplayErrorContext(&err).to_string()),
            SdkError::DispatchFailure(_) => {
                SnippetError::Dispatch(DisplayErrorContext(&err).to_string())
            }
            SdkError::ConstructionFailure(_) => {
                SnippetError::Construction(DisplayErrorContext(&err).to_string())
            }
            SdkError::ResponseError(_) => {
                SnippetError::Response(DisplayErrorContext(&err).to_string())
            }
            _ => SnippetError::Unknown(DisplayErrorContext(&err).to_string()),
        }
    }
}
