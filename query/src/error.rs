use crate::instant::Instant;
use serde_json::json;
use thiserror::Error;

/// Classification of every failure the data-access layer can surface.
///
/// Each request outcome maps to exactly one kind; the UI renders an error
/// affordance based on the kind without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never produced a usable response (DNS, connection, CORS).
    Network,
    /// The server or a schema rejected the submitted values.
    Validation,
    /// The caller is not signed in, or the session expired.
    Authentication,
    /// The caller is signed in but not allowed to do this.
    Authorization,
    /// The target resource does not exist.
    NotFound,
    /// The server failed (5xx).
    Server,
    /// Anything that could not be classified.
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorKind::Network => "network",
            ErrorKind::Validation => "validation",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Authorization => "authorization",
            ErrorKind::NotFound => "not found",
            ErrorKind::Server => "server",
            ErrorKind::Unknown => "unknown",
        };
        write!(f, "{label}")
    }
}

/// Status code or textual label carried alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// An HTTP status code.
    Status(u16),
    /// A free-form label (e.g. an upstream error code).
    Label(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::Status(status) => write!(f, "{status}"),
            ErrorCode::Label(label) => write!(f, "{label}"),
        }
    }
}

/// The single error type flowing through hooks, client, and callbacks.
///
/// Constructed once when a failure is observed and never mutated afterwards.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} error: {message}")]
pub struct AppError {
    /// What went wrong, coarsely.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Optional status code or label.
    pub code: Option<ErrorCode>,
    /// Optional structured payload (e.g. the original error text).
    pub details: Option<serde_json::Value>,
    /// When the error was constructed.
    pub timestamp: Instant,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            details: None,
            timestamp: Instant::now(),
        }
    }

    /// A request-level transport failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    /// A rejected submission.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Missing or expired credentials.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Insufficient permissions.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Missing resource. `resource` names what was looked up.
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{resource} not found"))
    }

    /// A 5xx failure, carrying the status as its code.
    pub fn server(message: impl Into<String>, status: u16) -> Self {
        Self::new(ErrorKind::Server, message).with_code(ErrorCode::Status(status))
    }

    /// Anything unclassifiable.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Attach a code.
    pub fn with_code(self, code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            ..self
        }
    }

    /// Attach structured details.
    pub fn with_details(self, details: serde_json::Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }

    /// Classify a non-2xx HTTP response by status code.
    pub fn from_status(status: u16, status_text: &str) -> Self {
        match status {
            400 => Self::validation("Bad request"),
            401 => Self::authentication("Unauthorized"),
            403 => Self::authorization("Forbidden"),
            404 => Self::not_found("Resource"),
            500 | 502 | 503 | 504 => Self::server("Server error", status),
            _ => Self::unknown(format!("HTTP {status}: {status_text}")),
        }
    }

    /// Normalize an arbitrary failure into an [`AppError`].
    ///
    /// Routes on message content: transport-looking messages become
    /// [`ErrorKind::Network`], credential-looking ones
    /// [`ErrorKind::Authentication`], everything else [`ErrorKind::Unknown`]
    /// with the original text preserved under `details.originalError`.
    /// An `AppError` that already exists never goes through here; the type
    /// system passes it along unchanged.
    pub fn from_unknown(source: impl std::fmt::Display) -> Self {
        let message = source.to_string();
        if message.contains("fetch") || message.contains("network") {
            Self::network(message)
        } else if message.contains("auth") || message.contains("login") {
            Self::authentication(message)
        } else {
            let details = json!({ "originalError": message.clone() });
            Self::unknown(message).with_details(details)
        }
    }

    /// Log this error with a short context label.
    pub fn log(&self, context: &str) {
        match &self.code {
            Some(code) => {
                leptos::logging::error!("{context}: {} ({} {})", self.message, self.kind, code)
            }
            None => leptos::logging::error!("{context}: {} ({})", self.message, self.kind),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_request() {
            Self::network(error.to_string())
        } else if let Some(status) = error.status() {
            Self::from_status(status.as_u16(), status.canonical_reason().unwrap_or_default())
        } else {
            Self::from_unknown(error)
        }
    }
}
