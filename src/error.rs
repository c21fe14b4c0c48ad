use std::fmt;
use std::io;

/// Failure of a single generation run
///
/// Every variant aborts the run; there is no partial output. The variants
/// line up with the three failure classes a caller has to tell apart:
/// a bad schema document, a template that failed to render, and an I/O
/// failure while packaging.
#[derive(Debug)]
pub enum GenerateError {
    /// The schema document is missing, unreadable, or malformed
    Schema {
        /// Human-readable reason
        message: String,
    },
    /// A template failed to render
    Render(askama::Error),
    /// Writing the packaged output failed
    Io(io::Error),
}

impl GenerateError {
    pub fn schema(message: impl Into<String>) -> Self {
        GenerateError::Schema {
            message: message.into(),
        }
    }

    /// HTTP status used by the service for this failure.
    ///
    /// Schema errors are the client's fault; everything else is ours.
    pub fn status(&self) -> u16 {
        match self {
            GenerateError::Schema { .. } => 400,
            GenerateError::Render(_) | GenerateError::Io(_) => 500,
        }
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Schema { message } => write!(f, "invalid schema: {message}"),
            GenerateError::Render(e) => write!(f, "template rendering failed: {e}"),
            GenerateError::Io(e) => write!(f, "writing generated sources failed: {e}"),
        }
    }
}

impl std::error::Error for GenerateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GenerateError::Schema { .. } => None,
            GenerateError::Render(e) => Some(e),
            GenerateError::Io(e) => Some(e),
        }
    }
}

impl From<askama::Error> for GenerateError {
    fn from(e: askama::Error) -> Self {
        GenerateError::Render(e)
    }
}

impl From<io::Error> for GenerateError {
    fn from(e: io::Error) -> Self {
        GenerateError::Io(e)
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(e: serde_json::Error) -> Self {
        GenerateError::schema(e.to_string())
    }
}

impl From<serde_yaml::Error> for GenerateError {
    fn from(e: serde_yaml::Error) -> Self {
        GenerateError::schema(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerateError>;
