use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while turning a diagram into an image
#[derive(Error, Debug)]
pub enum RenderError {
    /// The diagram text could not be represented for a given backend
    #[error("Failed to encode diagram for {backend}: {message}")]
    EncodingError {
        backend: Arc<String>,
        message: Arc<String>,
    },

    /// A single backend failed (network, status or invalid payload)
    #[error("{name} failed: {cause}")]
    BackendError { name: Arc<String>, cause: Arc<String> },

    /// A single backend did not answer within the invocation budget
    #[error("{name} timed out after {timeout:?}")]
    BackendTimeout { name: Arc<String>, timeout: Duration },

    /// Every backend in the chain failed. Only the last cause is shown,
    /// the full history stays in `attempts`.
    #[error("Diagram could not be rendered. Last error: {last_cause}")]
    ExhaustedError {
        last_cause: Box<RenderError>,
        attempts: Arc<Vec<AttemptFailure>>,
    },

    /// The backend chain is empty
    #[error("No rendering backends configured")]
    NoBackends,

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(Arc<String>),

    /// Blank diagram text submitted through a session
    #[error("Please enter Mermaid code before rendering")]
    EmptyDiagram,

    /// A color that is not in `#RRGGBB` form
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(Arc<String>),

    /// Unknown palette preset name
    #[error("Unknown palette: {0}")]
    UnknownPalette(Arc<String>),

    /// Error when deserializing a palette or config file
    #[error("Deserialization error: {0}")]
    DeserializationError(Arc<String>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Type alias for Result with RenderError
pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    /// Build a backend failure from anything displayable
    pub fn backend(name: &str, cause: impl fmt::Display) -> Self {
        RenderError::BackendError {
            name: Arc::new(name.to_string()),
            cause: Arc::new(cause.to_string()),
        }
    }

    /// Build an encoding failure from anything displayable
    pub fn encoding(backend: &str, message: impl fmt::Display) -> Self {
        RenderError::EncodingError {
            backend: Arc::new(backend.to_string()),
            message: Arc::new(message.to_string()),
        }
    }

    /// Name of the backend this error is attributed to, if any
    pub fn backend_name(&self) -> Option<&str> {
        match self {
            RenderError::EncodingError { backend, .. } => Some(backend.as_str()),
            RenderError::BackendError { name, .. } | RenderError::BackendTimeout { name, .. } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    /// Per-backend failures are recovered by the orchestrator by moving on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenderError::EncodingError { .. }
                | RenderError::BackendError { .. }
                | RenderError::BackendTimeout { .. }
        )
    }

    /// Full per-backend failure history of an exhausted render
    pub fn attempts(&self) -> &[AttemptFailure] {
        match self {
            RenderError::ExhaustedError { attempts, .. } => attempts.as_slice(),
            _ => &[],
        }
    }
}

/// One failed backend attempt, kept for diagnostics
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    /// Zero-based position in the priority order
    pub index: usize,
    pub backend: String,
    pub error: RenderError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}: {}", self.index + 1, self.backend, self.error)
    }
}

impl From<toml::de::Error> for RenderError {
    fn from(error: toml::de::Error) -> Self {
        RenderError::DeserializationError(Arc::new(error.to_string()))
    }
}

/// Enable cloning for RenderError
impl Clone for RenderError {
    fn clone(&self) -> Self {
        match self {
            Self::EncodingError { backend, message } => Self::EncodingError {
                backend: Arc::clone(backend),
                message: Arc::clone(message),
            },
            Self::BackendError { name, cause } => Self::BackendError {
                name: Arc::clone(name),
                cause: Arc::clone(cause),
            },
            Self::BackendTimeout { name, timeout } => Self::BackendTimeout {
                name: Arc::clone(name),
                timeout: *timeout,
            },
            Self::ExhaustedError {
                last_cause,
                attempts,
            } => Self::ExhaustedError {
                last_cause: last_cause.clone(),
                attempts: Arc::clone(attempts),
            },
            Self::NoBackends => Self::NoBackends,
            Self::ConfigurationError(msg) => Self::ConfigurationError(Arc::clone(msg)),
            Self::EmptyDiagram => Self::EmptyDiagram,
            Self::InvalidColor(msg) => Self::InvalidColor(Arc::clone(msg)),
            Self::UnknownPalette(msg) => Self::UnknownPalette(Arc::clone(msg)),
            Self::DeserializationError(msg) => Self::DeserializationError(Arc::clone(msg)),
            Self::IoError(err) => Self::IoError(std::io::Error::new(err.kind(), err.to_string())),
        }
    }
}
