use strata_payload::PayloadError;
use strata_structure::StructureError;

/// Errors that can occur while building or running filters.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// No filter is registered under this name.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    /// A required argument was not supplied and has no default.
    #[error("missing argument '{name}'")]
    MissingArgument { name: String },

    /// An argument is present but has the wrong shape.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    /// Preflight reported errors, so the filter was not executed.
    #[error("preflight of '{filter}' failed: {}", .errors.join("; "))]
    Preflight { filter: String, errors: Vec<String> },

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// A pipeline script could not be read or parsed.
    #[error("script error: {0}")]
    Script(String),
}

impl FilterError {
    /// Create an invalid-argument error with a name and reason.
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for filter results.
pub type FilterResult<T> = Result<T, FilterError>;
