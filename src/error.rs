use thiserror::Error;

pub type ArrayResult<T> = Result<T, ArrayError>;

// Boxed error returned by fallible group policies.
pub type PolicyError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArrayError {
    /// The array or receiver parameters do not describe a usable geometry.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A per-group phase shift policy failed or produced a non-finite offset.
    #[error("phase shift policy failed for group {group}: {reason}")]
    PolicyEvaluation { group: usize, reason: String },

    /// The requested angle sweep cannot be sampled.
    #[error("invalid sweep: {0}")]
    InvalidSweep(String),
}

impl ArrayError {
    pub(crate) fn geometry(reason: impl Into<String>) -> ArrayError {
        ArrayError::InvalidGeometry(reason.into())
    }
}
