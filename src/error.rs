/// A violated precondition of a coordinate conversion.
///
/// Every variant names the constraint that failed and carries the offending value.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("type mismatch: {constraint} (found {found})")]
    TypeMismatch {
        constraint: &'static str,
        found: String,
    },

    #[error("out of range: {constraint} (got {value})")]
    OutOfRange { constraint: &'static str, value: f64 },

    #[error("invalid image size: {constraint} (got {value})")]
    InvalidImageSize { constraint: &'static str, value: f64 },

    #[error("geometry violation: {constraint} (got {value})")]
    GeometryViolation { constraint: &'static str, value: f64 },
}

impl ValidationError {
    /// Identifier of the constraint that failed, e.g. `"x_min >= 0"`.
    pub fn constraint(&self) -> &'static str {
        match self {
            ValidationError::TypeMismatch { constraint, .. }
            | ValidationError::OutOfRange { constraint, .. }
            | ValidationError::InvalidImageSize { constraint, .. }
            | ValidationError::GeometryViolation { constraint, .. } => constraint,
        }
    }
}

/// Crate-level error.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Validation Error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid {split} dataset: {bad_samples} bad sample(s)")]
    InvalidDataset { split: String, bad_samples: usize },

    #[error("Argument Error: {0}")]
    Argument(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
