use std::error::Error;
use std::fmt;

use crate::math::ShapeError;

pub type Result<T> = std::result::Result<T, DesError>;

/// Errors raised by the dynamic selection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DesError {
    /// Invalid pool, hyper-parameters or labels. Raised at construction or fit time.
    Configuration(String),
    /// A prediction-time call was made before `fit`.
    NotFitted(&'static str),
    /// Inconsistent dimensions between query, neighbors, masks or model outputs.
    ShapeMismatch {
        context: &'static str,
        expected: String,
        found: String,
    },
    /// A base classifier or adapter failed.
    Model(String),
}

impl DesError {
    pub fn shape(context: &'static str, expected: impl fmt::Debug, found: impl fmt::Debug) -> Self {
        DesError::ShapeMismatch {
            context,
            expected: format!("{:?}", expected),
            found: format!("{:?}", found),
        }
    }
}

impl fmt::Display for DesError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DesError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            DesError::NotFitted(what) => {
                write!(f, "{} is not fitted yet, call `fit` before using it", what)
            }
            DesError::ShapeMismatch {
                context,
                expected,
                found,
            } => write!(
                f,
                "Shape mismatch in {}: expected {}, found {}",
                context, expected, found
            ),
            DesError::Model(msg) => write!(f, "Base model error: {}", msg),
        }
    }
}

impl Error for DesError {}

impl From<ShapeError> for DesError {
    fn from(err: ShapeError) -> Self {
        DesError::ShapeMismatch {
            context: "array construction",
            expected: format!("{} elements", err.rows() * err.cols()),
            found: format!("{} elements", err.len()),
        }
    }
}
