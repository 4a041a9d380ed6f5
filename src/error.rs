/// Error types that can occur while computing a loss
///
/// # Variants
///
/// - `InvalidArgument` - Indicates a hyperparameter or input that can never produce a meaningful loss (e.g. `num_classes == 0`, a negative weight, an empty batch)
/// - `ShapeMismatch` - Indicates that the scores and labels do not agree with each other or with the configured number of classes
/// - `IndexOutOfRange` - Indicates a label outside `[0, num_classes)`
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    InvalidArgument(String),
    ShapeMismatch(String),
    IndexOutOfRange(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            ModelError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            ModelError::IndexOutOfRange(msg) => write!(f, "Index out of range: {}", msg),
        }
    }
}

/// Implements the standard error trait for ModelError
impl std::error::Error for ModelError {}
