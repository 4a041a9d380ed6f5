/// Categorical Cross Entropy computed from logits and integer labels
pub mod cross_entropy;
/// Symmetric Cross Entropy loss for classification with noisy labels
pub mod symmetric_cross_entropy;

mod input_validation_function;

pub use cross_entropy::*;
pub use symmetric_cross_entropy::*;
