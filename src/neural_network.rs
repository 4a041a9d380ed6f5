/// Module that contains the compute backend selection policy
pub mod backend;
/// Module that contains loss selection configuration
pub mod criterion;
/// Module that contains loss function implementations
pub mod loss_function;

pub use backend::*;
pub use criterion::*;
pub use loss_function::*;

use ndarray::ArrayD;

/// Type alias for n-dimensional arrays used as tensors in the neural network
pub type Tensor = ArrayD<f32>;

pub use crate::traits::LossFunction;
