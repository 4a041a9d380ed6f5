pub use crate::error::ModelError;
pub use crate::math::{
    ONE_HOT_FLOOR, PROBABILITY_FLOOR, clamp, log_softmax, log_sum_exp, one_hot, softmax,
};
pub use crate::neural_network::Tensor;
pub use crate::neural_network::backend::*;
pub use crate::neural_network::criterion::*;
pub use crate::neural_network::loss_function::*;
pub use crate::traits::LossFunction;
