use crate::error::ModelError;
use crate::neural_network::Tensor;

/// Defines the interface for loss functions used in neural network training.
///
/// This trait provides methods to compute both the loss value and its gradient
/// with respect to the predicted values. Implementations validate their inputs
/// and report caller errors instead of producing NaN or infinite losses.
pub trait LossFunction {
    /// Computes the loss between true and predicted values.
    ///
    /// # Parameters
    ///
    /// - `y_true` - Tensor containing the ground truth values
    /// - `y_pred` - Tensor containing the predicted values
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The scalar loss value
    /// - `Err(ModelError)` - If the inputs are inconsistent with each other or with the loss configuration
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<f32, ModelError>;

    /// Computes the gradient of the loss with respect to the predictions.
    ///
    /// # Parameters
    ///
    /// - `y_true` - Tensor containing the ground truth values
    /// - `y_pred` - Tensor containing the predicted values
    ///
    /// # Returns
    ///
    /// - `Ok(Tensor)` - Tensor containing the gradient of the loss with respect to predictions
    /// - `Err(ModelError)` - If the inputs are inconsistent with each other or with the loss configuration
    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor, ModelError>;

    /// Returns the name of the loss function (e.g. "CrossEntropy").
    ///
    /// # Returns
    ///
    /// * `&str` - A string slice naming the loss
    fn loss_name(&self) -> &str {
        "Unknown"
    }
}
