use super::input_validation_function::*;
use crate::error::ModelError;
use crate::math::{log_softmax, softmax};
use crate::neural_network::{ComputeBackend, LossFunction, Tensor};
use ndarray::{Array2, ArrayView1, ArrayView2};

/// Categorical cross entropy computed directly from logits and integer labels.
///
/// The loss is the batch mean of `-log(softmax(scores)[i, labels[i]])`, evaluated
/// through `log_softmax` (`scores[i] - log_sum_exp(scores[i])`) so the
/// probabilities are never materialized before the logarithm.
///
/// # Fields
///
/// - `num_classes` - Size of the label space
/// - `backend` - Compute backend used to evaluate rows
///
/// # Example
///
/// ```rust
/// use sce_loss::neural_network::CrossEntropy;
/// use ndarray::array;
///
/// let loss = CrossEntropy::new(3).unwrap();
/// let scores = array![[0.0f32, 0.0, 0.0]];
/// let labels = array![2usize];
///
/// let value = loss.compute(scores.view(), labels.view()).unwrap();
/// assert!((value - 3.0f32.ln()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CrossEntropy {
    num_classes: usize,
    backend: ComputeBackend,
}

impl CrossEntropy {
    /// Creates a new cross entropy loss.
    ///
    /// # Parameters
    ///
    /// * `num_classes` - Size of the label space, at least 1
    ///
    /// # Returns
    ///
    /// - `Ok(CrossEntropy)` - A new instance using the selected compute backend
    /// - `Err(ModelError::InvalidArgument)` - If `num_classes` is 0
    pub fn new(num_classes: usize) -> Result<Self, ModelError> {
        validate_num_classes(num_classes)?;
        Ok(Self::with_validated(num_classes, ComputeBackend::select()))
    }

    pub(super) fn with_validated(num_classes: usize, backend: ComputeBackend) -> Self {
        CrossEntropy {
            num_classes,
            backend,
        }
    }

    /// Replaces the compute backend chosen at construction.
    pub fn with_backend(mut self, backend: ComputeBackend) -> Self {
        self.backend = backend;
        self
    }

    get_field!(get_num_classes, num_classes, usize);
    get_field!(get_backend, backend, ComputeBackend);

    /// Computes the mean cross entropy of a batch.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - The batch loss
    /// - `Err(ModelError)` - If the batch is empty, shapes disagree, or a label is out of range
    pub fn compute(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<f32, ModelError> {
        validate_batch(&scores, &labels, self.num_classes)?;
        Ok(self.mean_negative_log_likelihood(&scores, &labels))
    }

    /// Computes the gradient of the mean cross entropy with respect to the logits.
    ///
    /// The gradient of a fused softmax + cross entropy is `(softmax - one_hot) / batch_size`.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f32>)` - Gradient with the same shape as `scores`
    /// - `Err(ModelError)` - If the batch is invalid
    pub fn gradient(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<Array2<f32>, ModelError> {
        validate_batch(&scores, &labels, self.num_classes)?;

        let batch_size = scores.nrows() as f32;
        let mut grad = softmax(&scores);
        self.backend.for_each_row_mut(&mut grad, |i, mut row| {
            row[labels[i]] -= 1.0;
            row.mapv_inplace(|g| g / batch_size);
        });
        Ok(grad)
    }

    /// Mean of `-log_softmax(scores)[i, labels[i]]` over an already validated batch.
    pub(super) fn mean_negative_log_likelihood(
        &self,
        scores: &ArrayView2<f32>,
        labels: &ArrayView1<usize>,
    ) -> f32 {
        let log_probabilities = log_softmax(scores);
        self.backend.mean_rows(scores.nrows(), |i| -log_probabilities[[i, labels[i]]])
    }
}

impl LossFunction for CrossEntropy {
    fn compute_loss(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<f32, ModelError> {
        let scores = scores_from_tensor(y_pred)?;
        let labels = labels_from_tensor(y_true, self.num_classes)?;
        self.compute(scores, labels.view())
    }

    fn compute_grad(&self, y_true: &Tensor, y_pred: &Tensor) -> Result<Tensor, ModelError> {
        let scores = scores_from_tensor(y_pred)?;
        let labels = labels_from_tensor(y_true, self.num_classes)?;
        Ok(self.gradient(scores, labels.view())?.into_dyn())
    }

    fn loss_name(&self) -> &str {
        "CrossEntropy"
    }
}
