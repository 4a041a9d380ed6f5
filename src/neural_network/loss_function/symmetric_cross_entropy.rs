use super::CrossEntropy;
use super::input_validation_function::*;
use crate::error::ModelError;
use crate::math::{ONE_HOT_FLOOR, PROBABILITY_FLOOR, clamp, one_hot, softmax};
use crate::neural_network::{ComputeBackend, LossFunction, Tensor};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// The two terms of a Symmetric Cross Entropy evaluation and their weighted sum.
///
/// # Fields
///
/// - `cross_entropy` - Batch mean of the forward (standard) cross entropy
/// - `reverse_cross_entropy` - Batch mean of the reverse cross entropy
/// - `loss` - `alpha * cross_entropy + beta * reverse_cross_entropy`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceComponents {
    pub cross_entropy: f32,
    pub reverse_cross_entropy: f32,
    pub loss: f32,
}

/// Symmetric Cross Entropy (SCE) loss for classification with noisy labels.
///
/// SCE combines the standard cross entropy, which fits the labeled data, with a
/// reverse cross entropy that penalizes predictions inconsistent with the label:
///
/// loss = alpha * CE(scores, labels) + beta * RCE(scores, labels)
///
/// where, per sample,
///
/// RCE_i = -sum_c clamp(softmax(scores)_ic, 1e-7, 1) * ln(clamp(one_hot(labels)_ic, 1e-4, 1))
///
/// The reverse term multiplies the predicted probability by the log of the
/// clamped label. For a one-hot label this reduces to `-ln(1e-4)` times the
/// probability mass placed on the wrong classes.
///
/// # Fields
///
/// - `alpha` - Weight of the forward cross entropy term
/// - `beta` - Weight of the reverse cross entropy term
/// - `num_classes` - Size of the label space
/// - `cross_entropy` - Forward term evaluator
/// - `backend` - Compute backend, resolved once at construction
///
/// # Example
///
/// ```rust
/// use sce_loss::neural_network::SymmetricCrossEntropy;
/// use ndarray::array;
///
/// let loss = SymmetricCrossEntropy::new(0.1, 1.0, 3).unwrap();
/// let scores = array![[2.0f32, 0.5, -1.0], [0.1, 0.2, 3.0]];
/// let labels = array![0usize, 2];
///
/// let value = loss.compute(scores.view(), labels.view()).unwrap();
/// assert!(value > 0.0);
///
/// let grad = loss.gradient(scores.view(), labels.view()).unwrap();
/// assert_eq!(grad.shape(), &[2, 3]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SymmetricCrossEntropy {
    alpha: f32,
    beta: f32,
    num_classes: usize,
    cross_entropy: CrossEntropy,
    backend: ComputeBackend,
}

impl SymmetricCrossEntropy {
    /// Creates a new Symmetric Cross Entropy loss.
    ///
    /// # Parameters
    ///
    /// - `alpha` - Weight of the forward cross entropy term, non-negative
    /// - `beta` - Weight of the reverse cross entropy term, non-negative
    /// - `num_classes` - Size of the label space, at least 1
    ///
    /// # Returns
    ///
    /// - `Ok(SymmetricCrossEntropy)` - A new instance using the selected compute backend
    /// - `Err(ModelError::InvalidArgument)` - If a weight is negative or not finite, or `num_classes` is 0
    pub fn new(alpha: f32, beta: f32, num_classes: usize) -> Result<Self, ModelError> {
        validate_weight(alpha, "alpha")?;
        validate_weight(beta, "beta")?;
        validate_num_classes(num_classes)?;

        Ok(Self::with_validated(
            alpha,
            beta,
            num_classes,
            ComputeBackend::select(),
        ))
    }

    fn with_validated(alpha: f32, beta: f32, num_classes: usize, backend: ComputeBackend) -> Self {
        SymmetricCrossEntropy {
            alpha,
            beta,
            num_classes,
            cross_entropy: CrossEntropy::with_validated(num_classes, backend),
            backend,
        }
    }

    /// Replaces the compute backend chosen at construction.
    ///
    /// The backend has no effect on the computed values.
    pub fn with_backend(mut self, backend: ComputeBackend) -> Self {
        self.backend = backend;
        self.cross_entropy = self.cross_entropy.with_backend(backend);
        self
    }

    get_field!(get_alpha, alpha, f32);
    get_field!(get_beta, beta, f32);
    get_field!(get_num_classes, num_classes, usize);
    get_field!(get_backend, backend, ComputeBackend);

    /// Computes the Symmetric Cross Entropy loss of a batch.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(f32)` - `alpha * CE + beta * mean(RCE)`
    /// - `Err(ModelError::InvalidArgument)` - If the batch is empty
    /// - `Err(ModelError::ShapeMismatch)` - If batch sizes differ or the class dimension is not `num_classes`
    /// - `Err(ModelError::IndexOutOfRange)` - If a label is not in `[0, num_classes)`
    pub fn compute(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<f32, ModelError> {
        Ok(self.compute_components(scores, labels)?.loss)
    }

    /// Computes the loss together with its forward and reverse terms.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(SceComponents)` - The unweighted terms and the weighted loss
    /// - `Err(ModelError)` - Same conditions as [`SymmetricCrossEntropy::compute`]
    pub fn compute_components(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<SceComponents, ModelError> {
        validate_batch(&scores, &labels, self.num_classes)?;

        let cross_entropy = self
            .cross_entropy
            .mean_negative_log_likelihood(&scores, &labels);
        let reverse = self.reverse_terms(&scores, &labels)?;
        let reverse_cross_entropy = reverse.iter().sum::<f32>() / reverse.len() as f32;
        let loss = self.alpha * cross_entropy + self.beta * reverse_cross_entropy;

        log::trace!(
            "SCE batch of {}: ce={}, rce={}, loss={}",
            scores.nrows(),
            cross_entropy,
            reverse_cross_entropy,
            loss
        );

        Ok(SceComponents {
            cross_entropy,
            reverse_cross_entropy,
            loss,
        })
    }

    /// Computes the reverse cross entropy of every sample before the batch mean.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(Array1<f32>)` - One non-negative value per sample
    /// - `Err(ModelError)` - Same conditions as [`SymmetricCrossEntropy::compute`]
    pub fn reverse_cross_entropy_per_sample(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        validate_batch(&scores, &labels, self.num_classes)?;
        self.reverse_terms(&scores, &labels)
    }

    /// Computes the gradient of the loss with respect to the logits.
    ///
    /// For probabilities `p = softmax(scores)` and per-class weights
    /// `g_c = -ln(clamp(one_hot_c, 1e-4, 1))`, zeroed where `p_c` sits below the
    /// 1e-7 floor, the gradient of row `i` is
    ///
    /// (alpha * (p - one_hot) + beta * p * (g - sum_c g_c p_c)) / batch_size
    ///
    /// Labels receive no gradient.
    ///
    /// # Parameters
    ///
    /// - `scores` - Logits of shape \[batch_size, num_classes\]
    /// - `labels` - Class indices of shape \[batch_size\]
    ///
    /// # Returns
    ///
    /// - `Ok(Array2<f32>)` - Gradient with the same shape as `scores`
    /// - `Err(ModelError)` - Same conditions as [`SymmetricCrossEntropy::compute`]
    pub fn gradient(
        &self,
        scores: ArrayView2<f32>,
        labels: ArrayView1<usize>,
    ) -> Result<Array2<f32>, ModelError> {
        validate_batch(&scores, &labels, self.num_classes)?;

        let batch_size = scores.nrows() as f32;
        let probabilities = softmax(&scores);
        let neg_log_labels = clamp(&one_hot(&labels, self.num_classes)?, ONE_HOT_FLOOR, 1.0)
            .mapv(|q| -q.ln());
        let (alpha, beta) = (self.alpha, self.beta);

        let mut grad = Array2::<f32>::zeros(scores.raw_dim());
        self.backend.for_each_row_mut(&mut grad, |i, mut row| {
            let p = probabilities.row(i);
            let weights = neg_log_labels.row(i);
            let gated = |c: usize| {
                if p[c] >= PROBABILITY_FLOOR {
                    weights[c]
                } else {
                    0.0
                }
            };
            let expected: f32 = (0..p.len()).map(|c| gated(c) * p[c]).sum();

            for (c, g) in row.iter_mut().enumerate() {
                let target = if c == labels[i] { 1.0 } else { 0.0 };
                let forward = p[c] - target;
                let reverse = p[c] * (gated(c) - expected);
                *g = (alpha * forward + beta * reverse) / batch_size;
            }
        });
        Ok(grad)
    }

    /// Per-sample reverse cross entropy over an already validated batch.
    fn reverse_terms(
        &self,
        scores: &ArrayView2<f32>,
        labels: &ArrayView1<usize>,
    ) -> Result<Array1<f32>, ModelError> {
        let probabilities = clamp(&softmax(scores), PROBABILITY_FLOOR, 1.0);
        let one_hot_labels = clamp(&one_hot(labels, self.num_classes)?, ONE_HOT_FLOOR, 1.0);
        let log_labels = one_hot_labels.mapv(f32::ln);

        let per_sample = self.backend.map_rows(scores.nrows(), |i| {
            -(&probabilities.row(i) * &log_labels.row(i)).sum()
        });
        Ok(Array1::from(per_sample))
    }
}

impl Default for SymmetricCrossEntropy {
    /// Creates a loss with `alpha = 1.0`, `beta = 1.0` and two classes.
    fn default() -> Self {
        Self::with_validated(1.0, 1.0, 2, ComputeBackend::select())
    }
}

impl LossFunction for SymmetricCrossEntropy {
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
        "SymmetricCrossEntropy"
    }
}
