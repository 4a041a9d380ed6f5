use crate::error::ModelError;
use crate::neural_network::Tensor;
use ndarray::{Array1, ArrayView1, ArrayView2, Ix2};

/// Validates that the label space has at least one class.
///
/// # Parameters
///
/// * `num_classes` - The number of classes to validate
///
/// # Returns
///
/// - `Ok(())` if `num_classes` is at least 1
/// - `Err(ModelError::InvalidArgument)` if `num_classes` is 0
pub(super) fn validate_num_classes(num_classes: usize) -> Result<(), ModelError> {
    if num_classes < 1 {
        return Err(ModelError::InvalidArgument(format!(
            "num_classes must be at least 1, got {}",
            num_classes
        )));
    }
    Ok(())
}

/// Validates that a loss weight (alpha or beta) is non-negative and finite.
///
/// # Parameters
///
/// - `value` - The weight to validate
/// - `param_name` - The name of the parameter (for error messages)
///
/// # Returns
///
/// - `Ok(())` if the weight is non-negative and finite
/// - `Err(ModelError::InvalidArgument)` if the weight is negative, NaN or infinite
pub(super) fn validate_weight(value: f32, param_name: &str) -> Result<(), ModelError> {
    if !(value >= 0.0 && value.is_finite()) {
        return Err(ModelError::InvalidArgument(format!(
            "{} must be non-negative and finite, got {}",
            param_name, value
        )));
    }
    Ok(())
}

/// Validates a batch of scores and labels against the configured label space.
///
/// Checks, in order: the batch is not empty, scores and labels agree on the
/// batch size, the class dimension equals `num_classes`, and every label lies
/// in `[0, num_classes)`.
///
/// # Parameters
///
/// - `scores` - Logits of shape \[batch_size, num_classes\]
/// - `labels` - Class indices of shape \[batch_size\]
/// - `num_classes` - The configured number of classes
///
/// # Returns
///
/// - `Ok(())` if the batch is usable
/// - `Err(ModelError)` describing the first violated condition
pub(super) fn validate_batch(
    scores: &ArrayView2<f32>,
    labels: &ArrayView1<usize>,
    num_classes: usize,
) -> Result<(), ModelError> {
    let (batch_size, classes) = scores.dim();

    if batch_size == 0 {
        return Err(ModelError::InvalidArgument(
            "batch must contain at least one sample".to_string(),
        ));
    }

    if labels.len() != batch_size {
        return Err(ModelError::ShapeMismatch(format!(
            "scores have batch size {} but labels have {} entries",
            batch_size,
            labels.len()
        )));
    }

    if classes != num_classes {
        return Err(ModelError::ShapeMismatch(format!(
            "scores have {} classes but the loss is configured for {}",
            classes, num_classes
        )));
    }

    if let Some((i, &label)) = labels
        .iter()
        .enumerate()
        .find(|&(_, &label)| label >= num_classes)
    {
        return Err(ModelError::IndexOutOfRange(format!(
            "label {} at position {} is outside [0, {})",
            label, i, num_classes
        )));
    }

    Ok(())
}

/// Views a dynamic tensor of logits as a 2D \[batch_size, num_classes\] matrix.
///
/// # Parameters
///
/// * `y_pred` - Tensor of logits
///
/// # Returns
///
/// - `Ok(ArrayView2<f32>)` - A 2D view of the same data
/// - `Err(ModelError::InvalidArgument)` - If the tensor is not 2-dimensional
pub(super) fn scores_from_tensor(y_pred: &Tensor) -> Result<ArrayView2<'_, f32>, ModelError> {
    y_pred.view().into_dimensionality::<Ix2>().map_err(|_| {
        ModelError::InvalidArgument(format!(
            "scores must be 2-dimensional [batch_size, num_classes], got shape: {:?}",
            y_pred.shape()
        ))
    })
}

/// Converts a tensor of float-encoded class indices into integer labels.
///
/// Accepts shapes \[batch_size\] and \[batch_size, 1\].
///
/// # Parameters
///
/// - `y_true` - Tensor holding one class index per sample
/// - `num_classes` - The configured number of classes
///
/// # Returns
///
/// - `Ok(Array1<usize>)` - The labels as integers
/// - `Err(ModelError::ShapeMismatch)` - If the tensor has any other shape
/// - `Err(ModelError::InvalidArgument)` - If a value is not a finite integer
/// - `Err(ModelError::IndexOutOfRange)` - If a value is negative or not smaller than `num_classes`
pub(super) fn labels_from_tensor(
    y_true: &Tensor,
    num_classes: usize,
) -> Result<Array1<usize>, ModelError> {
    let shape = y_true.shape();
    let is_column = shape.len() == 1 || (shape.len() == 2 && shape[1] == 1);
    if !is_column {
        return Err(ModelError::ShapeMismatch(format!(
            "labels must have shape [batch_size] or [batch_size, 1], got shape: {:?}",
            shape
        )));
    }

    y_true
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(ModelError::InvalidArgument(format!(
                    "label at position {} must be an integer class index, got {}",
                    i, value
                )));
            }
            if value < 0.0 || value >= num_classes as f32 {
                return Err(ModelError::IndexOutOfRange(format!(
                    "label {} at position {} is outside [0, {})",
                    value, i, num_classes
                )));
            }
            Ok(value as usize)
        })
        .collect()
}
