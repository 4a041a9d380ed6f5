use crate::error::ModelError;
use ndarray::{Array2, ArrayBase, Data, Ix1, Ix2};

/// Lower bound applied to softmax probabilities before they enter the reverse term
pub const PROBABILITY_FLOOR: f32 = 1e-7;

/// Lower bound applied to one-hot label entries so that `ln(q)` stays finite
pub const ONE_HOT_FLOOR: f32 = 1e-4;

/// Computes `ln(sum(exp(x)))` of a single row in a numerically stable way.
///
/// The row maximum is subtracted before exponentiation so that large logits
/// cannot overflow.
///
/// # Parameters
///
/// * `row` - Unnormalized scores of one sample
///
/// # Returns
///
/// * `f32` - The log-sum-exp of the row, or negative infinity for an empty row
///
/// # Examples
/// ```rust
/// use sce_loss::math::log_sum_exp;
/// use ndarray::array;
///
/// let row = array![0.0f32, 0.0, 0.0];
/// let lse = log_sum_exp(&row);
/// assert!((lse - 3.0f32.ln()).abs() < 1e-6);
/// ```
#[inline]
pub fn log_sum_exp<S>(row: &ArrayBase<S, Ix1>) -> f32
where
    S: Data<Elem = f32>,
{
    let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
    if !max.is_finite() {
        return max;
    }
    let sum: f32 = row.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

/// Applies softmax along the class axis (axis 1) of a 2D score matrix.
///
/// softmax(x_i) = exp(x_i - max(x)) / sum_j(exp(x_j - max(x)))
///
/// # Parameters
///
/// * `scores` - Logits of shape \[batch_size, num_classes\]
///
/// # Returns
///
/// * `Array2<f32>` - Probabilities of the same shape, each row summing to 1
///
/// # Examples
/// ```rust
/// use sce_loss::math::softmax;
/// use ndarray::array;
///
/// let p = softmax(&array![[1.0f32, 1.0], [0.0, 0.0]]);
/// assert!((p[[0, 0]] - 0.5).abs() < 1e-6);
/// assert!((p.row(1).sum() - 1.0).abs() < 1e-6);
/// ```
pub fn softmax<S>(scores: &ArrayBase<S, Ix2>) -> Array2<f32>
where
    S: Data<Elem = f32>,
{
    let mut output = scores.to_owned();
    for mut row in output.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
        row.mapv_inplace(|x| (x - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|x| x / sum);
    }
    output
}

/// Applies log-softmax along the class axis of a 2D score matrix.
///
/// Computed as `x_i - log_sum_exp(x)` so the probabilities are never
/// materialized and small probabilities do not underflow to `ln(0)`.
///
/// # Parameters
///
/// * `scores` - Logits of shape \[batch_size, num_classes\]
///
/// # Returns
///
/// * `Array2<f32>` - Log-probabilities of the same shape
pub fn log_softmax<S>(scores: &ArrayBase<S, Ix2>) -> Array2<f32>
where
    S: Data<Elem = f32>,
{
    let mut output = scores.to_owned();
    for mut row in output.rows_mut() {
        let lse = log_sum_exp(&row);
        row.mapv_inplace(|x| x - lse);
    }
    output
}

/// Encodes integer class labels as one-hot rows.
///
/// # Parameters
///
/// - `labels` - Class indices, one per sample
/// - `num_classes` - Width of each one-hot row
///
/// # Returns
///
/// - `Ok(Array2<f32>)` - Matrix of shape \[labels.len(), num_classes\] with a single 1.0 per row
/// - `Err(ModelError::IndexOutOfRange)` - If any label is not smaller than `num_classes`
///
/// # Examples
/// ```rust
/// use sce_loss::math::one_hot;
/// use ndarray::array;
///
/// let encoded = one_hot(&array![1usize], 3).unwrap();
/// assert_eq!(encoded, array![[0.0f32, 1.0, 0.0]]);
/// assert!(one_hot(&array![3usize], 3).is_err());
/// ```
pub fn one_hot<S>(labels: &ArrayBase<S, Ix1>, num_classes: usize) -> Result<Array2<f32>, ModelError>
where
    S: Data<Elem = usize>,
{
    let mut encoded = Array2::<f32>::zeros((labels.len(), num_classes));
    for (i, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(ModelError::IndexOutOfRange(format!(
                "label {} at position {} is outside [0, {})",
                label, i, num_classes
            )));
        }
        encoded[[i, label]] = 1.0;
    }
    Ok(encoded)
}

/// Clamps every element of a 2D array into `[min, max]`.
///
/// NaN elements are left as NaN.
///
/// # Parameters
///
/// - `values` - Input array
/// - `min` - Lower bound
/// - `max` - Upper bound
///
/// # Returns
///
/// * `Array2<f32>` - A new array with every element clamped
#[inline]
pub fn clamp<S>(values: &ArrayBase<S, Ix2>, min: f32, max: f32) -> Array2<f32>
where
    S: Data<Elem = f32>,
{
    values.mapv(|x| if x.is_nan() { x } else { x.max(min).min(max) })
}
