/// A macro that generates a getter method for any field.
///
/// This macro creates a public getter method that returns the value of the
/// specified field. The generated method includes appropriate documentation
/// describing the field being accessed.
///
/// # Parameters
///
/// - `$method_name` - The name of the getter method (e.g., get_alpha)
/// - `$field_name` - The name of the field to access (e.g., alpha)
/// - `$return_type` - The return type of the getter method
///
/// # Generated Method
///
/// The macro generates a method that returns the field value,
/// with documentation that describes what field is being accessed.
macro_rules! get_field {
    ($method_name:ident, $field_name:ident, $return_type:ty) => {
        #[doc = concat!("Gets the `", stringify!($field_name), "` field.\n\n")]
        #[doc = "# Returns\n\n"]
        #[doc = concat!("* `", stringify!($return_type), "` - The value of the `", stringify!($field_name), "` field")]
        pub fn $method_name(&self) -> $return_type {
            self.$field_name
        }
    };
}

/// Error types returned by every fallible operation in this crate.
///
/// - `InvalidArgument` - Hyperparameters or inputs that can never yield a meaningful loss
/// - `ShapeMismatch` - Scores and labels that disagree with each other or with `num_classes`
/// - `IndexOutOfRange` - Labels outside `[0, num_classes)`
pub mod error;

/// Module `math` contains the numeric primitives the losses are built from.
///
/// # Core Functions
///
/// - `softmax` - Row-wise softmax of a \[batch_size, num_classes\] score matrix
/// - `log_softmax` - Row-wise log-softmax computed through log-sum-exp
/// - `log_sum_exp` - Stable `ln(sum(exp(x)))` of a single row
/// - `one_hot` - One-hot encoding of integer labels with range checking
/// - `clamp` - Elementwise clamping into `[min, max]`
///
/// # Example
/// ```rust
/// use sce_loss::math::{clamp, one_hot, softmax, ONE_HOT_FLOOR};
/// use ndarray::array;
///
/// let p = softmax(&array![[10.0f32, -10.0]]);
/// let q = clamp(&one_hot(&array![0usize], 2).unwrap(), ONE_HOT_FLOOR, 1.0);
/// assert_eq!(q, array![[1.0f32, 1e-4]]);
/// assert!(p[[0, 0]] > 0.99);
/// ```
pub mod math;

/// Components for computing classification losses and their gradients.
///
/// # Loss Functions
/// - **SymmetricCrossEntropy**: `alpha * CE + beta * RCE`, robust to noisy labels
/// - **CrossEntropy**: Categorical cross entropy from logits and integer labels
///
/// # Supporting Types
/// - **ComputeBackend**: Sequential or rayon-parallel row evaluation, selected once at construction
/// - **LossKind** / **LossConfig**: Selection between the two criteria by name, e.g. `"SCE"` or `"CE"`
/// - **Tensor**: Type alias for n-dimensional arrays used by the `LossFunction` trait
///
/// # Examples
/// ```rust
/// use sce_loss::neural_network::*;
/// use ndarray::array;
///
/// let loss = SymmetricCrossEntropy::new(1.0, 1.0, 2).unwrap();
/// let scores = array![[10.0f32, -10.0], [-10.0, 10.0]];
/// let labels = array![0usize, 1];
///
/// let components = loss.compute_components(scores.view(), labels.view()).unwrap();
/// assert!(components.cross_entropy < 1e-6);
/// ```
pub mod neural_network;

/// A convenience module that re-exports the most commonly used types and traits from this crate.
///
/// # Examples
/// ```rust
/// use sce_loss::prelude::*;
///
/// let loss = SymmetricCrossEntropy::default();
/// assert_eq!(loss.get_num_classes(), 2);
/// ```
pub mod prelude;

/// Trait definitions shared across the crate
pub mod traits;
