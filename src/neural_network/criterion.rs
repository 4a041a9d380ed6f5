use crate::error::ModelError;
use crate::neural_network::{CrossEntropy, LossFunction, SymmetricCrossEntropy};
use std::fmt;
use std::str::FromStr;

/// The classification criteria a training run can choose between.
///
/// # Variants
///
/// - `SymmetricCrossEntropy` - Weighted sum of forward and reverse cross entropy, parsed from `"SCE"`
/// - `CrossEntropy` - Plain categorical cross entropy, parsed from `"CE"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossKind {
    SymmetricCrossEntropy,
    CrossEntropy,
}

impl FromStr for LossKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCE" => Ok(LossKind::SymmetricCrossEntropy),
            "CE" => Ok(LossKind::CrossEntropy),
            other => Err(ModelError::InvalidArgument(format!(
                "unknown loss '{}', expected 'SCE' or 'CE'",
                other
            ))),
        }
    }
}

impl fmt::Display for LossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LossKind::SymmetricCrossEntropy => write!(f, "SCE"),
            LossKind::CrossEntropy => write!(f, "CE"),
        }
    }
}

/// Configuration describing which criterion to build and with which hyperparameters.
///
/// `alpha` and `beta` are only used by the symmetric cross entropy.
///
/// # Fields
///
/// - `kind` - Which criterion to build
/// - `alpha` - Weight of the forward cross entropy term
/// - `beta` - Weight of the reverse cross entropy term
/// - `num_classes` - Size of the label space
///
/// # Example
///
/// ```rust
/// use sce_loss::neural_network::{LossConfig, LossKind};
/// use ndarray::array;
///
/// let kind: LossKind = "SCE".parse().unwrap();
/// let criterion = LossConfig::new(kind, 3)
///     .with_alpha(0.1)
///     .with_beta(1.0)
///     .build()
///     .unwrap();
///
/// let y_pred = array![[4.0f32, 0.0, 0.0]].into_dyn();
/// let y_true = array![0.0f32].into_dyn();
/// let loss = criterion.compute_loss(&y_true, &y_pred).unwrap();
/// assert!(loss > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossConfig {
    pub kind: LossKind,
    pub alpha: f32,
    pub beta: f32,
    pub num_classes: usize,
}

impl LossConfig {
    /// Creates a configuration with unit weights.
    ///
    /// # Parameters
    ///
    /// - `kind` - Which criterion to build
    /// - `num_classes` - Size of the label space
    ///
    /// # Returns
    ///
    /// * `LossConfig` - A configuration with `alpha = 1.0` and `beta = 1.0`
    pub fn new(kind: LossKind, num_classes: usize) -> Self {
        LossConfig {
            kind,
            num_classes,
            ..Self::default()
        }
    }

    /// Sets the forward term weight.
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the reverse term weight.
    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    /// Builds the configured criterion.
    ///
    /// # Returns
    ///
    /// - `Ok(Box<dyn LossFunction + Send + Sync>)` - The constructed loss
    /// - `Err(ModelError::InvalidArgument)` - If the hyperparameters are rejected by the loss constructor
    pub fn build(&self) -> Result<Box<dyn LossFunction + Send + Sync>, ModelError> {
        log::debug!(
            "Building {} criterion (alpha={}, beta={}, num_classes={})",
            self.kind,
            self.alpha,
            self.beta,
            self.num_classes
        );
        match self.kind {
            LossKind::SymmetricCrossEntropy => Ok(Box::new(SymmetricCrossEntropy::new(
                self.alpha,
                self.beta,
                self.num_classes,
            )?)),
            LossKind::CrossEntropy => Ok(Box::new(CrossEntropy::new(self.num_classes)?)),
        }
    }
}

impl Default for LossConfig {
    fn default() -> Self {
        LossConfig {
            kind: LossKind::SymmetricCrossEntropy,
            alpha: 1.0,
            beta: 1.0,
            num_classes: 2,
        }
    }
}
