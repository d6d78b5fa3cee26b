use crate::error::{DesError, Result};
use crate::math::Array2;

/// Contract every base classifier of a pool fulfils.
///
/// Labels are class indices in `0..n_classes()`. A pool only accepts
/// classifiers that report `supports_proba() == true`, since the output
/// profiles are built from `predict_proba`.
pub trait Classifier {
    /// Number of classes the classifier was trained on.
    fn n_classes(&self) -> usize;

    /// Predict one label per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>>;

    /// Whether `predict_proba` is implemented.
    fn supports_proba(&self) -> bool {
        false
    }

    /// Class probabilities, shape `(x.nrows(), n_classes())`.
    fn predict_proba(&self, _x: &Array2<f64>) -> Result<Array2<f64>> {
        Err(DesError::Configuration(format!(
            "{} does not implement predict_proba",
            self.name()
        )))
    }

    /// Fit the model in place. Pools expect already fitted classifiers, so
    /// the default refuses.
    fn fit(&mut self, _x: &Array2<f64>, _y: &[usize]) -> Result<()> {
        Err(DesError::Model(format!("{} cannot be fitted", self.name())))
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
