//! Baseline classifiers that ignore the features.
use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::Classifier;

#[derive(Debug, Clone, PartialEq)]
pub enum DummyStrategy {
    /// Always answer `label` with the fixed probability vector `proba`.
    Constant { label: usize, proba: Vec<f64> },
    /// Learn class frequencies at fit time, predict the most frequent class.
    Prior,
}

/// A classifier whose output does not depend on the input row.
#[derive(Debug, Clone)]
pub struct DummyClassifier {
    strategy: DummyStrategy,
    n_classes: usize,
    priors: Option<Vec<f64>>,
}

impl DummyClassifier {
    pub fn constant(label: usize, proba: Vec<f64>) -> Result<Self> {
        if proba.is_empty() || label >= proba.len() {
            return Err(DesError::Configuration(format!(
                "label {} is not a valid class for a {}-class probability vector",
                label,
                proba.len()
            )));
        }
        let n_classes = proba.len();
        Ok(Self {
            strategy: DummyStrategy::Constant { label, proba },
            n_classes,
            priors: None,
        })
    }

    pub fn prior(n_classes: usize) -> Self {
        Self {
            strategy: DummyStrategy::Prior,
            n_classes,
            priors: None,
        }
    }

    fn row_output(&self) -> Result<(usize, &[f64])> {
        match &self.strategy {
            DummyStrategy::Constant { label, proba } => Ok((*label, proba.as_slice())),
            DummyStrategy::Prior => {
                let priors = self
                    .priors
                    .as_ref()
                    .ok_or(DesError::NotFitted("DummyClassifier"))?;
                let label = crate::math::argmax_first(priors).unwrap_or(0);
                Ok((label, priors.as_slice()))
            }
        }
    }
}

impl Classifier for DummyClassifier {
    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let (label, _) = self.row_output()?;
        Ok(vec![label; x.nrows()])
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (_, proba) = self.row_output()?;
        let mut data = Vec::with_capacity(x.nrows() * proba.len());
        for _ in 0..x.nrows() {
            data.extend_from_slice(proba);
        }
        Ok(Array2::from_shape_vec((x.nrows(), proba.len()), data)?)
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(DesError::shape("DummyClassifier::fit", x.nrows(), y.len()));
        }
        if let DummyStrategy::Prior = self.strategy {
            if y.is_empty() {
                return Err(DesError::Configuration(
                    "cannot learn priors from an empty label set".to_string(),
                ));
            }
            let mut counts = vec![0usize; self.n_classes];
            for &label in y {
                let slot = counts.get_mut(label).ok_or_else(|| {
                    DesError::Configuration(format!(
                        "label {} out of range for {} classes",
                        label, self.n_classes
                    ))
                })?;
                *slot += 1;
            }
            let total = y.len() as f64;
            self.priors = Some(counts.iter().map(|&c| c as f64 / total).collect());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "dummy"
    }
}
