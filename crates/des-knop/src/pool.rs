//! The ensemble of base classifiers and its capability check.
use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::models::Classifier;

/// An ordered, immutable pool of fitted base classifiers.
pub struct Pool {
    classifiers: Vec<Box<dyn Classifier>>,
    n_classes: usize,
}

impl Pool {
    /// Validate and wrap `classifiers`.
    ///
    /// Fails with [`DesError::Configuration`] if the pool is empty, if any
    /// member lacks `predict_proba`, or if members disagree on the number of
    /// classes.
    pub fn new(classifiers: Vec<Box<dyn Classifier>>) -> Result<Self> {
        let n_classes = Self::validate(&classifiers)?;
        log::debug!(
            "Pool of {} classifiers over {} classes",
            classifiers.len(),
            n_classes
        );
        Ok(Self {
            classifiers,
            n_classes,
        })
    }

    /// Check the capabilities KNOP relies on and return the shared class count.
    pub fn validate(classifiers: &[Box<dyn Classifier>]) -> Result<usize> {
        let first = classifiers.first().ok_or_else(|| {
            DesError::Configuration("the pool of classifiers is empty".to_string())
        })?;

        for (idx, clf) in classifiers.iter().enumerate() {
            if !clf.supports_proba() {
                return Err(DesError::Configuration(format!(
                    "classifier {} ({}) is missing required capability predict_proba",
                    idx,
                    clf.name()
                )));
            }
        }

        let n_classes = first.n_classes();
        if n_classes < 2 {
            return Err(DesError::Configuration(format!(
                "classifiers must know at least two classes, got {}",
                n_classes
            )));
        }
        if let Some((idx, clf)) = classifiers
            .iter()
            .enumerate()
            .find(|(_, clf)| clf.n_classes() != n_classes)
        {
            return Err(DesError::Configuration(format!(
                "classifier {} ({}) knows {} classes, expected {}",
                idx,
                clf.name(),
                clf.n_classes(),
                n_classes
            )));
        }
        Ok(n_classes)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn get(&self, idx: usize) -> Option<&dyn Classifier> {
        self.classifiers.get(idx).map(|c| c.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Classifier> + '_ {
        self.classifiers.iter().map(|c| c.as_ref())
    }

    /// Labels of every classifier on every row, shape `(x.nrows(), len())`.
    pub fn predict_all(&self, x: &Array2<f64>) -> Result<Array2<usize>> {
        let n_rows = x.nrows();
        let mut out = Array2::zeros((n_rows, self.len()));
        for (j, clf) in self.iter().enumerate() {
            let labels = clf.predict(x)?;
            if labels.len() != n_rows {
                return Err(DesError::shape("Classifier::predict", n_rows, labels.len()));
            }
            for (i, label) in labels.into_iter().enumerate() {
                if label >= self.n_classes {
                    return Err(DesError::Model(format!(
                        "{} predicted label {} outside of 0..{}",
                        clf.name(),
                        label,
                        self.n_classes
                    )));
                }
                out[(i, j)] = label;
            }
        }
        Ok(out)
    }

    /// Probability matrices of every classifier, in pool order.
    pub fn predict_proba_all(&self, x: &Array2<f64>) -> Result<Vec<Array2<f64>>> {
        let expected = (x.nrows(), self.n_classes);
        self.iter()
            .map(|clf| {
                let proba = clf.predict_proba(x)?;
                if proba.shape() != expected {
                    return Err(DesError::shape(
                        "Classifier::predict_proba",
                        expected,
                        proba.shape(),
                    ));
                }
                Ok(proba)
            })
            .collect()
    }
}
