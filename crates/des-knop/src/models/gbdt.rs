use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;

use crate::config::{ModelConfig, ModelType};
use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::Classifier;

/// Gradient Boosting Decision Tree (GBDT) classifier for binary problems.
///
/// Class `1` is trained as the positive label (+1), class `0` as -1. With the
/// `LogLikelyhood` loss `GBDT::predict` yields P(class 1).
pub struct GBDTClassifier {
    model: Option<GBDT>,
    n_features: usize,
    params: ModelConfig,
}

impl GBDTClassifier {
    pub fn new(params: ModelConfig) -> Self {
        GBDTClassifier {
            model: None,
            n_features: 0,
            params,
        }
    }

    fn to_data_vec(x: &Array2<f64>, y: Option<&[usize]>) -> DataVec {
        let mut data = DataVec::new();
        for (i, row) in x.rows().enumerate() {
            let features = row.iter().map(|&v| v as f32).collect::<Vec<f32>>();
            let label = match y {
                Some(y) if y[i] == 1 => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            data.push(Data::new_training_data(features, 1.0, label, None));
        }
        data
    }

    /// Probability of class 1 for each row.
    fn positive_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(DesError::NotFitted("GBDTClassifier"))?;
        if x.ncols() != self.n_features {
            return Err(DesError::shape(
                "GBDTClassifier features",
                self.n_features,
                x.ncols(),
            ));
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }
        let test_x = Self::to_data_vec(x, None);
        let predictions = model.predict(&test_x);
        Ok(predictions
            .iter()
            .map(|&p| (p as f64).clamp(0.0, 1.0))
            .collect())
    }
}

impl Classifier for GBDTClassifier {
    fn n_classes(&self) -> usize {
        2
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(DesError::shape("GBDTClassifier::fit", x.nrows(), y.len()));
        }
        if x.nrows() == 0 {
            return Err(DesError::Configuration(
                "cannot fit GBDT on an empty training set".to_string(),
            ));
        }
        if let Some(bad) = y.iter().find(|&&l| l > 1) {
            return Err(DesError::Configuration(format!(
                "GBDT classifier is binary, got label {}",
                bad
            )));
        }

        match &self.params.model_type {
            ModelType::GBDT {
                max_depth,
                num_boost_round,
                debug,
                training_optimization_level,
                loss_type,
            } => {
                if *num_boost_round == 0 {
                    return Err(DesError::Configuration(
                        "num_boost_round must be at least 1".to_string(),
                    ));
                }
                let mut config = Config::new();

                config.set_feature_size(x.ncols());
                config.set_shrinkage(self.params.learning_rate);
                config.set_max_depth(*max_depth);
                config.set_iterations(*num_boost_round as usize);
                config.set_debug(*debug);
                config.set_training_optimization_level(*training_optimization_level);
                config.set_loss(loss_type);

                let mut gbdt = GBDT::new(&config);
                let mut train_x = Self::to_data_vec(x, Some(y));
                gbdt.fit(&mut train_x);

                log::debug!(
                    "Fitted GBDT with {} rounds on {} samples",
                    num_boost_round,
                    x.nrows()
                );
                self.model = Some(gbdt);
                self.n_features = x.ncols();
                Ok(())
            }
            #[cfg(feature = "svm")]
            _ => Err(DesError::Configuration(format!(
                "Expected ModelType::GBDT params, got {:?}",
                self.params.model_type
            ))),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        Ok(self
            .positive_proba(x)?
            .into_iter()
            .map(|p| usize::from(p > 0.5))
            .collect())
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let positive = self.positive_proba(x)?;
        let mut data = Vec::with_capacity(positive.len() * 2);
        for p in positive {
            data.push(1.0 - p);
            data.push(p);
        }
        Ok(Array2::from_shape_vec((x.nrows(), 2), data)?)
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
