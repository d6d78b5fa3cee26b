use linfa::dataset::Pr;
use linfa::traits::Predict;
use linfa::Dataset;
use linfa_svm::Svm;
use linfa_svm::SvmParams;

use crate::config::{ModelConfig, ModelType};
use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::models::classifier_trait::Classifier;

/// Binary support vector machine with Platt-scaled probabilities.
pub struct SVMClassifier {
    model: Option<Svm<f64, Pr>>,
    params: ModelConfig,
}

impl SVMClassifier {
    pub fn new(params: ModelConfig) -> Self {
        SVMClassifier {
            model: None,
            params,
        }
    }

    fn to_ndarray(x: &Array2<f64>) -> Result<ndarray::Array2<f64>> {
        ndarray::Array2::from_shape_vec(x.shape(), x.to_vec())
            .map_err(|e| DesError::Model(e.to_string()))
    }

    fn positive_proba(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        let model = self
            .model
            .as_ref()
            .ok_or(DesError::NotFitted("SVMClassifier"))?;
        let predictions = model.predict(Self::to_ndarray(x)?);
        let targets: Vec<Pr> = predictions.targets().to_vec();
        Ok(targets.iter().map(|&v| *v as f64).collect())
    }
}

impl Classifier for SVMClassifier {
    fn n_classes(&self) -> usize {
        2
    }

    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(DesError::shape("SVMClassifier::fit", x.nrows(), y.len()));
        }
        // Class 1 is the positive side of the margin
        let y = ndarray::Array1::from_vec(y.iter().map(|&l| l == 1).collect::<Vec<bool>>());
        let dataset = Dataset::new(Self::to_ndarray(x)?, y);

        if let ModelType::SVM {
            eps,
            c,
            kernel,
            gaussian_kernel_eps,
            polynomial_kernel_constant,
            polynomial_kernel_degree,
        } = &self.params.model_type
        {
            let (c1, c2) = *c;
            let mut model: SvmParams<f64, Pr> =
                Svm::<f64, Pr>::params().eps(*eps).pos_neg_weights(c1, c2);

            model = match kernel.as_str() {
                "linear" => model.linear_kernel(),
                "gauss" => model.gaussian_kernel(*gaussian_kernel_eps),
                "poly" => {
                    model.polynomial_kernel(*polynomial_kernel_constant, *polynomial_kernel_degree)
                }
                _ => {
                    return Err(DesError::Configuration(format!(
                        "Unsupported kernel type: {}. Valid options are: linear, gauss, poly",
                        kernel
                    )))
                }
            };

            let fitted =
                <SvmParams<f64, Pr> as linfa::traits::Fit<_, _, _>>::fit(&model, &dataset)
                    .map_err(|e| DesError::Model(e.to_string()))?;
            self.model = Some(fitted);
            Ok(())
        } else {
            Err(DesError::Configuration(format!(
                "Expected ModelType::SVM params, got {:?}",
                self.params.model_type
            )))
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
        "svm"
    }
}
