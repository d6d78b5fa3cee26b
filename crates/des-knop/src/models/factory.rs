use crate::config::ModelConfig;
use crate::models::classifier_trait::Classifier;

/// Build a boxed, unfitted base classifier from a `ModelConfig`.
pub fn build_classifier(params: ModelConfig) -> Box<dyn Classifier> {
    match params.model_type {
        crate::config::ModelType::GBDT { .. } => {
            Box::new(crate::models::gbdt::GBDTClassifier::new(params))
        }

        #[cfg(feature = "svm")]
        crate::config::ModelType::SVM { .. } => {
            Box::new(crate::models::svm::SVMClassifier::new(params))
        } // When compiled, `ModelType` only contains the variants enabled by
          // features, so no catch-all arm is necessary.
    }
}
