use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DesError, Result};

/// Hyper-parameters of a [`crate::Knop`] instance.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DesConfig {
    /// Size of the region of competence.
    pub k: usize,
    /// Apply dynamic frienemy pruning in `predict`.
    pub dfp: bool,
    /// Route easy queries (low instance hardness) to the k-NN rule in `predict`.
    pub with_ih: bool,
    /// Neighbors used for hardness and pruning. Defaults to `k`.
    pub safe_k: Option<usize>,
    /// Hardness threshold strictly below which a query counts as easy.
    pub ih_rate: f64,
    pub mode: SelectionMode,
    pub encoding: MetaEncoding,
}

impl Default for DesConfig {
    fn default() -> Self {
        Self {
            k: 7,
            dfp: false,
            with_ih: false,
            safe_k: None,
            ih_rate: 0.30,
            mode: SelectionMode::default(),
            encoding: MetaEncoding::default(),
        }
    }
}

impl DesConfig {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn with_dfp(mut self, dfp: bool) -> Self {
        self.dfp = dfp;
        self
    }

    pub fn with_ih(mut self, ih_rate: f64) -> Self {
        self.with_ih = true;
        self.ih_rate = ih_rate;
        self
    }

    pub fn with_safe_k(mut self, safe_k: usize) -> Self {
        self.safe_k = Some(safe_k);
        self
    }

    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_encoding(mut self, encoding: MetaEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn safe_k(&self) -> usize {
        self.safe_k.unwrap_or(self.k)
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(DesError::Configuration(
                "k must be at least 1".to_string(),
            ));
        }
        if self.safe_k() == 0 {
            return Err(DesError::Configuration(
                "safe_k must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.ih_rate) {
            return Err(DesError::Configuration(format!(
                "ih_rate must lie in [0, 1], got {}",
                self.ih_rate
            )));
        }
        Ok(())
    }
}

/// How competences turn into a selection and a vote.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Keep the classifiers with maximal competence (ties kept), plain majority vote.
    #[default]
    Selection,
    /// Every classifier votes, weighted by its competence.
    Weighting,
    /// Keep the maximal classifiers, weight their votes by competence.
    Hybrid,
}

impl FromStr for SelectionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "selection" => Ok(SelectionMode::Selection),
            "weighting" => Ok(SelectionMode::Weighting),
            "hybrid" => Ok(SelectionMode::Hybrid),
            _ => Err(format!(
                "Unknown selection mode: {}. Valid options are: selection, weighting, hybrid",
                s
            )),
        }
    }
}

/// Layout of the meta-feature (output profile) space.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetaEncoding {
    /// The full probability vector of every classifier, classifier-major.
    #[default]
    Profile,
    /// One scalar per classifier: the probability assigned to this class.
    Class(usize),
}

impl MetaEncoding {
    pub fn width(&self, n_classifiers: usize, n_classes: usize) -> usize {
        match self {
            MetaEncoding::Profile => n_classifiers * n_classes,
            MetaEncoding::Class(_) => n_classifiers,
        }
    }
}

/// Central configuration for the base classifiers shipped with the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    pub learning_rate: f32,

    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    #[cfg(feature = "svm")]
    SVM {
        eps: f64,
        c: (f64, f64),
        kernel: String,
        gaussian_kernel_eps: f64,
        polynomial_kernel_constant: f64,
        polynomial_kernel_degree: f64,
    },
    GBDT {
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GBDT {
            max_depth: 6,
            num_boost_round: 3,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gbdt" => Ok(ModelType::default()),
            #[cfg(feature = "svm")]
            "svm" => Ok(ModelType::SVM {
                eps: 0.1,
                c: (1.0, 1.0),
                kernel: "linear".to_string(),
                gaussian_kernel_eps: 0.1,
                polynomial_kernel_constant: 1.0,
                polynomial_kernel_degree: 3.0,
            }),
            _ => Err(format!(
                "Unknown model type: {}. To use svm, please compile with `--features svm`",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(learning_rate: f32, model_type: ModelType) -> Self {
        Self {
            learning_rate,
            model_type,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            model_type: ModelType::GBDT {
                max_depth: 6,
                num_boost_round: 50,
                debug: false,
                training_optimization_level: 2,
                loss_type: "LogLikelyhood".to_string(),
            },
        }
    }
}
