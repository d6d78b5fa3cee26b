//! Output-profile encoding: maps instances into the space spanned by the
//! pool's probability outputs.
use crate::config::MetaEncoding;
use crate::error::{DesError, Result};
use crate::math::Array2;
use crate::pool::Pool;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetaFeatureEncoder {
    encoding: MetaEncoding,
}

impl MetaFeatureEncoder {
    pub fn new(encoding: MetaEncoding) -> Self {
        Self { encoding }
    }

    pub fn encoding(&self) -> MetaEncoding {
        self.encoding
    }

    pub fn width(&self, pool: &Pool) -> usize {
        self.encoding.width(pool.len(), pool.n_classes())
    }

    /// Encode every row of `x`. Row order follows `x`, column blocks follow
    /// the pool order.
    pub fn encode(&self, pool: &Pool, x: &Array2<f64>) -> Result<Array2<f64>> {
        let n_classes = pool.n_classes();
        if let MetaEncoding::Class(class) = self.encoding {
            if class >= n_classes {
                return Err(DesError::Configuration(format!(
                    "meta-feature class {} out of range for {} classes",
                    class, n_classes
                )));
            }
        }

        let probas = pool.predict_proba_all(x)?;
        let width = self.width(pool);
        let mut out = Array2::zeros((x.nrows(), width));

        for (j, proba) in probas.iter().enumerate() {
            for i in 0..x.nrows() {
                let row = proba.row_slice(i);
                match self.encoding {
                    MetaEncoding::Profile => {
                        let start = j * n_classes;
                        out.row_slice_mut(i)[start..start + n_classes].copy_from_slice(row);
                    }
                    MetaEncoding::Class(class) => out[(i, j)] = row[class],
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dummy::DummyClassifier;
    use crate::models::Classifier;

    fn pool() -> Pool {
        Pool::new(vec![
            Box::new(DummyClassifier::constant(0, vec![0.5, 0.5]).unwrap()) as Box<dyn Classifier>,
            Box::new(DummyClassifier::constant(1, vec![1.0, 0.0]).unwrap()),
            Box::new(DummyClassifier::constant(0, vec![0.33, 0.67]).unwrap()),
        ])
        .unwrap()
    }

    #[test]
    fn test_profile_encoding() {
        let x = Array2::zeros((2, 4));
        let meta = MetaFeatureEncoder::default().encode(&pool(), &x).unwrap();
        assert_eq!(meta.shape(), (2, 6));
        assert_eq!(meta.row_slice(1), &[0.5, 0.5, 1.0, 0.0, 0.33, 0.67]);
    }

    #[test]
    fn test_class_encoding() {
        let x = Array2::zeros((1, 4));
        let meta = MetaFeatureEncoder::new(MetaEncoding::Class(1))
            .encode(&pool(), &x)
            .unwrap();
        assert_eq!(meta.row_slice(0), &[0.5, 0.0, 0.67]);
    }

    #[test]
    fn test_class_encoding_out_of_range() {
        let x = Array2::zeros((1, 4));
        let err = MetaFeatureEncoder::new(MetaEncoding::Class(2)).encode(&pool(), &x);
        assert!(matches!(err, Err(DesError::Configuration(_))));
    }
}
