use crate::error::Result;
use crate::math::Array2;
use crate::neighbors::NeighborSet;

/// Model fitted on the DSEL output profiles (the meta-feature space).
///
/// It answers two questions about query profiles: which DSEL profiles are
/// closest (`kneighbors`) and which label the profile space suggests
/// (`predict`).
pub trait RankingModel: Send + Sync {
    fn fit(&mut self, x_meta: &Array2<f64>, y: &[usize]) -> Result<()>;

    fn predict(&self, x_meta: &Array2<f64>) -> Result<Vec<usize>>;

    fn kneighbors(&self, x_meta: &Array2<f64>, k: usize) -> Result<NeighborSet>;

    /// Matrix the model was fitted on, if fitted.
    fn fit_data(&self) -> Option<&Array2<f64>>;

    fn name(&self) -> &str {
        "ranking-model"
    }
}
