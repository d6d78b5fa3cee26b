use anyhow::Result;

use des_knop::config::{ModelConfig, ModelType};
use des_knop::knn::KNearestNeighbors;
use des_knop::logging::init_logger;
use des_knop::math::Array2;
use des_knop::models::{factory, Classifier};
use des_knop::ranking::RankingModel;
use des_knop::{DesConfig, Knop};

fn main() -> Result<()> {
    init_logger();

    // Two overlapping diagonal bands; class 1 above x = y
    let points: Vec<(f64, f64)> = (0..40)
        .map(|i| {
            let t = i as f64 / 4.0;
            let offset = if i % 2 == 0 { -0.6 } else { 0.6 };
            (t, t + offset + ((i * 7) % 5) as f64 * 0.1 - 0.2)
        })
        .collect();
    let x = Array2::from_rows(points.iter().map(|&(a, b)| vec![a, b]).collect())?;
    let y: Vec<usize> = points.iter().map(|&(a, b)| usize::from(b > a)).collect();

    // First half trains the pool, second half is the dynamic selection set
    let train: Vec<usize> = (0..x.nrows()).filter(|i| i % 4 < 2).collect();
    let dsel: Vec<usize> = (0..x.nrows()).filter(|i| i % 4 >= 2).collect();
    let (x_train, x_dsel) = (x.select_rows(&train), x.select_rows(&dsel));
    let y_train: Vec<usize> = train.iter().map(|&i| y[i]).collect();
    let y_dsel: Vec<usize> = dsel.iter().map(|&i| y[i]).collect();

    let mut pool: Vec<Box<dyn Classifier>> = Vec::new();
    for depth in 1..=3 {
        let mut clf = factory::build_classifier(ModelConfig::new(
            0.3,
            ModelType::GBDT {
                max_depth: depth,
                num_boost_round: 10,
                debug: false,
                training_optimization_level: 2,
                loss_type: "LogLikelyhood".to_string(),
            },
        ));
        clf.fit(&x_train, &y_train)?;
        pool.push(clf);
    }

    let mut knop = Knop::new(pool, DesConfig::new(5).with_dfp(true))?;
    knop.fit(&x_dsel, &y_dsel)?;

    // Region of competence in the raw feature space
    let mut oracle = KNearestNeighbors::new(5);
    oracle.fit(&x_dsel, &y_dsel)?;
    let neighbors = oracle.kneighbors(&x, 5)?;

    let labels = knop.predict(&x, &neighbors)?;
    let correct = labels.iter().zip(&y).filter(|(p, t)| p == t).count();
    println!(
        "KNOP accuracy on {} samples: {:.3}",
        y.len(),
        correct as f64 / y.len() as f64
    );
    Ok(())
}
