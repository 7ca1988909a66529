use super::encoder::FeatureEncoder;
use crate::config::ModelEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::listing::Listing;
use crate::domain::reports::{FeatureImportance, IMPORTANCE_LIMIT, ModelQuality};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use tracing::{debug, info};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random-forest regressor of price on {rating, reviews, seller}.
pub struct PriceModel {
    encoder: FeatureEncoder,
    forest: Forest,
    quality: ModelQuality,
    importance: Vec<FeatureImportance>,
}

impl std::fmt::Debug for PriceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceModel")
            .field("features", &self.encoder.feature_names())
            .field("quality", &self.quality)
            .finish()
    }
}

impl PriceModel {
    /// Fits on a seeded shuffled split and scores on the held-out part.
    pub fn train(listings: &[Listing], config: &ModelEnvConfig) -> Result<Self, PredictionError> {
        let required = config.min_rows.max(2);
        if listings.len() < required {
            return Err(PredictionError::InsufficientData {
                rows: listings.len(),
                required,
            });
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut order: Vec<usize> = (0..listings.len()).collect();
        order.shuffle(&mut rng);

        let test_len = (listings.len() as f64 * config.test_fraction).ceil() as usize;
        if test_len >= listings.len() {
            return Err(PredictionError::EmptyTrainingSplit);
        }
        let (test_idx, train_idx) = order.split_at(test_len);
        let train: Vec<&Listing> = train_idx.iter().map(|&i| &listings[i]).collect();
        let test: Vec<&Listing> = test_idx.iter().map(|&i| &listings[i]).collect();

        let encoder = FeatureEncoder::fit(&train);
        let x_train = encoder.encode_all(train.iter().copied());
        let y_train: Vec<f64> = train.iter().map(|l| l.price).collect();

        let mut params = RandomForestRegressorParameters::default()
            .with_n_trees(config.n_trees)
            .with_seed(config.seed);
        if let Some(depth) = config.max_depth {
            params = params.with_max_depth(depth);
        }

        let forest = RandomForestRegressor::fit(&to_matrix(&x_train)?, &y_train, params)
            .map_err(|e| PredictionError::TrainingFailed {
                reason: e.to_string(),
            })?;

        let baseline = forest_predict(&forest, &x_train)?;
        let importance =
            permutation_importance(&forest, &encoder, &x_train, &y_train, &baseline, &mut rng)?;

        let quality = if test.is_empty() {
            ModelQuality {
                train_rows: train.len(),
                test_rows: 0,
                rmse: rmse(&baseline, &y_train),
                r_squared: r_squared(&baseline, &y_train),
            }
        } else {
            let x_test = encoder.encode_all(test.iter().copied());
            let y_test: Vec<f64> = test.iter().map(|l| l.price).collect();
            let predicted = forest_predict(&forest, &x_test)?;
            ModelQuality {
                train_rows: train.len(),
                test_rows: test.len(),
                rmse: rmse(&predicted, &y_test),
                r_squared: r_squared(&predicted, &y_test),
            }
        };

        info!(
            "Price model trained on {} rows, tested on {}: RMSE {:.2}, R² {}",
            quality.train_rows,
            quality.test_rows,
            quality.rmse,
            quality
                .r_squared
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "n/a".to_string())
        );

        Ok(Self {
            encoder,
            forest,
            quality,
            importance,
        })
    }

    pub fn predict(&self, listings: &[Listing]) -> Result<Vec<f64>, PredictionError> {
        if listings.is_empty() {
            return Ok(Vec::new());
        }
        forest_predict(&self.forest, &self.encoder.encode_all(listings))
    }

    pub fn quality(&self) -> ModelQuality {
        self.quality
    }

    /// Normalized importances, largest first, at most 15.
    pub fn importance(&self) -> &[FeatureImportance] {
        &self.importance
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.encoder.feature_names()
    }
}

fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, PredictionError> {
    DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| PredictionError::PredictionFailed {
        reason: format!("Matrix creation failed: {}", e),
    })
}

fn forest_predict(forest: &Forest, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError> {
    forest
        .predict(&to_matrix(rows)?)
        .map_err(|e| PredictionError::PredictionFailed {
            reason: e.to_string(),
        })
}

fn mse(predicted: &[f64], actual: &[f64]) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).powi(2))
        .sum::<f64>()
        / actual.len() as f64
}

pub fn rmse(predicted: &[f64], actual: &[f64]) -> f64 {
    mse(predicted, actual).sqrt()
}

/// None when the targets have no spread to explain.
pub fn r_squared(predicted: &[f64], actual: &[f64]) -> Option<f64> {
    if actual.len() < 2 {
        return None;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let total: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if total == 0.0 {
        return None;
    }
    let residual: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (a - p).powi(2))
        .sum();
    Some(1.0 - residual / total)
}

/// Increase in training MSE when one column is shuffled, clamped at zero
/// and scaled to sum to one.
fn permutation_importance(
    forest: &Forest,
    encoder: &FeatureEncoder,
    x: &[Vec<f64>],
    y: &[f64],
    baseline: &[f64],
    rng: &mut StdRng,
) -> Result<Vec<FeatureImportance>, PredictionError> {
    let base_error = mse(baseline, y);
    let names = encoder.feature_names();
    let mut raw = Vec::with_capacity(names.len());

    for col in 0..names.len() {
        let mut column: Vec<f64> = x.iter().map(|row| row[col]).collect();
        column.shuffle(rng);
        let permuted: Vec<Vec<f64>> = x
            .iter()
            .zip(&column)
            .map(|(row, &v)| {
                let mut row = row.clone();
                row[col] = v;
                row
            })
            .collect();
        let error = mse(&forest_predict(forest, &permuted)?, y);
        raw.push((error - base_error).max(0.0));
    }

    let total: f64 = raw.iter().sum();
    let mut importance: Vec<FeatureImportance> = names
        .into_iter()
        .zip(raw)
        .map(|(feature, score)| FeatureImportance {
            feature,
            importance: if total > 0.0 { score / total } else { 0.0 },
        })
        .collect();
    importance.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    importance.truncate(IMPORTANCE_LIMIT);
    debug!("Permutation importance: {:?}", importance);
    Ok(importance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(i: usize) -> Listing {
        let seller = ["Amazon", "Flipkart", "Meesho"][i % 3];
        let base = match seller {
            "Amazon" => 2000.0,
            "Flipkart" => 1500.0,
            _ => 600.0,
        };
        Listing {
            title: format!("Item {}", i),
            price: base + (i % 5) as f64 * 10.0,
            seller: seller.to_string(),
            source: seller.to_string(),
            rating: if i % 4 == 0 { None } else { Some(3.5 + (i % 3) as f64 * 0.5) },
            reviews: (i * 37 % 500) as u64,
            link: String::new(),
            product_id: format!("p{}", i),
            history: None,
        }
    }

    fn config() -> ModelEnvConfig {
        ModelEnvConfig {
            n_trees: 20,
            ..ModelEnvConfig::default()
        }
    }

    #[test]
    fn test_too_few_rows() {
        let rows: Vec<Listing> = (0..4).map(listing).collect();
        match PriceModel::train(&rows, &config()) {
            Err(PredictionError::InsufficientData { rows, required }) => {
                assert_eq!(rows, 4);
                assert_eq!(required, 5);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_split_sizes_and_predictions() {
        let rows: Vec<Listing> = (0..30).map(listing).collect();
        let model = PriceModel::train(&rows, &config()).unwrap();

        let quality = model.quality();
        assert_eq!(quality.test_rows, 6);
        assert_eq!(quality.train_rows, 24);
        assert!(quality.rmse.is_finite());

        let predictions = model.predict(&rows).unwrap();
        assert_eq!(predictions.len(), rows.len());
        assert!(predictions.iter().all(|p| p.is_finite() && *p > 0.0));
    }

    #[test]
    fn test_importance_is_normalized() {
        let rows: Vec<Listing> = (0..30).map(listing).collect();
        let model = PriceModel::train(&rows, &config()).unwrap();
        let importance = model.importance();

        assert!(!importance.is_empty());
        assert!(importance.len() <= IMPORTANCE_LIMIT);
        let total: f64 = importance.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-9 || total == 0.0);
        assert!(importance.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_training_is_deterministic() {
        let rows: Vec<Listing> = (0..25).map(listing).collect();
        let a = PriceModel::train(&rows, &config()).unwrap();
        let b = PriceModel::train(&rows, &config()).unwrap();
        assert_eq!(a.predict(&rows).unwrap(), b.predict(&rows).unwrap());
        assert_eq!(a.quality(), b.quality());
    }

    #[test]
    fn test_fit_metrics() {
        assert_eq!(rmse(&[1.0, 3.0], &[1.0, 1.0]), 2.0f64.sqrt());
        assert_eq!(r_squared(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), Some(1.0));
        assert_eq!(r_squared(&[1.0, 2.0], &[5.0, 5.0]), None);
        assert_eq!(r_squared(&[1.0], &[1.0]), None);
    }

    #[test]
    fn test_whole_dataset_in_test_split() {
        let rows: Vec<Listing> = (0..5).map(listing).collect();
        let config = ModelEnvConfig {
            test_fraction: 1.0,
            ..config()
        };
        assert!(matches!(
            PriceModel::train(&rows, &config),
            Err(PredictionError::EmptyTrainingSplit)
        ));
    }
}
