use crate::application::ml::PriceModel;
use crate::config::ModelEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::listing::Listing;
use crate::domain::reports::{Deal, FeatureImportance, ModelQuality};
use tracing::info;

/// What Agent 3 hands to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub importance: Vec<FeatureImportance>,
    pub deals: Vec<Deal>,
    pub quality: ModelQuality,
}

/// Agent 3: fair-value model and deal ranking.
pub struct PredictorAgent {
    config: ModelEnvConfig,
}

impl PredictorAgent {
    pub fn new(config: ModelEnvConfig) -> Self {
        Self { config }
    }

    /// Trains and ranks on rated listings only; unrated ones get no
    /// fair-value estimate.
    pub fn run(&self, clean: &[Listing]) -> Result<PredictionReport, PredictionError> {
        let rated: Vec<Listing> = clean
            .iter()
            .filter(|l| l.rating.is_some())
            .cloned()
            .collect();
        info!(
            "[Agent 3: Predictor] Training price model on {} of {} listings (unrated skipped)",
            rated.len(),
            clean.len()
        );
        let model = PriceModel::train(&rated, &self.config)?;
        let predicted = model.predict(&rated)?;
        let deals = rank_deals(&rated, &predicted);

        if let Some(best) = deals.first() {
            info!(
                "[Agent 3: Predictor] Best deal: '{}' at {:.2} (predicted {:.2})",
                best.title, best.price, best.predicted_price
            );
        }

        Ok(PredictionReport {
            importance: model.importance().to_vec(),
            deals,
            quality: model.quality(),
        })
    }
}

/// Pairs listings with predictions and sorts by the fair-value gap, largest
/// first.
pub fn rank_deals(clean: &[Listing], predicted: &[f64]) -> Vec<Deal> {
    let mut deals: Vec<Deal> = clean
        .iter()
        .zip(predicted)
        .map(|(l, &p)| Deal {
            title: l.title.clone(),
            seller: l.seller.clone(),
            price: l.price,
            predicted_price: p,
            price_difference: p - l.price,
            link: l.link.clone(),
        })
        .collect();
    deals.sort_by(|a, b| b.price_difference.total_cmp(&a.price_difference));
    deals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, price: f64, seller: &str) -> Listing {
        rated(title, price, seller, Some(4.0))
    }

    fn rated(title: &str, price: f64, seller: &str, rating: Option<f64>) -> Listing {
        Listing {
            title: title.to_string(),
            price,
            seller: seller.to_string(),
            source: seller.to_string(),
            rating,
            reviews: 10,
            link: format!("https://x/{}", title),
            product_id: String::new(),
            history: None,
        }
    }

    #[test]
    fn test_rank_deals_by_gap() {
        let clean = vec![
            listing("a", 100.0, "S"),
            listing("b", 50.0, "S"),
            listing("c", 200.0, "S"),
        ];
        let deals = rank_deals(&clean, &[110.0, 90.0, 150.0]);
        let titles: Vec<&str> = deals.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
        assert_eq!(deals[0].price_difference, 40.0);
        assert_eq!(deals[2].price_difference, -50.0);
    }

    #[test]
    fn test_run_covers_every_row() {
        let clean: Vec<Listing> = (0..12)
            .map(|i| listing(&format!("t{}", i), 100.0 + i as f64 * 25.0, ["A", "B"][i % 2]))
            .collect();
        let agent = PredictorAgent::new(ModelEnvConfig {
            n_trees: 10,
            ..ModelEnvConfig::default()
        });
        let report = agent.run(&clean).unwrap();
        assert_eq!(report.deals.len(), clean.len());
        assert!(
            report
                .deals
                .windows(2)
                .all(|w| w[0].price_difference >= w[1].price_difference)
        );
    }

    #[test]
    fn test_run_with_too_little_data() {
        let agent = PredictorAgent::new(ModelEnvConfig::default());
        let clean = vec![listing("a", 1.0, "A")];
        assert!(matches!(
            agent.run(&clean),
            Err(PredictionError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_unrated_rows_do_not_count_towards_training() {
        let clean: Vec<Listing> = (0..6)
            .map(|i| {
                let rating = if i < 2 { Some(4.5) } else { None };
                rated(&format!("t{}", i), 100.0 + i as f64 * 10.0, "A", rating)
            })
            .collect();
        let agent = PredictorAgent::new(ModelEnvConfig::default());
        assert!(matches!(
            agent.run(&clean),
            Err(PredictionError::InsufficientData { rows: 2, required: 5 })
        ));
    }

    #[test]
    fn test_unrated_rows_get_no_deal() {
        let clean: Vec<Listing> = (0..10)
            .map(|i| {
                let rating = if i % 3 == 0 { None } else { Some(3.0 + (i % 2) as f64) };
                rated(&format!("t{}", i), 100.0 + i as f64 * 25.0, ["A", "B"][i % 2], rating)
            })
            .collect();
        let agent = PredictorAgent::new(ModelEnvConfig {
            n_trees: 10,
            ..ModelEnvConfig::default()
        });
        let report = agent.run(&clean).unwrap();
        assert_eq!(report.deals.len(), 6);
        assert!(report.deals.iter().all(|d| !["t0", "t3", "t6", "t9"].contains(&d.title.as_str())));
        assert_eq!(report.quality.train_rows + report.quality.test_rows, 6);
    }
}
