use crate::domain::listing::Listing;
use crate::domain::reports::{
    CHEAPEST_LIMIT, CheapestListing, HISTORICAL_LIMIT, HistoricalDeal, SellerReport,
};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    pub cheapest: Vec<CheapestListing>,
    pub seller_report: Vec<SellerReport>,
    pub historic_report: Vec<HistoricalDeal>,
}

/// Agent 4: the three comparison tables.
#[derive(Debug, Default)]
pub struct ComparatorAgent;

impl ComparatorAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, clean: &[Listing]) -> ComparisonReport {
        let report = ComparisonReport {
            cheapest: cheapest(clean),
            seller_report: seller_report(clean),
            historic_report: historic_report(clean),
        };
        info!(
            "[Agent 4: Comparator] {} cheapest, {} sellers, {} historical deals",
            report.cheapest.len(),
            report.seller_report.len(),
            report.historic_report.len()
        );
        report
    }
}

pub fn cheapest(clean: &[Listing]) -> Vec<CheapestListing> {
    let mut rows: Vec<&Listing> = clean.iter().collect();
    rows.sort_by(|a, b| a.price.total_cmp(&b.price));
    rows.into_iter()
        .take(CHEAPEST_LIMIT)
        .map(|l| CheapestListing {
            title: l.title.clone(),
            price: l.price,
            seller: l.seller.clone(),
            rating: l.rating,
            reviews: l.reviews,
            link: l.link.clone(),
        })
        .collect()
}

/// Per-seller count/min/mean/max, cheapest minimum first.
pub fn seller_report(clean: &[Listing]) -> Vec<SellerReport> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    for l in clean {
        match groups.iter_mut().find(|(s, _)| *s == l.seller) {
            Some((_, prices)) => prices.push(l.price),
            None => groups.push((l.seller.clone(), vec![l.price])),
        }
    }

    let mut report: Vec<SellerReport> = groups
        .into_iter()
        .map(|(seller, prices)| SellerReport {
            num_listings: prices.len(),
            min_price: prices.iter().copied().fold(f64::INFINITY, f64::min),
            avg_price: prices.iter().sum::<f64>() / prices.len() as f64,
            max_price: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            seller,
        })
        .collect();
    report.sort_by(|a, b| a.min_price.total_cmp(&b.min_price));
    report
}

/// Listings priced furthest below their historic average.
pub fn historic_report(clean: &[Listing]) -> Vec<HistoricalDeal> {
    let mut rows: Vec<HistoricalDeal> = clean
        .iter()
        .filter_map(|l| {
            let h = l.history?;
            let saving = if h.historic_avg_price != 0.0 {
                (h.historic_avg_price - l.price) / h.historic_avg_price * 100.0
            } else {
                0.0
            };
            Some(HistoricalDeal {
                title: l.title.clone(),
                seller: l.seller.clone(),
                price: l.price,
                historic_avg_price: h.historic_avg_price,
                historical_saving_pct: saving,
                price_change_24h_pct: h.price_change_24h * 100.0,
                price_volatility: h.price_volatility,
                link: l.link.clone(),
            })
        })
        .collect();
    rows.sort_by(|a, b| b.historical_saving_pct.total_cmp(&a.historical_saving_pct));
    rows.truncate(HISTORICAL_LIMIT);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::PriceHistory;

    fn listing(title: &str, price: f64, seller: &str, avg: Option<f64>) -> Listing {
        Listing {
            title: title.to_string(),
            price,
            seller: seller.to_string(),
            source: seller.to_string(),
            rating: None,
            reviews: 0,
            link: String::new(),
            product_id: String::new(),
            history: avg.map(|a| PriceHistory {
                historic_avg_price: a,
                price_volatility: 0.1,
                price_change_24h: 0.02,
            }),
        }
    }

    #[test]
    fn test_empty_input_gives_empty_reports() {
        assert_eq!(ComparatorAgent::new().run(&[]), ComparisonReport::default());
    }

    #[test]
    fn test_cheapest_is_stable_and_limited() {
        let mut clean: Vec<Listing> = (0..15)
            .map(|i| listing(&format!("t{}", i), 100.0 + i as f64, "S", None))
            .collect();
        clean.push(listing("tie-a", 50.0, "S", None));
        clean.push(listing("tie-b", 50.0, "S", None));

        let rows = cheapest(&clean);
        assert_eq!(rows.len(), CHEAPEST_LIMIT);
        assert_eq!(rows[0].title, "tie-a");
        assert_eq!(rows[1].title, "tie-b");
        assert_eq!(rows[2].price, 100.0);
    }

    #[test]
    fn test_seller_report_sorted_by_min() {
        let clean = vec![
            listing("a", 300.0, "Myntra", None),
            listing("b", 100.0, "Myntra", None),
            listing("c", 150.0, "Ajio", None),
            listing("d", 50.0, "Meesho", None),
            listing("e", 250.0, "Ajio", None),
        ];
        let report = seller_report(&clean);
        let sellers: Vec<&str> = report.iter().map(|r| r.seller.as_str()).collect();
        assert_eq!(sellers, vec!["Meesho", "Myntra", "Ajio"]);
        assert_eq!(report[1].num_listings, 2);
        assert_eq!(report[1].avg_price, 200.0);
        assert_eq!(report[2].max_price, 250.0);
    }

    #[test]
    fn test_historic_report_savings() {
        let clean = vec![
            listing("small", 95.0, "A", Some(100.0)),
            listing("none", 80.0, "A", None),
            listing("big", 80.0, "B", Some(100.0)),
            listing("pricier", 120.0, "B", Some(100.0)),
        ];
        let report = historic_report(&clean);
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].title, "big");
        assert!((report[0].historical_saving_pct - 20.0).abs() < 1e-9);
        assert!((report[0].price_change_24h_pct - 2.0).abs() < 1e-9);
        assert!(report[2].historical_saving_pct < 0.0);
    }
}
