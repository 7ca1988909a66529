use crate::application::pipeline::{Stage, StageStatus};
use crate::domain::listing::RawListing;
use crate::domain::reports::{
    CheapestListing, Deal, FeatureImportance, HistoricalDeal, ModelQuality, SellerReport,
};
use crate::interfaces::format::{
    format_change_pct, format_inr, format_pct, format_volatility, truncate,
};

const TITLE_WIDTH: usize = 60;

/// One table cell, before styling.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    /// Coloured by sign.
    Signed(String, f64),
    Link { label: String, url: String },
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn link(url: &str) -> Self {
        if url.is_empty() {
            Cell::text("")
        } else {
            Cell::Link {
                label: "Open".to_string(),
                url: url.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// Sidebar line for one stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageLine {
    Pending,
    Running(&'static str),
    Done(&'static str),
    Failed(String),
}

pub struct DashboardViewModel;

impl DashboardViewModel {
    pub fn stage_line(stage: Stage, status: Option<&StageStatus>) -> StageLine {
        match status {
            None => StageLine::Pending,
            Some(StageStatus::Started) => StageLine::Running(stage.running_label()),
            Some(StageStatus::Completed) => StageLine::Done(stage.done_label()),
            Some(StageStatus::Failed(msg)) => StageLine::Failed(msg.clone()),
        }
    }

    pub fn cheapest_table(rows: &[CheapestListing]) -> TableData {
        TableData {
            headers: vec!["Title", "Price", "Seller", "Rating", "Reviews", "Link"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(truncate(&r.title, TITLE_WIDTH)),
                        Cell::text(format_inr(r.price)),
                        Cell::text(&r.seller),
                        Cell::text(r.rating.map(|v| format!("{:.1}", v)).unwrap_or_default()),
                        Cell::text(r.reviews.to_string()),
                        Cell::link(&r.link),
                    ]
                })
                .collect(),
        }
    }

    pub fn seller_table(rows: &[SellerReport]) -> TableData {
        TableData {
            headers: vec!["Seller", "Listings", "Min Price", "Avg Price", "Max Price"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(&r.seller),
                        Cell::text(r.num_listings.to_string()),
                        Cell::text(format_inr(r.min_price)),
                        Cell::text(format_inr(r.avg_price)),
                        Cell::text(format_inr(r.max_price)),
                    ]
                })
                .collect(),
        }
    }

    pub fn historical_table(rows: &[HistoricalDeal]) -> TableData {
        TableData {
            headers: vec![
                "Title",
                "Seller",
                "Price",
                "7-Day Avg",
                "Saving",
                "24h Change",
                "Volatility",
                "Link",
            ],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(truncate(&r.title, TITLE_WIDTH)),
                        Cell::text(&r.seller),
                        Cell::text(format_inr(r.price)),
                        Cell::text(format_inr(r.historic_avg_price)),
                        Cell::Signed(format_pct(r.historical_saving_pct), r.historical_saving_pct),
                        Cell::Signed(
                            format_change_pct(r.price_change_24h_pct),
                            // A price drop is good news for the buyer
                            -r.price_change_24h_pct,
                        ),
                        Cell::text(format_volatility(r.price_volatility)),
                        Cell::link(&r.link),
                    ]
                })
                .collect(),
        }
    }

    pub fn deals_table(rows: &[Deal]) -> TableData {
        TableData {
            headers: vec!["Title", "Seller", "Price", "Predicted", "Difference", "Link"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(truncate(&r.title, TITLE_WIDTH)),
                        Cell::text(&r.seller),
                        Cell::text(format_inr(r.price)),
                        Cell::text(format_inr(r.predicted_price)),
                        Cell::Signed(format_inr(r.price_difference), r.price_difference),
                        Cell::link(&r.link),
                    ]
                })
                .collect(),
        }
    }

    pub fn importance_table(rows: &[FeatureImportance]) -> TableData {
        TableData {
            headers: vec!["Feature", "Importance"],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(&r.feature),
                        Cell::text(format!("{:.4}", r.importance)),
                    ]
                })
                .collect(),
        }
    }

    pub fn raw_table(rows: &[RawListing]) -> TableData {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        TableData {
            headers: vec![
                "Title", "Price", "Source", "Rating", "Reviews", "Delivery", "Product ID", "Link",
            ],
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        Cell::text(truncate(&r.title, TITLE_WIDTH)),
                        Cell::text(opt(&r.price)),
                        Cell::text(&r.source),
                        Cell::text(opt(&r.rating)),
                        Cell::text(opt(&r.reviews)),
                        Cell::text(&r.delivery),
                        Cell::text(&r.product_id),
                        Cell::link(&r.link),
                    ]
                })
                .collect(),
        }
    }

    pub fn quality_summary(quality: &ModelQuality) -> String {
        let r2 = quality
            .r_squared
            .map(|r| format!("{:.3}", r))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "Trained on {} listings, tested on {}. Test RMSE {}, R² {}",
            quality.train_rows,
            quality.test_rows,
            format_inr(quality.rmse),
            r2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_lines() {
        assert_eq!(
            DashboardViewModel::stage_line(Stage::Scrape, None),
            StageLine::Pending
        );
        assert_eq!(
            DashboardViewModel::stage_line(Stage::Predict, Some(&StageStatus::Started)),
            StageLine::Running("🤖 Agent 3: Building prediction model...")
        );
        assert_eq!(
            DashboardViewModel::stage_line(Stage::Compare, Some(&StageStatus::Completed)),
            StageLine::Done("Agent 4: Comparison complete!")
        );
    }

    #[test]
    fn test_historical_row_formatting() {
        let rows = vec![HistoricalDeal {
            title: "Rope Chain".to_string(),
            seller: "Ajio".to_string(),
            price: 1800.0,
            historic_avg_price: 2000.0,
            historical_saving_pct: 10.0,
            price_change_24h_pct: -1.24,
            price_volatility: 0.0812,
            link: String::new(),
        }];
        let table = DashboardViewModel::historical_table(&rows);
        assert_eq!(table.headers.len(), table.rows[0].len());
        assert_eq!(table.rows[0][3], Cell::Text("₹2,000.00".to_string()));
        assert_eq!(table.rows[0][4], Cell::Signed("10.0%".to_string(), 10.0));
        assert_eq!(table.rows[0][5], Cell::Signed("-1.2%".to_string(), 1.24));
        assert_eq!(table.rows[0][6], Cell::Text("0.08".to_string()));
        assert_eq!(table.rows[0][7], Cell::Text(String::new()));
    }

    #[test]
    fn test_deal_links_and_difference() {
        let rows = vec![Deal {
            title: "Chain".to_string(),
            seller: "Myntra".to_string(),
            price: 900.0,
            predicted_price: 1000.0,
            price_difference: 100.0,
            link: "https://shop/1".to_string(),
        }];
        let table = DashboardViewModel::deals_table(&rows);
        assert_eq!(table.rows[0][4], Cell::Signed("₹100.00".to_string(), 100.0));
        assert_eq!(
            table.rows[0][5],
            Cell::Link {
                label: "Open".to_string(),
                url: "https://shop/1".to_string()
            }
        );
    }

    #[test]
    fn test_raw_table_shows_text_as_scraped() {
        let rows = vec![RawListing {
            price: Some("₹1,299".to_string()),
            ..RawListing::default()
        }];
        let table = DashboardViewModel::raw_table(&rows);
        assert_eq!(table.rows[0][1], Cell::Text("₹1,299".to_string()));
        assert_eq!(table.rows[0][3], Cell::Text(String::new()));
    }

    #[test]
    fn test_quality_summary() {
        let q = ModelQuality {
            train_rows: 24,
            test_rows: 6,
            rmse: 1234.5,
            r_squared: None,
        };
        assert_eq!(
            DashboardViewModel::quality_summary(&q),
            "Trained on 24 listings, tested on 6. Test RMSE ₹1,234.50, R² n/a"
        );
    }
}
