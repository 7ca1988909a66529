//! Writes the reports of one run to disk: one CSV per table plus a JSON
//! snapshot of the whole outcome.

use crate::domain::listing::Listing;
use crate::domain::reports::AnalysisOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

pub const RAW_FILE: &str = "raw_listings.csv";
pub const CLEAN_FILE: &str = "clean_listings.csv";
pub const CHEAPEST_FILE: &str = "cheapest_listings.csv";
pub const SELLERS_FILE: &str = "seller_report.csv";
pub const HISTORICAL_FILE: &str = "historical_deals.csv";
pub const DEALS_FILE: &str = "potential_deals.csv";
pub const IMPORTANCE_FILE: &str = "feature_importance.csv";
pub const SNAPSHOT_FILE: &str = "analysis.json";

/// Flat view of a clean row; csv cannot serialize the nested history.
#[derive(Serialize)]
struct CleanRow<'a> {
    title: &'a str,
    price: f64,
    seller: &'a str,
    source: &'a str,
    rating: Option<f64>,
    reviews: u64,
    link: &'a str,
    product_id: &'a str,
    historic_avg_price: Option<f64>,
    price_volatility: Option<f64>,
    price_change_24h: Option<f64>,
}

impl<'a> From<&'a Listing> for CleanRow<'a> {
    fn from(l: &'a Listing) -> Self {
        Self {
            title: &l.title,
            price: l.price,
            seller: &l.seller,
            source: &l.source,
            rating: l.rating,
            reviews: l.reviews,
            link: &l.link,
            product_id: &l.product_id,
            historic_avg_price: l.history.map(|h| h.historic_avg_price),
            price_volatility: l.history.map(|h| h.price_volatility),
            price_change_24h: l.history.map(|h| h.price_change_24h),
        }
    }
}

fn write_csv<T, I>(path: &Path, rows: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("Failed to write row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;
    Ok(())
}

/// Writes every non-empty report of `outcome` into `dir`, creating it if
/// needed. Returns the files that were written.
pub fn export_csv(outcome: &AnalysisOutcome, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut written = Vec::new();

    let mut emit = |name: &str, empty: bool, write: &dyn Fn(&Path) -> Result<()>| -> Result<()> {
        if empty {
            return Ok(());
        }
        let path = dir.join(name);
        write(&path)?;
        written.push(path);
        Ok(())
    };

    emit(RAW_FILE, outcome.raw.is_empty(), &|p| write_csv(p, &outcome.raw))?;
    emit(CLEAN_FILE, outcome.clean.is_empty(), &|p| {
        write_csv(p, outcome.clean.iter().map(CleanRow::from))
    })?;
    emit(CHEAPEST_FILE, outcome.cheapest.is_empty(), &|p| {
        write_csv(p, &outcome.cheapest)
    })?;
    emit(SELLERS_FILE, outcome.seller_report.is_empty(), &|p| {
        write_csv(p, &outcome.seller_report)
    })?;
    emit(HISTORICAL_FILE, outcome.historic_report.is_empty(), &|p| {
        write_csv(p, &outcome.historic_report)
    })?;
    emit(DEALS_FILE, outcome.deals.is_empty(), &|p| write_csv(p, &outcome.deals))?;
    emit(IMPORTANCE_FILE, outcome.importance.is_empty(), &|p| {
        write_csv(p, &outcome.importance)
    })?;

    info!(
        "Exported {} report file(s) for '{}' to {}",
        written.len(),
        outcome.query,
        dir.display()
    );
    Ok(written)
}

/// Dumps the whole outcome as pretty JSON.
pub fn export_json(outcome: &AnalysisOutcome, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(SNAPSHOT_FILE);
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), outcome)
        .context("Failed to serialize analysis snapshot")?;
    info!("Saved analysis snapshot to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::PriceHistory;
    use crate::domain::reports::SellerReport;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("dealscout-export-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_clean_rows_flatten_history() {
        let listing = Listing {
            title: "Chain".to_string(),
            price: 100.0,
            seller: "A".to_string(),
            source: "A".to_string(),
            rating: None,
            reviews: 3,
            link: String::new(),
            product_id: "p".to_string(),
            history: Some(PriceHistory {
                historic_avg_price: 110.0,
                price_volatility: 0.05,
                price_change_24h: -0.01,
            }),
        };
        let row = CleanRow::from(&listing);
        assert_eq!(row.historic_avg_price, Some(110.0));
        assert_eq!(row.price_change_24h, Some(-0.01));
    }

    #[test]
    fn test_export_skips_empty_reports() {
        let dir = scratch_dir("skip");
        let mut outcome = AnalysisOutcome::new("chain");
        outcome.seller_report.push(SellerReport {
            seller: "A".to_string(),
            num_listings: 2,
            min_price: 10.0,
            avg_price: 15.0,
            max_price: 20.0,
        });

        let written = export_csv(&outcome, &dir).unwrap();
        assert_eq!(written, vec![dir.join(SELLERS_FILE)]);

        let text = fs::read_to_string(dir.join(SELLERS_FILE)).unwrap();
        assert!(text.starts_with("seller,num_listings,min_price,avg_price,max_price"));
        let _ = fs::remove_dir_all(&dir);
    }
}
