use crate::domain::listing::Listing;
use std::collections::{BTreeMap, BTreeSet};

/// Turns listings into numeric rows: `rating`, `reviews`, then one
/// `seller_<name>` column per seller seen while fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEncoder {
    rating_fill: f64,
    seller_fill: String,
    sellers: Vec<String>,
}

impl FeatureEncoder {
    /// Learns imputation values and seller categories from the training rows.
    pub fn fit(rows: &[&Listing]) -> Self {
        let ratings: Vec<f64> = rows.iter().filter_map(|l| l.rating).collect();
        let rating_fill = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };

        let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for l in rows.iter().filter(|l| !l.seller.trim().is_empty()) {
            *frequency.entry(l.seller.as_str()).or_insert(0) += 1;
        }
        // BTreeMap iterates alphabetically, so ties go to the first name
        let seller_fill = frequency
            .iter()
            .fold(None::<(&str, usize)>, |best, (&name, &n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((name, n)),
            })
            .map(|(name, _)| name.to_string())
            .unwrap_or_default();

        let sellers: BTreeSet<String> = frequency.keys().map(|s| s.to_string()).collect();

        Self {
            rating_fill,
            seller_fill,
            sellers: sellers.into_iter().collect(),
        }
    }

    pub fn feature_names(&self) -> Vec<String> {
        let mut names = vec!["rating".to_string(), "reviews".to_string()];
        names.extend(self.sellers.iter().map(|s| format!("seller_{}", s)));
        names
    }

    pub fn width(&self) -> usize {
        2 + self.sellers.len()
    }

    /// Unknown sellers encode as all zeros.
    pub fn encode(&self, listing: &Listing) -> Vec<f64> {
        let seller = if listing.seller.trim().is_empty() {
            self.seller_fill.as_str()
        } else {
            listing.seller.as_str()
        };
        let mut row = Vec::with_capacity(self.width());
        row.push(listing.rating.unwrap_or(self.rating_fill));
        row.push(listing.reviews as f64);
        row.extend(
            self.sellers
                .iter()
                .map(|s| if s == seller { 1.0 } else { 0.0 }),
        );
        row
    }

    pub fn encode_all<'a, I>(&self, listings: I) -> Vec<Vec<f64>>
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        listings.into_iter().map(|l| self.encode(l)).collect()
    }
}
