use crate::domain::errors::AnalysisError;
use crate::domain::listing::{Listing, RawListing};
use crate::domain::ports::PriceHistoryProvider;
use crate::domain::reports::{
    ChartSet, HISTOGRAM_BINS, HistogramBin, PriceHistogram, ScatterPoint, SellerCount,
    TOP_SELLERS_LIMIT,
};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

/// Review counts above this stop growing the scatter markers.
const SCATTER_REVIEW_CAP: u64 = 1000;

static PRICE_NOISE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)rs\.?|inr|[₹$€£,\s]").ok());

/// Turns a display price such as "₹1,299.00" or "Rs. 850" into a number.
/// Returns None for anything that is not a finite, positive amount.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned = match PRICE_NOISE.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.trim().to_string(),
    };
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}

pub fn parse_reviews(text: Option<&str>) -> u64 {
    text.map(|t| t.replace(',', ""))
        .and_then(|t| t.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r >= 0.0)
        .map(|r| r.trunc() as u64)
        .unwrap_or(0)
}

pub fn parse_rating(text: Option<&str>) -> Option<f64> {
    text?.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Coerces the raw table into clean rows, dropping rows with no usable price.
pub fn clean_listings(raw: &[RawListing]) -> Vec<Listing> {
    raw.iter()
        .filter_map(|r| {
            let price = r.price.as_deref().and_then(parse_price)?;
            Some(Listing {
                title: r.title.clone(),
                price,
                seller: r.seller.clone(),
                source: r.source.clone(),
                rating: parse_rating(r.rating.as_deref()),
                reviews: parse_reviews(r.reviews.as_deref()),
                link: r.link.clone(),
                product_id: r.product_id.clone(),
                history: None,
            })
        })
        .collect()
}

/// 30 equal-width bins over [min, max]; the last bin includes max.
pub fn price_histogram(prices: &[f64]) -> PriceHistogram {
    let (Some(min), Some(max)) = (
        prices.iter().copied().reduce(f64::min),
        prices.iter().copied().reduce(f64::max),
    ) else {
        return PriceHistogram::default();
    };
    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / HISTOGRAM_BINS as f64;

    let mut counts = vec![0usize; HISTOGRAM_BINS];
    for p in prices {
        let idx = (((p - lo) / width).floor() as usize).min(HISTOGRAM_BINS - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + width * i as f64,
            end: if i == HISTOGRAM_BINS - 1 {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect();
    PriceHistogram { bins }
}

pub fn price_vs_rating(clean: &[Listing]) -> Option<Vec<ScatterPoint>> {
    let points: Vec<ScatterPoint> = clean
        .iter()
        .filter_map(|l| {
            Some(ScatterPoint {
                rating: l.rating?,
                price: l.price,
                size: l.reviews.min(SCATTER_REVIEW_CAP) as f64 / 10.0,
            })
        })
        .collect();
    (!points.is_empty()).then_some(points)
}

/// Top sellers by listing count, ascending so the largest bar is drawn last.
pub fn top_sellers(clean: &[Listing]) -> Option<Vec<SellerCount>> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for l in clean {
        let entry = counts.entry(l.seller.as_str()).or_insert_with(|| {
            order.push(l.seller.as_str());
            0
        });
        *entry += 1;
    }
    if order.is_empty() {
        return None;
    }

    let mut ranked: Vec<SellerCount> = order
        .into_iter()
        .map(|s| SellerCount {
            seller: s.to_string(),
            listings: counts.get(s).copied().unwrap_or(0),
        })
        .collect();
    // Stable: ties keep first-seen order
    ranked.sort_by(|a, b| b.listings.cmp(&a.listings));
    ranked.truncate(TOP_SELLERS_LIMIT);
    ranked.reverse();
    Some(ranked)
}

pub fn build_charts(clean: &[Listing]) -> ChartSet {
    let prices: Vec<f64> = clean.iter().map(|l| l.price).collect();
    ChartSet {
        price_histogram: price_histogram(&prices),
        price_vs_rating: price_vs_rating(clean),
        top_sellers: top_sellers(clean),
    }
}

/// Agent 2: cleaning, history enrichment and market charts.
pub struct AnalystAgent {
    history: Arc<dyn PriceHistoryProvider>,
    fallback: Arc<dyn PriceHistoryProvider>,
    sample_size: usize,
    failure_threshold: usize,
}

impl AnalystAgent {
    pub fn new(
        history: Arc<dyn PriceHistoryProvider>,
        fallback: Arc<dyn PriceHistoryProvider>,
        sample_size: usize,
        failure_threshold: usize,
    ) -> Self {
        Self {
            history,
            fallback,
            sample_size,
            failure_threshold: failure_threshold.max(1),
        }
    }

    pub async fn run(&self, raw: &[RawListing]) -> Result<(Vec<Listing>, ChartSet), AnalysisError> {
        if raw.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let mut clean = clean_listings(raw);
        let dropped = raw.len() - clean.len();
        if clean.is_empty() {
            warn!("[Agent 2: Analyst] All {} rows dropped during cleaning", dropped);
            return Err(AnalysisError::NoValidRows { dropped });
        }
        info!(
            "[Agent 2: Analyst] Cleaned {} listings ({} dropped)",
            clean.len(),
            dropped
        );

        self.enrich_with_history(&mut clean).await;
        let charts = build_charts(&clean);
        Ok((clean, charts))
    }

    /// Attaches price history to the first `sample_size` listings. Failures
    /// fall back to simulation; enough of them in a row and the primary
    /// source is skipped for the rest of the run.
    pub async fn enrich_with_history(&self, clean: &mut [Listing]) {
        let mut consecutive_failures = 0usize;
        let mut primary_live = true;
        let mut enriched = 0usize;

        for listing in clean.iter_mut().take(self.sample_size) {
            let mut history = None;
            if primary_live {
                match self.history.fetch_history(listing).await {
                    Ok(h) => {
                        consecutive_failures = 0;
                        history = Some(h);
                    }
                    Err(e) => {
                        consecutive_failures += 1;
                        debug!(
                            "[Agent 2: Analyst] {} failed for {}: {}",
                            self.history.name(),
                            listing.tracking_key(),
                            e
                        );
                        if consecutive_failures >= self.failure_threshold {
                            warn!(
                                "[Agent 2: Analyst] {} failed {} times in a row, simulating the rest",
                                self.history.name(),
                                consecutive_failures
                            );
                            primary_live = false;
                        }
                    }
                }
            }

            if history.is_none() {
                match self.fallback.fetch_history(listing).await {
                    Ok(h) => history = Some(h),
                    Err(e) => warn!(
                        "[Agent 2: Analyst] No history for {}: {}",
                        listing.tracking_key(),
                        e
                    ),
                }
            }

            if history.is_some() {
                enriched += 1;
            }
            listing.history = history;
        }

        info!(
            "[Agent 2: Analyst] Price history attached to {} listings",
            enriched
        );
    }
}
