use crate::domain::reports::{PriceHistogram, ScatterPoint, SellerCount};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use egui_plot::{Bar, BarChart, Plot, PlotPoints, Points};

const CHART_HEIGHT: f32 = 300.0;

pub fn render_price_histogram(ui: &mut egui::Ui, histogram: &PriceHistogram) {
    let bars: Vec<Bar> = histogram
        .bins
        .iter()
        .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()))
        .collect();

    Plot::new("price_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Price (₹)")
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new("Listings", bars).color(DesignSystem::CHART_BARS),
            );
        });
}

/// One series per point so each marker can carry its own size.
pub fn render_price_vs_rating(ui: &mut egui::Ui, points: &[ScatterPoint]) {
    Plot::new("price_vs_rating")
        .height(CHART_HEIGHT)
        .x_axis_label("Rating")
        .y_axis_label("Price (₹)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for p in points {
                // Marker area tracks review count
                let radius = (p.size.max(1.0)).sqrt().max(1.5) as f32;
                plot_ui.points(
                    Points::new("Listing", PlotPoints::from(vec![[p.rating, p.price]]))
                        .radius(radius)
                        .color(DesignSystem::CHART_POINTS.linear_multiply(0.7)),
                );
            }
        });
}

pub fn render_top_sellers(ui: &mut egui::Ui, sellers: &[SellerCount]) {
    let bars: Vec<Bar> = sellers
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.listings as f64)
                .width(0.7)
                .name(&s.seller)
        })
        .collect();
    let names: Vec<String> = sellers.iter().map(|s| s.seller.clone()).collect();

    Plot::new("top_sellers")
        .height(CHART_HEIGHT)
        .x_axis_label("Number of Listings")
        .allow_scroll(false)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                names.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new("Sellers", bars)
                    .horizontal()
                    .color(DesignSystem::CHART_SELLERS),
            );
        });
}
