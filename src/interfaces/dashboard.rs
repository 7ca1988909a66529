use crate::application::agents::UserAgent;
use crate::domain::chat::ChatRole;
use crate::domain::reports::AnalysisOutcome;
use crate::interfaces::components::card::Card;
use crate::interfaces::components::charts::{
    render_price_histogram, render_price_vs_rating, render_top_sellers,
};
use crate::interfaces::components::table::render_table;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::DashboardViewModel;
use eframe::egui;

pub fn render_cheapest(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    Card::new()
        .title("Top 10 Cheapest Listings (Snapshot)")
        .show(ui, |ui| {
            render_table(ui, "cheapest", &DashboardViewModel::cheapest_table(&outcome.cheapest));
        });
    ui.add_space(DesignSystem::SPACING_MEDIUM);
    Card::new()
        .title("Seller Report")
        .caption("Sellers ranked by their lowest listed price")
        .show(ui, |ui| {
            render_table(ui, "sellers", &DashboardViewModel::seller_table(&outcome.seller_report));
        });
}

pub fn render_price_history(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    Card::new()
        .title("Current Price vs. Historic Average")
        .caption("Listings priced furthest below their recent average. Positive saving means cheaper than usual.")
        .show(ui, |ui| {
            if outcome.historic_report.is_empty() {
                ui.label("No price history was collected for this run.");
            } else {
                render_table(
                    ui,
                    "historical",
                    &DashboardViewModel::historical_table(&outcome.historic_report),
                );
            }
        });
}

pub fn render_deals(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    Card::new()
        .title("Potential Deals")
        .caption("Listings whose price sits furthest below the model's estimate")
        .show(ui, |ui| {
            if outcome.has_model() {
                render_table(ui, "deals", &DashboardViewModel::deals_table(&outcome.deals));
            } else {
                ui.label("Not enough data to build a prediction model.");
            }
        });
}

pub fn render_market_analysis(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    let charts = &outcome.charts;
    Card::new().title("Price Distribution").show(ui, |ui| {
        render_price_histogram(ui, &charts.price_histogram);
    });
    ui.add_space(DesignSystem::SPACING_MEDIUM);

    Card::new()
        .title("Price vs. Rating")
        .caption("Marker size follows the number of reviews")
        .show(ui, |ui| match &charts.price_vs_rating {
            Some(points) => render_price_vs_rating(ui, points),
            None => {
                ui.label("No rated listings to plot.");
            }
        });
    ui.add_space(DesignSystem::SPACING_MEDIUM);

    Card::new().title("Top 15 Sellers by Listings").show(ui, |ui| {
        match &charts.top_sellers {
            Some(sellers) => render_top_sellers(ui, sellers),
            None => {
                ui.label("No seller data.");
            }
        }
    });
}

pub fn render_model_insights(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    Card::new()
        .title("What Drives the Price?")
        .caption("Permutation importance of each feature in the price model")
        .show(ui, |ui| {
            if let Some(quality) = &outcome.model_quality {
                ui.label(DashboardViewModel::quality_summary(quality));
                ui.add_space(DesignSystem::SPACING_SMALL);
            }
            if outcome.importance.is_empty() {
                ui.label("Not enough data to build a prediction model.");
            } else {
                render_table(
                    ui,
                    "importance",
                    &DashboardViewModel::importance_table(&outcome.importance),
                );
            }
        });
}

pub fn render_raw_data(ui: &mut egui::Ui, outcome: &AnalysisOutcome) {
    Card::new()
        .title("Raw Scraped Data")
        .caption(format!("{} listings as returned by the search provider", outcome.raw.len()))
        .show(ui, |ui| {
            render_table(ui, "raw", &DashboardViewModel::raw_table(&outcome.raw));
        });
}

pub fn render_assistant(ui: &mut egui::Ui, agent: &mut UserAgent) {
    Card::new()
        .title("🤖 Shopping Assistant")
        .caption("Ask about the deals, sellers or prices in the current results")
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("chat_scroll")
                .max_height((ui.available_height() - 60.0).max(200.0))
                .stick_to_bottom(true)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for message in &agent.chat_messages {
                        let (label, color) = match message.role {
                            ChatRole::User => ("You", DesignSystem::ACCENT_SECONDARY),
                            _ => ("Assistant", DesignSystem::ACCENT_PRIMARY),
                        };
                        ui.label(egui::RichText::new(label).strong().color(color));
                        ui.label(&message.content);
                        ui.add_space(DesignSystem::SPACING_SMALL);
                    }
                    if agent.awaiting_reply {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Thinking...");
                        });
                    }
                });

            ui.separator();
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut agent.chat_input)
                        .hint_text("Which listing is the best deal?")
                        .desired_width(ui.available_width() - 80.0),
                );
                let submitted =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(!agent.awaiting_reply, egui::Button::new("Send"))
                    .clicked();
                if submitted || clicked {
                    agent.send_chat();
                    input.request_focus();
                }
            });
        });
}
