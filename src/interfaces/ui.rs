use crate::application::agents::{DashboardTab, UserAgent};
use crate::application::pipeline::Stage;
use crate::config::Mode;
use crate::interfaces::dashboard;
use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::{DashboardViewModel, StageLine};
use eframe::egui;
use std::time::Duration;

pub const PLACEHOLDER: &str =
    "Enter your API key and a product query in the sidebar to start the analysis.";

pub fn configure_style(ctx: &egui::Context) {
    ctx.set_visuals(DesignSystem::theme());
}

impl eframe::App for UserAgent {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update();

        egui::SidePanel::left("sidebar")
            .default_width(300.0)
            .resizable(true)
            .frame(DesignSystem::sidebar_frame())
            .show(ctx, |ui| render_sidebar(ui, self));

        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Logs").small().color(DesignSystem::TEXT_MUTED));
                egui::ScrollArea::vertical()
                    .id_salt("log_scroll")
                    .stick_to_bottom(true)
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for line in &self.logs {
                            ui.label(
                                egui::RichText::new(line)
                                    .monospace()
                                    .size(11.0)
                                    .color(log_color(line)),
                            );
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Product Analysis Dashboard");
            ui.add_space(DesignSystem::SPACING_SMALL);

            if self.outcome.is_none() {
                // The assistant is usable before any run
                if self.selected_tab == DashboardTab::Assistant {
                    dashboard::render_assistant(ui, self);
                } else {
                    ui.label(egui::RichText::new(PLACEHOLDER).color(DesignSystem::INFO));
                }
                return;
            }

            ui.horizontal_wrapped(|ui| {
                for tab in DashboardTab::ALL {
                    ui.selectable_value(&mut self.selected_tab, tab, tab.label());
                }
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("tab_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if self.selected_tab == DashboardTab::Assistant {
                        dashboard::render_assistant(ui, self);
                        return;
                    }
                    let Some(outcome) = &self.outcome else {
                        return;
                    };
                    match self.selected_tab {
                        DashboardTab::Cheapest => dashboard::render_cheapest(ui, outcome),
                        DashboardTab::PriceHistory => dashboard::render_price_history(ui, outcome),
                        DashboardTab::Deals => dashboard::render_deals(ui, outcome),
                        DashboardTab::MarketAnalysis => {
                            dashboard::render_market_analysis(ui, outcome)
                        }
                        DashboardTab::ModelInsights => {
                            dashboard::render_model_insights(ui, outcome)
                        }
                        DashboardTab::RawData => dashboard::render_raw_data(ui, outcome),
                        DashboardTab::Assistant => {}
                    }
                });
        });

        // Keep polling the runtime while work is in flight
        let interval = if self.running || self.awaiting_reply {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        ctx.request_repaint_after(interval);
    }
}

fn render_sidebar(ui: &mut egui::Ui, agent: &mut UserAgent) {
    ui.heading("🤖 Multi-Agent Analyzer");
    ui.label(
        egui::RichText::new(
            "This app uses a team of AI agents to scrape, analyze, and model product data from the web.",
        )
        .color(DesignSystem::TEXT_SECONDARY),
    );
    if agent.client().mode() == Mode::Mock {
        ui.label(egui::RichText::new("MOCK MODE").small().color(DesignSystem::WARNING));
    }
    ui.separator();

    ui.label("Enter your SerpApi API Key");
    ui.add(egui::TextEdit::singleline(&mut agent.serpapi_key).password(true));
    ui.label("Enter your Groq API Key");
    ui.add(egui::TextEdit::singleline(&mut agent.groq_key).password(true));
    ui.label("Enter Product to Search");
    ui.text_edit_singleline(&mut agent.query);
    ui.add_space(DesignSystem::SPACING_SMALL);

    if ui
        .add_enabled(!agent.running, egui::Button::new("🚀 Run Analysis"))
        .clicked()
    {
        agent.run_analysis();
    }
    ui.add_space(DesignSystem::SPACING_SMALL);

    for stage in Stage::ALL {
        match DashboardViewModel::stage_line(stage, agent.stage_status(stage)) {
            StageLine::Pending => {}
            StageLine::Running(label) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(label);
                });
            }
            StageLine::Done(label) => {
                ui.label(egui::RichText::new(format!("✔ {}", label)).color(DesignSystem::SUCCESS));
            }
            StageLine::Failed(message) => {
                ui.label(egui::RichText::new(format!("⚠ {}", message)).color(DesignSystem::WARNING));
            }
        }
    }

    if let Some(error) = &agent.error {
        ui.add_space(DesignSystem::SPACING_SMALL);
        ui.label(egui::RichText::new(error).color(DesignSystem::DANGER));
    }

    ui.add_space(DesignSystem::SPACING_MEDIUM);
    ui.separator();
    if ui
        .selectable_label(agent.selected_tab == DashboardTab::Assistant, DashboardTab::Assistant.label())
        .clicked()
    {
        agent.selected_tab = DashboardTab::Assistant;
    }
}

fn log_color(line: &str) -> egui::Color32 {
    if line.contains("ERROR") {
        DesignSystem::DANGER
    } else if line.contains("WARN") {
        DesignSystem::WARNING
    } else {
        DesignSystem::TEXT_SECONDARY
    }
}
