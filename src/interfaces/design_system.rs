use eframe::egui;

/// Dark palette and spacing for the dashboard
pub struct DesignSystem;

impl DesignSystem {
    // Backgrounds
    pub const BG_WINDOW: egui::Color32 = egui::Color32::from_rgb(13, 17, 23); // #0D1117
    pub const BG_SIDEBAR: egui::Color32 = egui::Color32::from_rgb(17, 21, 28);
    pub const BG_CARD: egui::Color32 = egui::Color32::from_rgb(22, 27, 34); // #161B22
    pub const BG_INPUT: egui::Color32 = egui::Color32::from_rgb(15, 18, 24);

    // Accents
    pub const ACCENT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(255, 179, 0); // Gold
    pub const ACCENT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(66, 165, 245);

    // Status
    pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(0, 230, 118);
    pub const DANGER: egui::Color32 = egui::Color32::from_rgb(255, 82, 82);
    pub const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 145, 0);
    pub const INFO: egui::Color32 = egui::Color32::from_rgb(66, 165, 245);

    // Text
    pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(240, 246, 252);
    pub const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_gray(160);
    pub const TEXT_MUTED: egui::Color32 = egui::Color32::from_gray(100);

    pub const BORDER_SUBTLE: egui::Color32 = egui::Color32::from_rgb(48, 54, 61);

    // Chart series
    pub const CHART_BARS: egui::Color32 = egui::Color32::from_rgb(66, 165, 245);
    pub const CHART_POINTS: egui::Color32 = egui::Color32::from_rgb(255, 179, 0);
    pub const CHART_SELLERS: egui::Color32 = egui::Color32::from_rgb(0, 200, 150);

    pub const ROUNDING_MEDIUM: f32 = 8.0;

    pub const SPACING_SMALL: f32 = 8.0;
    pub const SPACING_MEDIUM: f32 = 16.0;

    pub fn theme() -> egui::Visuals {
        let mut visuals = egui::Visuals::dark();

        visuals.window_fill = Self::BG_WINDOW;
        visuals.panel_fill = Self::BG_WINDOW;
        visuals.extreme_bg_color = Self::BG_INPUT;
        visuals.faint_bg_color = Self::BG_CARD;

        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, Self::BORDER_SUBTLE);
        visuals.widgets.inactive.weak_bg_fill = Self::BG_CARD;
        visuals.widgets.inactive.bg_fill = Self::BG_CARD;

        visuals.selection.bg_fill = Self::ACCENT_PRIMARY.linear_multiply(0.3);
        visuals.selection.stroke = egui::Stroke::new(1.0, Self::ACCENT_PRIMARY);

        visuals
    }

    pub fn card_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_CARD)
            .corner_radius(Self::ROUNDING_MEDIUM)
            .stroke(egui::Stroke::new(1.0, Self::BORDER_SUBTLE))
            .inner_margin(Self::SPACING_MEDIUM as i8)
    }

    pub fn sidebar_frame() -> egui::Frame {
        egui::Frame::NONE
            .fill(Self::BG_SIDEBAR)
            .inner_margin(egui::Margin::same(Self::SPACING_MEDIUM as i8))
    }

    /// Coloured text for gains (green) and losses (red).
    pub fn signed_color(value: f64) -> egui::Color32 {
        if value >= 0.0 {
            Self::SUCCESS
        } else {
            Self::DANGER
        }
    }
}
