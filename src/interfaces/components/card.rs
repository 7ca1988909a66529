use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Titled section container used by every tab
pub struct Card {
    title: Option<String>,
    caption: Option<String>,
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Card {
    pub fn new() -> Self {
        Self {
            title: None,
            caption: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Smaller explanatory line under the title.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        DesignSystem::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());

            if let Some(title) = self.title {
                ui.label(
                    egui::RichText::new(title)
                        .size(16.0)
                        .color(DesignSystem::TEXT_PRIMARY)
                        .strong(),
                );
            }
            if let Some(caption) = self.caption {
                ui.label(
                    egui::RichText::new(caption)
                        .size(12.0)
                        .color(DesignSystem::TEXT_SECONDARY),
                );
            }
            ui.add_space(DesignSystem::SPACING_SMALL);

            add_contents(ui)
        })
    }
}
