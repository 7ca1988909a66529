use crate::interfaces::design_system::DesignSystem;
use crate::interfaces::view_models::{Cell, TableData};
use eframe::egui;

/// Striped grid with a bold header row, scrolling horizontally when wide.
pub fn render_table(ui: &mut egui::Ui, id: &str, table: &TableData) {
    if table.rows.is_empty() {
        ui.label(egui::RichText::new("No rows to show.").color(DesignSystem::TEXT_MUTED));
        return;
    }

    egui::ScrollArea::horizontal()
        .id_salt(format!("{}_scroll", id))
        .show(ui, |ui| {
            egui::Grid::new(id)
                .striped(true)
                .spacing([DesignSystem::SPACING_MEDIUM, 6.0])
                .show(ui, |ui| {
                    for header in &table.headers {
                        ui.label(
                            egui::RichText::new(*header)
                                .strong()
                                .color(DesignSystem::TEXT_SECONDARY),
                        );
                    }
                    ui.end_row();

                    for row in &table.rows {
                        for cell in row {
                            render_cell(ui, cell);
                        }
                        ui.end_row();
                    }
                });
        });
}

fn render_cell(ui: &mut egui::Ui, cell: &Cell) {
    match cell {
        Cell::Text(text) => {
            ui.label(text);
        }
        Cell::Signed(text, value) => {
            ui.label(egui::RichText::new(text).color(DesignSystem::signed_color(*value)));
        }
        Cell::Link { label, url } => {
            ui.hyperlink_to(label, url);
        }
    }
}
