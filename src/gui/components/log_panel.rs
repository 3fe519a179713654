// src/gui/components/log_panel.rs

use eframe::egui::{self, Color32, Frame, Margin, RichText, ScrollArea};
use tracing::Level;

use crate::gui::app::App;

const GREEN: Color32 = Color32::from_rgb(60, 220, 90);
const AMBER: Color32 = Color32::from_rgb(230, 180, 40);
const RED: Color32 = Color32::from_rgb(235, 70, 70);

/// Live log, console style. Follows the tail unless the user scrolls up.
pub fn draw(ui: &mut egui::Ui, app: &App) {
    let height = (ui.available_height() * 0.45).max(120.0);

    Frame::new()
        .fill(Color32::BLACK)
        .inner_margin(Margin::same(8))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ScrollArea::vertical()
                .id_salt("log_panel")
                .max_height(height)
                .min_scrolled_height(height)
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in &app.log {
                        let color = match line.level {
                            Level::ERROR => RED,
                            Level::WARN => AMBER,
                            _ => GREEN,
                        };
                        ui.label(RichText::new(line.to_string()).monospace().color(color));
                    }
                });
        });
}
