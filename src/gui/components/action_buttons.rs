// src/gui/components/action_buttons.rs

use eframe::egui::{self, widgets::Spinner};

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let running = app.running();
    let has_session = app.session_dir.is_some();

    ui.horizontal(|ui| {
        // Start
        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;

        let button_start = ui.add_enabled(
            !running,
            egui::Button::new(
                egui::RichText::new("START")
                .color(black)
                .strong())
            .fill(red));

        if button_start.clicked() {
            actions::scrape(app);
        }

        // Stop
        let cancelling = app.worker.as_ref().map(|w| w.is_cancelling()).unwrap_or(false);
        if ui.add_enabled(running && !cancelling, egui::Button::new("Stop")).clicked() {
            actions::stop(app);
        }

        if ui
            .add_enabled(!running && has_session, egui::Button::new("Download bundle"))
            .on_hover_text("Zip the last session folder")
            .clicked()
        {
            actions::bundle(app);
        }

        if ui.button("📁").on_hover_text("Open session folder").clicked() {
            actions::open_folder(app);
        }

        if running {
            ui.add(Spinner::new().size(16.0));
        }

        ui.label(app.status.as_str());
    });

    if let Some(p) = app.progress {
        let text = if p.total > 0 {
            format!("{}: {}/{}", p.stage.label(), p.done, p.total)
        } else {
            format!("{} ...", p.stage.label())
        };
        ui.label(text);
    }
}
