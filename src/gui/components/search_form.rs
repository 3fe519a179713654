// src/gui/components/search_form.rs
//
// Left panel: search inputs. Locked while a run is live.

use eframe::egui::{self, ComboBox, TextEdit};

use crate::{
    config::options::{Country, GradePolicy, Strategy},
    gui::app::App,
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let enabled = !app.running();
    let form = &mut app.state.form;

    ui.heading("Search");
    ui.add_space(6.0);

    ui.add_enabled_ui(enabled, |ui| {
        ui.label("Keyword:");
        ui.add(TextEdit::singleline(&mut form.keyword).hint_text("e.g. Whatsapp Kerala"));

        ui.add_space(4.0);
        ui.label("Country:");
        ComboBox::from_id_salt("country")
            .selected_text(form.country.to_string())
            .show_ui(ui, |ui| {
                for c in Country::SUPPORTED {
                    ui.selectable_value(&mut form.country, *c, c.code());
                }
            });

        ui.add_space(4.0);
        ui.label("Ads delivered from (YYYY-MM-DD):");
        ui.add(TextEdit::singleline(&mut form.date_min_text).font(egui::TextStyle::Monospace));
        ui.label("to:");
        ui.add(TextEdit::singleline(&mut form.date_max_text).font(egui::TextStyle::Monospace));

        ui.add_space(8.0);
        ui.label("Contact extraction:");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut form.strategy, Strategy::IconAnchored, "Icons");
            ui.selectable_value(&mut form.strategy, Strategy::Pattern, "Patterns");
        });

        ui.add_space(4.0);
        ui.label("Grading:");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut form.grade_policy, GradePolicy::WhatsAppForA, "WhatsApp for A");
            ui.selectable_value(&mut form.grade_policy, GradePolicy::Classic, "Classic");
        });

        ui.add_space(8.0);
        ui.checkbox(&mut form.headless, "Headless browser");
    });
}
