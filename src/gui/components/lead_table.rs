// src/gui/components/lead_table.rs
//
// Read-only view of the last run's leads, `leads_final` columns.

use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::{
    gui::app::App,
    lead::{LeadSummary, TableRow},
};

const ROW_H: f32 = 20.0;

pub fn draw(ui: &mut egui::Ui, app: &App) {
    if app.leads.is_empty() {
        ui.weak("No leads yet.");
        return;
    }

    let headers = LeadSummary::headers();
    let avail_h = ui.available_height();

    egui::ScrollArea::horizontal()
        .id_salt("lead_table_hscroll")
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .striped(true)
                .min_scrolled_height(0.0)
                .max_scroll_height(avail_h);
            for (i, _) in headers.iter().enumerate() {
                // Name and free-text columns get more room.
                let w = match i {
                    0 | 8 | 9 => 220.0,
                    7 => 50.0,
                    _ => 130.0,
                };
                table = table.column(Column::initial(w).resizable(true).clip(true));
            }

            table
                .header(ROW_H, |mut header| {
                    for h in headers {
                        header.col(|ui| {
                            ui.label(RichText::new(*h).strong());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_H, app.leads.len(), |mut row| {
                        let cells = app.leads[row.index()].summary().cells();
                        for c in cells {
                            row.col(|ui| {
                                ui.label(c.as_str()).on_hover_text(c.as_str());
                            });
                        }
                    });
                });
        });
}
