// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::ViewportBuilder;
use lead_scrape::{config::state::GuiState, gui};

fn main() {
    // Keys and proxies may live in a local .env
    let _ = dotenvy::dotenv();

    let state = GuiState::default();
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title("Lead Scraper")
            .with_inner_size([state.window_w as f32, state.window_h as f32]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
