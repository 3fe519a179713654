// src/gui/app.rs
use std::{collections::VecDeque, error::Error, path::PathBuf};

use eframe::egui;
use tracing::Level;

use crate::{
    config::{
        consts::LOG_PANEL_MAX_LINES,
        options::EnvSettings,
        state::GuiState,
    },
    lead::EnrichedRecord,
    log::LogLine,
    progress::ProgressUpdate,
    runner::log_tick,
    worker::{Event, Worker},
};

use super::components;

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Lead Scraper",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(GuiState::default(), EnvSettings::from_env())))),
    )?;
    Ok(())
}

pub struct App {
    // form + window (UI thread only)
    pub state: GuiState,
    pub env: EnvSettings,

    // current run, if any
    pub worker: Option<Worker>,
    pub progress: Option<ProgressUpdate>,

    // live log stream and the last run's output
    pub log: VecDeque<LogLine>,
    pub leads: Vec<EnrichedRecord>,
    pub session_dir: Option<PathBuf>,

    pub status: String,
}

impl App {
    pub fn new(state: GuiState, env: EnvSettings) -> Self {
        Self {
            state,
            env,
            worker: None,
            progress: None,
            log: VecDeque::new(),
            leads: Vec::new(),
            session_dir: None,
            status: s!("Idle"),
        }
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.worker.as_ref().map(Worker::is_running).unwrap_or(false)
    }

    #[inline]
    pub fn status<T: Into<String>>(&mut self, msg: T) {
        self.status = msg.into();
    }

    /// Local note in the log panel (not from the worker).
    pub fn note(&mut self, level: Level, msg: impl Into<String>) {
        self.push_log(LogLine {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: msg.into(),
        });
    }

    fn push_log(&mut self, line: LogLine) {
        if self.log.len() >= LOG_PANEL_MAX_LINES {
            self.log.pop_front();
        }
        self.log.push_back(line);
    }

    /// Non-blocking drain of the worker queue.
    pub fn poll_worker(&mut self) {
        let Some(worker) = self.worker.as_mut() else { return };
        for event in worker.drain() {
            match event {
                Event::Log(line) => self.push_log(line),
                Event::Progress(p) => self.progress = Some(p),
                Event::Finished(Ok(summary)) => {
                    self.status = if summary.cancelled {
                        format!("Stopped: {} leads", summary.leads.len())
                    } else {
                        format!("Done: {} leads ({} new links)", summary.leads.len(), summary.new_links)
                    };
                    self.leads = summary.leads;
                    self.session_dir = Some(summary.session_dir);
                    self.progress = None;
                }
                Event::Finished(Err(e)) => {
                    self.status = format!("Error: {e}");
                    self.progress = None;
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        egui::SidePanel::left("search")
            .resizable(false)
            .min_width(240.0)
            .show(ctx, |ui| {
                components::search_form::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::action_buttons::draw(ui, self);

            ui.separator();

            components::log_panel::draw(ui, self);

            ui.separator();

            components::lead_table::draw(ui, self);
        });

        // Fixed tick while a run is live; idle UI sleeps.
        if self.running() {
            ctx.request_repaint_after(log_tick());
        }
    }
}
