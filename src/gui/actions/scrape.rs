// src/gui/actions/scrape.rs
use tracing::Level;

use crate::{
    gui::{app::App, progress::GuiProgress},
    runner::{self, RunContext},
    worker::Worker,
};

pub fn scrape(app: &mut App) {
    if app.running() {
        return;
    }

    let opts = match app.state.form.to_run_options() {
        Ok(o) => o,
        Err(e) => {
            app.note(Level::WARN, e.clone());
            app.status(e);
            return;
        }
    };

    let ctx = match RunContext::from_env(&app.env, &opts) {
        Ok(c) => c,
        Err(e) => {
            app.note(Level::ERROR, e.to_string());
            app.status(format!("Error: {e}"));
            return;
        }
    };

    app.note(
        Level::INFO,
        format!("Starting search '{}' ({}) ...", opts.keyword, opts.country),
    );

    // → This is where the scrape happens (on the worker thread) ←
    let spawned = Worker::spawn(move |tx, cancel| {
        let ctx = ctx.with_events(tx.clone(), cancel);
        let mut prog = GuiProgress::new(tx);
        runner::start(&ctx, &opts, Some(&mut prog))
    });

    match spawned {
        Ok(w) => {
            app.worker = Some(w);
            app.leads.clear();
            app.status("Running");
        }
        Err(e) => {
            app.note(Level::ERROR, format!("Could not start worker: {e}"));
            app.status(format!("Error: {e}"));
        }
    }
}

/// Ask the worker to stop at the next scroll round or page boundary.
pub fn stop(app: &mut App) {
    if let Some(w) = &app.worker {
        if w.is_running() {
            w.cancel();
            app.note(Level::WARN, "Stop requested; finishing the current page ...");
            app.status("Stopping");
        }
    }
}
