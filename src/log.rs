// src/log.rs
//
// Per-run tracing setup. Each run gets its own subscriber, installed on the
// worker thread only:
//   - EnvFilter (RUST_LOG, else the crate default)
//   - plain text into <session>/scraper.log
//   - every event as a LogLine on the worker channel (live log panel)
//   - optionally coloured stderr (CLI)

use std::{
    fmt::Debug,
    fs::File,
    io,
    path::Path,
    sync::{mpsc::Sender, Mutex},
};

use tracing::{
    field::{Field, Visit},
    Level, Subscriber,
};
use tracing_subscriber::{
    fmt, layer::Context, prelude::*, registry::LookupSpan, EnvFilter, Layer,
};

use crate::{config::consts::DEFAULT_LOG_FILTER, error::ScrapeError, worker::Event};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// Local wall-clock time, `HH:MM:SS`.
    pub time: String,
    pub level: Level,
    pub message: String,
}

impl std::fmt::Display for LogLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.time, self.level, self.message)
    }
}

/* ---------------- channel layer ---------------- */

pub struct ChannelLayer {
    tx: Mutex<Sender<Event>>,
}

impl ChannelLayer {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl<S> Layer<S> for ChannelLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let line = LogLine {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level: *event.metadata().level(),
            message: visitor.finish(),
        };
        if let Ok(tx) = self.tx.lock() {
            // UI gone: nothing left to show the line to
            let _ = tx.send(Event::Log(line));
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.join(" ")
        } else {
            format!("{} {}", self.message, self.fields.join(" "))
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = s!(value);
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/* ---------------- subscriber ---------------- */

pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Build the subscriber for one run. Install it with
/// `tracing::subscriber::set_default` on the thread doing the work.
pub fn session_subscriber(
    log_file: &Path,
    events: Option<Sender<Event>>,
    echo_stderr: bool,
) -> Result<impl Subscriber + Send + Sync + 'static, ScrapeError> {
    let file = File::create(log_file)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);

    let stderr_layer = echo_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
    });

    Ok(tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(events.map(ChannelLayer::new))
        .with(stderr_layer))
}
