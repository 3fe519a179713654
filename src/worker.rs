// src/worker.rs
//
// Background run. The worker thread produces `Event`s into an unbounded
// channel and never blocks on the UI; the UI drains it without blocking on
// its own tick.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crate::{
    error::ScrapeError,
    log::LogLine,
    progress::ProgressUpdate,
    runner::RunSummary,
};

pub enum Event {
    Log(LogLine),
    Progress(ProgressUpdate),
    /// Always the last event of a run.
    Finished(Result<RunSummary, String>),
}

/// Cooperative stop flag, checked between scroll rounds and between pages.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Worker {
    rx: Receiver<Event>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

impl Worker {
    pub fn spawn<F>(job: F) -> Result<Self, ScrapeError>
    where
        F: FnOnce(Sender<Event>, CancelToken) -> Result<RunSummary, ScrapeError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let cancel = CancelToken::default();
        let token = cancel.clone();

        let handle = thread::Builder::new()
            .name(s!("lead-scrape-worker"))
            .spawn(move || {
                let result = job(tx.clone(), token).map_err(|e| e.to_string());
                let _ = tx.send(Event::Finished(result));
            })?;

        Ok(Self { rx, cancel, handle: Some(handle), finished: false })
    }

    /// Everything queued so far; never blocks. A thread that ended without
    /// sending `Finished` (a panic) gets one synthesised here.
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.rx.try_iter().collect();
        let mut done = events.iter().any(|e| matches!(e, Event::Finished(_)));
        if !done && self.handle.as_ref().is_some_and(|h| h.is_finished()) {
            // anything sent between the first read and the thread exit
            events.extend(self.rx.try_iter());
            if !events.iter().any(|e| matches!(e, Event::Finished(_))) {
                events.push(Event::Finished(Err(s!("worker stopped unexpectedly"))));
            }
            done = true;
        }
        if done {
            self.finished = true;
            if let Some(h) = self.handle.take() {
                let _ = h.join();
            }
        }
        events
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelling(&self) -> bool {
        self.cancel.is_cancelled() && !self.finished
    }

    pub fn is_running(&self) -> bool {
        !self.finished
    }
}
