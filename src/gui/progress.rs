// src/gui/progress.rs
use std::sync::mpsc::Sender;

use crate::{
    progress::{Progress, ProgressUpdate, Stage},
    worker::Event,
};

/// Forwards pipeline progress to the UI thread as `Event::Progress`.
pub struct GuiProgress {
    tx: Sender<Event>,
    stage: Stage,
    done: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx, stage: Stage::Discovering, done: 0, total: 0 }
    }

    fn send(&self) {
        let _ = self.tx.send(Event::Progress(ProgressUpdate {
            stage: self.stage,
            done: self.done,
            total: self.total,
        }));
    }
}

impl Progress for GuiProgress {
    fn stage(&mut self, stage: Stage) {
        self.stage = stage;
        self.done = 0;
        self.total = 0;
        self.send();
    }
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.send();
    }
    fn item_done(&mut self, _id: &str) {
        self.done += 1;
        self.send();
    }
}
