// src/progress.rs
/// Lightweight progress reporting used by the pipeline.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// A new pipeline stage started.
    fn stage(&mut self, _stage: Stage) {}

    /// Called at the start of a stage with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Called when one logical unit completes (e.g., a page was scraped).
    fn item_done(&mut self, _id: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Discovering,
    Profiles,
    Saving,
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Discovering => "Collecting page links",
            Stage::Profiles => "Scraping pages",
            Stage::Saving => "Saving",
        }
    }
}

/// Snapshot sent to the UI thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub stage: Stage,
    pub done: usize,
    pub total: usize,
}
