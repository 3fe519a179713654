// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{scrape,stop,bundle,open_folder}.

mod export;  // src/gui/actions/export.rs
mod scrape;  // src/gui/actions/scrape.rs

pub use export::{bundle, open_folder};
pub use scrape::{scrape, stop};
