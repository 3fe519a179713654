// src/scrape/mod.rs
mod discover;
pub mod extract;
mod profile;

pub use discover::{Discovery, SearchQuery};
pub use extract::{extractor_for, ContactExtractor, Contacts, IconExtractor, PatternExtractor};
pub use profile::ProfileScraper;
