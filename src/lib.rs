// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub mod browser;
pub mod enrich;
pub mod file;
pub mod grade;
pub mod gui;
pub mod lead;
pub mod llm;
pub mod log;
pub mod merge;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod scrape;
pub mod session;
pub mod store;
pub mod worker;
