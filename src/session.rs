// src/session.rs
//
// Per-run output directory: `<root>/session_dd-mm-yy_HH-MM-SS`, never reused.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::{
    config::consts::*,
    error::ScrapeError,
};

#[derive(Clone, Debug)]
pub struct SessionDir {
    path: PathBuf,
}

impl SessionDir {
    /// Create a fresh directory named after `now`. If that name is taken
    /// (two runs in the same second), a numeric suffix is appended.
    pub fn create(root: &Path, now: DateTime<Local>) -> Result<Self, ScrapeError> {
        fs::create_dir_all(root)?;
        let base = format!("{SESSION_PREFIX}{}", now.format(SESSION_TIME_FMT));

        let mut n = 1;
        loop {
            let name = if n == 1 { base.clone() } else { format!("{base}_{n}") };
            let path = root.join(name);
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => n += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn log_path(&self) -> PathBuf { self.path.join(SESSION_LOG_FILE) }

    pub fn file(&self, stem: &str, ext: &str) -> PathBuf {
        self.path.join(format!("{stem}.{ext}"))
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
