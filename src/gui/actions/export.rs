// src/gui/actions/export.rs
use std::path::{Path, PathBuf};

use tracing::Level;

use crate::{file::zip_dir, gui::app::App};

/// Zip the last session folder (the "download" for the GUI).
pub fn bundle(app: &mut App) {
    let Some(dir) = app.session_dir.clone() else {
        app.status("Nothing to bundle yet");
        return;
    };
    match zip_dir(&dir) {
        Ok(path) => {
            app.note(Level::INFO, format!("Bundle written: {}", path.display()));
            app.status(format!("Bundle: {}", path.display()));
        }
        Err(e) => {
            app.note(Level::ERROR, format!("Bundle failed: {e}"));
            app.status(format!("Bundle error: {e}"));
        }
    }
}

/// Open the last session folder, or the root when there was no run yet.
pub fn open_folder(app: &mut App) {
    let target = app.session_dir.clone().unwrap_or_else(|| app.env.root.clone());
    let folder = find_nearest_existing_parent(&target);

    // Convert to absolute path to ensure correct folder is opened
    let absolute = match std::fs::canonicalize(&folder) {
        Ok(p) => p,
        Err(e) => {
            app.status(format!("Cannot resolve folder path: {e}"));
            return;
        }
    };

    if let Err(e) = open_folder_in_explorer(&absolute) {
        app.note(Level::ERROR, format!("Failed to open folder: {e}"));
        app.status(format!("Failed to open folder: {e}"));
    }
}

/// Find the nearest existing parent folder by walking up the directory tree.
fn find_nearest_existing_parent(path: &Path) -> PathBuf {
    let mut current = path.to_path_buf();
    loop {
        if current.is_dir() {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => return PathBuf::from("."),
        }
    }
}

/// Cross-platform function to open a folder in the system file explorer.
fn open_folder_in_explorer(path: &Path) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("explorer")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn explorer: {}", e))?;
        Ok(())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn open: {}", e))?;
        Ok(())
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()
            .map_err(|e| format!("Failed to spawn xdg-open: {}", e))?;
        Ok(())
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        Err("Opening folders not supported on this platform".to_string())
    }
}
