// src/file.rs
//
// Table output. Every table is written twice, as CSV and XLSX, from the same
// `TableRow` headers and cells, so both files always agree.

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, info};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

use crate::{error::ScrapeError, lead::TableRow};

pub fn ensure_directory(dir: &Path) -> Result<(), ScrapeError> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        )));
    }
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn write_csv<R: TableRow>(path: &Path, rows: &[R]) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(R::headers())?;
    for r in rows {
        w.write_record(r.cells())?;
    }
    w.flush()?;
    Ok(())
}

pub fn write_xlsx<R: TableRow>(path: &Path, rows: &[R]) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let bold = Format::new().set_bold();

    for (c, h) in R::headers().iter().enumerate() {
        ws.write_string_with_format(0, c as u16, *h, &bold)?;
    }
    for (i, r) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        for (c, cell) in r.cells().iter().enumerate() {
            ws.write_string(row, c as u16, cell)?;
        }
    }
    wb.save(path)?;
    Ok(())
}

/// Write `<dir>/<stem>.csv` and `<dir>/<stem>.xlsx`.
pub fn write_table<R: TableRow>(dir: &Path, stem: &str, rows: &[R]) -> Result<Vec<PathBuf>, ScrapeError> {
    let csv_path = dir.join(format!("{stem}.csv"));
    let xlsx_path = dir.join(format!("{stem}.xlsx"));
    write_csv(&csv_path, rows)?;
    write_xlsx(&xlsx_path, rows)?;
    info!("Saved {} rows to {} (+ .xlsx)", rows.len(), csv_path.display());
    Ok(vec![csv_path, xlsx_path])
}

/// Zip every regular file of `dir` (not recursive) into `<dir>.zip`
/// next to it. Returns the archive path.
pub fn zip_dir(dir: &Path) -> Result<PathBuf, ScrapeError> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| s!("session"));
    let out = dir.with_file_name(format!("{name}.zip"));

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let mut zip = ZipWriter::new(File::create(&out)?);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in &entries {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else { continue };
        debug!("Bundling {file_name}");
        zip.start_file(format!("{name}/{file_name}"), opts)?;
        io::copy(&mut File::open(path)?, &mut zip)?;
    }
    zip.finish()?;
    info!("Bundle written: {}", out.display());
    Ok(out)
}
