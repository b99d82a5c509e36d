use crate::db::log::audit_quietly;
use crate::errors::{AppError, AppResult};
use crate::queries::problems::ProblemQueries;
use crate::queries::sessions::SessionQueries;
use crate::ui::messages::{info, success, warning};
use crate::ui::prompt::confirm;
use clap::ValueEnum;
use rusqlite::Connection;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Which collection to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Sessions,
    Problems,
}

/// Check that `path` can be (over)written. Returns `false` when the user
/// refused to overwrite an existing file.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<bool> {
    if !path.exists() || force {
        return Ok(true);
    }

    warning(format!("The file '{}' already exists.", path.display()));
    if confirm("Overwrite?")? {
        info("Existing file will be overwritten.");
        Ok(true)
    } else {
        Ok(false)
    }
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| AppError::Export(e.to_string()))?;
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AppError::Export(e.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    fs::write(path, json)?;
    Ok(())
}

fn write_rows<T: Serialize>(format: ExportFormat, path: &Path, rows: &[T]) -> AppResult<()> {
    match format {
        ExportFormat::Csv => write_csv(path, rows),
        ExportFormat::Json => write_json(path, rows),
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export this device's rows. Returns the number of rows written.
    pub fn export(
        conn: &Connection,
        device_id: &str,
        target: ExportTarget,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        if device_id.is_empty() {
            return Err(AppError::IdentityUnavailable);
        }

        let path = Path::new(file);
        if !ensure_writable(path, force)? {
            info("Export cancelled: existing file not overwritten.");
            return Ok(0);
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let (count, label) = match target {
            ExportTarget::Sessions => {
                let rows = SessionQueries::new(conn).sessions(device_id)?;
                write_rows(format, path, &rows)?;
                (rows.len(), "sessions")
            }
            ExportTarget::Problems => {
                let rows = ProblemQueries::new(conn).problems(device_id)?;
                write_rows(format, path, &rows)?;
                (rows.len(), "problems")
            }
        };

        if count == 0 {
            warning(format!("No {label} to export; wrote an empty file."));
        }

        success(format!(
            "Exported {} {} as {} to {}",
            count,
            label,
            format.as_str(),
            path.display()
        ));
        audit_quietly(
            conn,
            "export",
            &path.to_string_lossy(),
            &format!("{count} {label} exported as {}", format.as_str()),
        );

        Ok(count)
    }
}
