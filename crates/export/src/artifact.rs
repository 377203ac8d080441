use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ExportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Print,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Print => "html",
        }
    }
}

impl core::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "excel" => Ok(ExportFormat::Csv),
            "print" | "html" => Ok(ExportFormat::Print),
            other => Err(format!("unknown export format: {other} (expected csv or print)")),
        }
    }
}

/// A finished, downloadable file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// `<stem>-<YYYY-MM-DD>.<ext>`
    pub fn file_name_for(stem: &str, on: NaiveDate, format: ExportFormat) -> String {
        format!("{stem}-{}.{}", on.format("%Y-%m-%d"), format.extension())
    }

    /// Write into `dir` under [`Artifact::file_name`].
    pub fn write_to(&self, dir: &Path) -> ExportResult<PathBuf> {
        write_file(dir, &self.file_name, &self.bytes)
    }
}

/// Write `bytes` to `dir/file_name`. The content goes to a hidden temporary
/// file first and is renamed into place, so a failed write never leaves a
/// partial file under the final name.
pub fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf> {
    let target = dir.join(file_name);
    let staging = dir.join(format!(".{file_name}.partial"));

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&staging)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&staging, &target)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&staging);
        return Err(err.into());
    }

    tracing::info!(path = %target.display(), bytes = bytes.len(), "file written");
    Ok(target)
}
