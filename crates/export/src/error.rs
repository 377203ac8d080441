use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The dataset had no rows; nothing was written.
    #[error("nothing to export: {0} is empty")]
    NothingToExport(String),

    #[error("no columns selected")]
    NoColumns,

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;
