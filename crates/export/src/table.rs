use crate::error::{ExportError, ExportResult};

/// Key/value line shown above a table (counterparty, balances, period).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub label: String,
    pub value: String,
}

/// Format-neutral tabular dataset.
///
/// Every row has exactly `headers.len()` cells; the constructor pads or
/// truncates rows so encoders can rely on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub info: Vec<InfoLine>,
    pub headers: Vec<String>,
    /// Right-aligned columns.
    pub numeric: Vec<bool>,
    pub rows: Vec<Vec<String>>,
    /// Summary rows drawn under the body (totals, closing balance).
    pub footer: Vec<Vec<String>>,
}

impl Table {
    /// Start a table. Fails when there are no columns or no rows.
    pub fn new(
        title: impl Into<String>,
        headers: Vec<(String, bool)>,
        rows: Vec<Vec<String>>,
    ) -> ExportResult<Self> {
        let title = title.into();
        if headers.is_empty() {
            return Err(ExportError::NoColumns);
        }
        if rows.is_empty() {
            return Err(ExportError::NothingToExport(title));
        }

        let width = headers.len();
        let (headers, numeric) = headers.into_iter().unzip();
        let rows = rows.into_iter().map(|r| fit(r, width)).collect();

        Ok(Self {
            title,
            info: Vec::new(),
            headers,
            numeric,
            rows,
            footer: Vec::new(),
        })
    }

    pub fn with_info(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.push(InfoLine {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_footer(mut self, row: Vec<String>) -> Self {
        let width = self.width();
        self.footer.push(fit(row, width));
        self
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

fn fit(mut row: Vec<String>, width: usize) -> Vec<String> {
    row.resize(width, String::new());
    row
}
