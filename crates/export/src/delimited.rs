//! Comma-separated encoding with every field quoted, CRLF line endings.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{ExportError, ExportResult};
use crate::table::Table;

/// Header row, body rows, then the footer rows.
pub fn encode(table: &Table) -> ExportResult<Vec<u8>> {
    let mut wrt = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    wrt.write_record(&table.headers)?;
    for row in table.rows.iter().chain(table.footer.iter()) {
        wrt.write_record(row)?;
    }
    wrt.flush()?;

    wrt.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}
