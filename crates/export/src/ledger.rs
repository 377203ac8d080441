use chrono::NaiveDate;

use haulbook_ledger::{LedgerColumn, LedgerKind, LedgerResponse, LedgerSheet, format_date};

use crate::artifact::{Artifact, ExportFormat};
use crate::delimited;
use crate::error::{ExportError, ExportResult};
use crate::print;
use crate::table::Table;

/// Table for `sheet` restricted to `columns`, with totals and balances.
///
/// The footer labels go in the first text column of the selection; when every
/// selected column is an amount, a blank leading column carries them. The
/// closing balance sits under `Balance`, or joins its label when `Balance` is
/// not selected.
pub fn ledger_table(sheet: &LedgerSheet, columns: &[LedgerColumn]) -> ExportResult<Table> {
    if sheet.is_empty() {
        return Err(ExportError::NothingToExport(sheet.title.clone()));
    }

    let label_at = columns.iter().position(|c| !c.is_numeric());
    let lead = usize::from(label_at.is_none());
    let label_at = label_at.map_or(0, |i| i + lead);

    let mut headers: Vec<(String, bool)> = Vec::with_capacity(columns.len() + lead);
    if lead == 1 {
        headers.push((String::new(), false));
    }
    headers.extend(columns.iter().map(|c| (c.header().to_string(), c.is_numeric())));

    let rows = sheet
        .rows
        .iter()
        .map(|r| {
            let mut cells = vec![String::new(); lead];
            cells.extend(columns.iter().map(|c| r.cell(*c).to_string()));
            cells
        })
        .collect();

    let mut totals = vec![String::new(); lead];
    totals.extend(columns.iter().map(|c| match c {
        LedgerColumn::Debit | LedgerColumn::Credit | LedgerColumn::Commission => {
            sheet.total_cell(*c).to_string()
        }
        _ => String::new(),
    }));
    totals[label_at] = "Total".to_string();

    let mut closing = vec![String::new(); columns.len() + lead];
    match columns.iter().position(|c| *c == LedgerColumn::Balance) {
        Some(i) => {
            closing[label_at] = "Closing Balance".to_string();
            closing[i + lead] = sheet.closing_balance.clone();
        }
        None => closing[label_at] = format!("Closing Balance: {}", sheet.closing_balance),
    }

    let (name_label, contact_label) = match sheet.kind {
        LedgerKind::Party => ("Party", "Phone"),
        LedgerKind::Truck => ("Truck No", "Driver"),
    };
    let mut table =
        Table::new(sheet.title.clone(), headers, rows)?.with_info(name_label, sheet.counterparty_name.clone());
    if let Some(contact) = &sheet.counterparty_contact {
        table = table.with_info(contact_label, contact.clone());
    }

    Ok(table
        .with_info("Opening Balance", sheet.opening_balance.clone())
        .with_info("Closing Balance", sheet.closing_balance.clone())
        .with_footer(totals)
        .with_footer(closing))
}

/// Produce a CSV or print artifact for a ledger statement.
///
/// `columns` defaults to the usual set for the ledger kind.
pub fn export_ledger(
    statement: &LedgerResponse,
    format: ExportFormat,
    columns: Option<&[LedgerColumn]>,
    today: NaiveDate,
) -> ExportResult<Artifact> {
    let sheet = LedgerSheet::build(statement, None);
    let defaults;
    let columns = match columns {
        Some(c) if !c.is_empty() => c,
        Some(_) => return Err(ExportError::NoColumns),
        None => {
            defaults = LedgerColumn::defaults_for(statement.kind());
            &defaults[..]
        }
    };

    let table = ledger_table(&sheet, columns)?;
    let stem = format!("{}-ledger-{}", sheet.kind.as_str(), sheet.slug);
    let bytes = match format {
        ExportFormat::Csv => delimited::encode(&table)?,
        ExportFormat::Print => {
            let on = format_date(Some(&today.format("%Y-%m-%d").to_string()));
            print::render(&table, &on).into_bytes()
        }
    };

    tracing::debug!(rows = sheet.rows.len(), ?format, "ledger exported");
    Ok(Artifact {
        file_name: Artifact::file_name_for(&stem, today, format),
        format,
        bytes,
    })
}
