//! Exports for the list pages (parties, trucks, generic resources).

use chrono::NaiveDate;
use serde_json::Value;

use haulbook_ledger::{format_currency, format_date};
use haulbook_parties::{PartySummary, TruckSummary};

use crate::artifact::{Artifact, ExportFormat};
use crate::delimited;
use crate::error::{ExportError, ExportResult};
use crate::print;
use crate::table::Table;

fn finish(table: Table, stem: &str, format: ExportFormat, today: NaiveDate) -> ExportResult<Artifact> {
    let bytes = match format {
        ExportFormat::Csv => delimited::encode(&table)?,
        ExportFormat::Print => {
            let on = format_date(Some(&today.format("%Y-%m-%d").to_string()));
            print::render(&table, &on).into_bytes()
        }
    };
    Ok(Artifact {
        file_name: Artifact::file_name_for(stem, today, format),
        format,
        bytes,
    })
}

fn cols(columns: &[(&str, bool)]) -> Vec<(String, bool)> {
    columns.iter().map(|(h, n)| (h.to_string(), *n)).collect()
}

fn money(v: rust_decimal::Decimal) -> String {
    format_currency(Some(v))
}

/// Table behind the party list page.
pub fn parties_table(parties: &[PartySummary]) -> ExportResult<Table> {
    let headers = cols(&[
        ("Party", false),
        ("Phone", false),
        ("Total Freight", true),
        ("Total Paid", true),
        ("Total Halting", true),
        ("Balance", true),
    ]);
    let rows = parties
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.phone.clone().unwrap_or_default(),
                money(p.total_freight),
                money(p.total_paid),
                money(p.total_halting.unwrap_or_default()),
                money(p.balance),
            ]
        })
        .collect();

    Table::new("Party Ledger Summary", headers, rows)
}

pub fn export_parties(
    parties: &[PartySummary],
    format: ExportFormat,
    today: NaiveDate,
) -> ExportResult<Artifact> {
    finish(parties_table(parties)?, "parties", format, today)
}

pub fn trucks_table(trucks: &[TruckSummary]) -> ExportResult<Table> {
    let headers = cols(&[
        ("Truck No", false),
        ("Driver", false),
        ("Total Freight", true),
        ("Total Halting", true),
        ("Total Commission", true),
        ("Total Paid", true),
        ("Payable", true),
    ]);
    let rows = trucks
        .iter()
        .map(|t| {
            vec![
                t.truck_no.clone(),
                t.driver.clone().unwrap_or_default(),
                money(t.total_freight),
                money(t.total_halting.unwrap_or_default()),
                money(t.total_commission.unwrap_or_default()),
                money(t.total_paid),
                money(t.payable()),
            ]
        })
        .collect();

    Table::new("Truck Ledger Summary", headers, rows)
}

pub fn export_trucks(
    trucks: &[TruckSummary],
    format: ExportFormat,
    today: NaiveDate,
) -> ExportResult<Artifact> {
    finish(trucks_table(trucks)?, "trucks", format, today)
}

fn value_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
        Some(other) => other.to_string(),
    }
}

/// Table of raw resource records (banks, companies, challans, ...).
///
/// `columns` are JSON keys; when empty, the keys of the first record are used
/// in their received order, skipping nested objects and arrays.
pub fn records_table(entity: &str, records: &[Value], columns: &[String]) -> ExportResult<Table> {
    let Some(first) = records.first() else {
        return Err(ExportError::NothingToExport(entity.to_string()));
    };

    let keys: Vec<String> = if columns.is_empty() {
        first
            .as_object()
            .map(|o| {
                o.iter()
                    .filter(|(_, v)| !v.is_object() && !v.is_array())
                    .map(|(k, _)| k.clone())
                    .collect()
            })
            .unwrap_or_default()
    } else {
        columns.to_vec()
    };

    let headers = keys
        .iter()
        .map(|k| {
            let numeric = first.get(k).is_some_and(Value::is_number);
            (k.clone(), numeric)
        })
        .collect();
    let rows = records
        .iter()
        .map(|r| keys.iter().map(|k| value_text(r.get(k))).collect())
        .collect();

    Table::new(entity, headers, rows)
}

pub fn export_records(
    entity: &str,
    records: &[Value],
    columns: &[String],
    format: ExportFormat,
    today: NaiveDate,
) -> ExportResult<Artifact> {
    finish(records_table(entity, records, columns)?, entity, format, today)
}
