//! Display-ready rendition of a ledger statement.
//!
//! A `LedgerSheet` is what every surface shows: the terminal table, CSV export
//! and the print document all read the same formatted cells.

use serde::Serialize;

use haulbook_core::BookingId;

use crate::booking_ref::{BookingIdMap, extract_booking_id};
use crate::entry::LedgerEntry;
use crate::format::{format_balance, format_currency, format_date};
use crate::statement::{LedgerKind, LedgerResponse};
use crate::totals::{LedgerTotals, compute_totals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LedgerColumn {
    Date,
    Particulars,
    VoucherType,
    VoucherNo,
    Debit,
    Credit,
    Commission,
    Balance,
}

impl LedgerColumn {
    pub const ALL: [LedgerColumn; 8] = [
        LedgerColumn::Date,
        LedgerColumn::Particulars,
        LedgerColumn::VoucherType,
        LedgerColumn::VoucherNo,
        LedgerColumn::Debit,
        LedgerColumn::Credit,
        LedgerColumn::Commission,
        LedgerColumn::Balance,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            LedgerColumn::Date => "Date",
            LedgerColumn::Particulars => "Particulars",
            LedgerColumn::VoucherType => "Voucher Type",
            LedgerColumn::VoucherNo => "Voucher No",
            LedgerColumn::Debit => "Debit",
            LedgerColumn::Credit => "Credit",
            LedgerColumn::Commission => "Commission",
            LedgerColumn::Balance => "Balance",
        }
    }

    /// Amount columns are right-aligned wherever they are drawn.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            LedgerColumn::Debit | LedgerColumn::Credit | LedgerColumn::Commission | LedgerColumn::Balance
        )
    }

    /// Columns shown by default; commission only exists on truck ledgers.
    pub fn defaults_for(kind: LedgerKind) -> Vec<LedgerColumn> {
        Self::ALL
            .into_iter()
            .filter(|c| *c != LedgerColumn::Commission || kind == LedgerKind::Truck)
            .collect()
    }
}

impl core::str::FromStr for LedgerColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match norm.as_str() {
            "date" => Ok(LedgerColumn::Date),
            "particulars" => Ok(LedgerColumn::Particulars),
            "vouchertype" | "type" => Ok(LedgerColumn::VoucherType),
            "voucherno" | "voucher" => Ok(LedgerColumn::VoucherNo),
            "debit" => Ok(LedgerColumn::Debit),
            "credit" => Ok(LedgerColumn::Credit),
            "commission" => Ok(LedgerColumn::Commission),
            "balance" => Ok(LedgerColumn::Balance),
            _ => Err(format!("unknown ledger column: {s}")),
        }
    }
}

/// One formatted ledger row. Zero amounts render as `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub date: String,
    pub particulars: String,
    pub voucher_type: String,
    pub voucher_no: String,
    pub debit: String,
    pub credit: String,
    pub commission: String,
    pub balance: String,
    /// Booking whose PDF can be fetched for this row (party ledgers only).
    pub booking_id: Option<BookingId>,
}

impl SheetRow {
    pub fn cell(&self, column: LedgerColumn) -> &str {
        match column {
            LedgerColumn::Date => &self.date,
            LedgerColumn::Particulars => &self.particulars,
            LedgerColumn::VoucherType => &self.voucher_type,
            LedgerColumn::VoucherNo => &self.voucher_no,
            LedgerColumn::Debit => &self.debit,
            LedgerColumn::Credit => &self.credit,
            LedgerColumn::Commission => &self.commission,
            LedgerColumn::Balance => &self.balance,
        }
    }
}

fn amount_cell(value: rust_decimal::Decimal) -> String {
    if value.is_zero() {
        "-".to_string()
    } else {
        format_currency(Some(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSheet {
    pub kind: LedgerKind,
    pub title: String,
    pub counterparty_name: String,
    pub counterparty_contact: Option<String>,
    /// Identifier used in artifact names.
    pub slug: String,
    pub opening_balance: String,
    pub closing_balance: String,
    pub total_debit: String,
    pub total_credit: String,
    pub total_commission: String,
    pub rows: Vec<SheetRow>,
    #[serde(skip)]
    pub totals: LedgerTotals,
}

impl LedgerSheet {
    /// Format `statement` for display.
    ///
    /// `bookings` enables booking links; it is ignored for truck ledgers.
    pub fn build(statement: &LedgerResponse, bookings: Option<&BookingIdMap>) -> Self {
        let kind = statement.kind();
        let totals = compute_totals(&statement.ledger);
        let bookings = bookings.filter(|_| kind == LedgerKind::Party);

        let rows = statement
            .ledger
            .iter()
            .map(|e| Self::row(e, bookings))
            .collect();

        let cp = &statement.counterparty;
        let title = match kind {
            LedgerKind::Party => format!("Party Ledger - {}", cp.display_name()),
            LedgerKind::Truck => format!("Truck Ledger - {}", cp.display_name()),
        };

        Self {
            kind,
            title,
            counterparty_name: cp.display_name().to_string(),
            counterparty_contact: cp.contact().map(str::to_string),
            slug: cp.slug(),
            opening_balance: format_currency(Some(statement.opening_balance)),
            closing_balance: format_balance(statement.closing_balance, statement.closing_balance_type),
            total_debit: format_currency(Some(totals.total_debit)),
            total_credit: format_currency(Some(totals.total_credit)),
            total_commission: format_currency(Some(totals.total_commission)),
            rows,
            totals,
        }
    }

    fn row(entry: &LedgerEntry, bookings: Option<&BookingIdMap>) -> SheetRow {
        let booking_id = bookings.and_then(|m| extract_booking_id(entry, m));
        SheetRow {
            date: format_date(entry.date.as_deref()),
            particulars: entry.particulars.clone(),
            voucher_type: entry.voucher_type.to_string(),
            voucher_no: entry.voucher_no.to_string(),
            debit: amount_cell(entry.debit),
            credit: amount_cell(entry.credit),
            commission: amount_cell(entry.commission),
            balance: format_balance(entry.balance, entry.balance_type),
            booking_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Footer cell for `column`, empty where a total makes no sense.
    pub fn total_cell(&self, column: LedgerColumn) -> &str {
        match column {
            LedgerColumn::Debit => &self.total_debit,
            LedgerColumn::Credit => &self.total_credit,
            LedgerColumn::Commission => &self.total_commission,
            LedgerColumn::Balance => &self.closing_balance,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement() -> LedgerResponse {
        serde_json::from_str(
            r#"{
                "party": {"id": 3, "name": "Sharma Logistics"},
                "openingBalance": 5000,
                "closingBalance": 3000,
                "closingBalanceType": "Dr",
                "ledger": [
                    {"date": "2024-01-01", "voucherType": "Booking", "voucherNo": 101,
                     "debit": 5000, "credit": 0, "balance": 5000, "balanceType": "Dr"},
                    {"date": "2024-01-10", "voucherType": "Payment", "voucherNo": 55,
                     "debit": 0, "credit": 2000, "balance": 3000, "balanceType": "Dr"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn sheet_shows_totals_and_closing_balance() {
        let sheet = LedgerSheet::build(&statement(), None);
        assert_eq!(sheet.total_debit, "5,000");
        assert_eq!(sheet.total_credit, "2,000");
        assert_eq!(sheet.closing_balance, "3,000 Dr");
        assert_eq!(sheet.opening_balance, "5,000");
        assert_eq!(sheet.title, "Party Ledger - Sharma Logistics");
        assert_eq!(sheet.rows[0].date, "01 Jan 2024");
        assert_eq!(sheet.rows[0].credit, "-");
        assert_eq!(sheet.rows[1].balance, "3,000 Dr");
        assert_eq!(sheet.rows[0].booking_id, None);
        assert_eq!(sheet.kind, LedgerKind::Party);
        assert_eq!(serde_json::to_value(&sheet).unwrap()["kind"], "party");
    }

    #[test]
    fn booking_links_resolve_for_party_ledgers() {
        let sheet = LedgerSheet::build(&statement(), Some(&BookingIdMap::new()));
        assert_eq!(sheet.rows[0].booking_id, Some(BookingId::new(101)));
        assert_eq!(sheet.rows[1].booking_id, None);
    }

    #[test]
    fn default_columns_depend_on_ledger_kind() {
        assert!(!LedgerColumn::defaults_for(LedgerKind::Party).contains(&LedgerColumn::Commission));
        assert!(LedgerColumn::defaults_for(LedgerKind::Truck).contains(&LedgerColumn::Commission));
    }

    #[test]
    fn columns_parse_loosely() {
        assert_eq!("voucher-no".parse::<LedgerColumn>(), Ok(LedgerColumn::VoucherNo));
        assert_eq!("Debit".parse::<LedgerColumn>(), Ok(LedgerColumn::Debit));
        assert!("amount".parse::<LedgerColumn>().is_err());
    }
}
