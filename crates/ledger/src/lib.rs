//! `haulbook-ledger`: party and truck ledgers as the client sees them.
//!
//! The running balance of every row is computed server-side. This crate only
//! decodes the statement, sums its columns, formats it for display and links
//! rows back to the booking they came from.

pub mod booking_ref;
pub mod entry;
pub mod format;
pub mod range;
pub mod sheet;
pub mod statement;
pub mod totals;

pub use booking_ref::{BookingIdMap, extract_booking_id};
pub use entry::{BalanceSide, LedgerEntry, VoucherNo, VoucherType};
pub use format::{format_balance, format_currency, format_currency_f64, format_date};
pub use range::DateRange;
pub use sheet::{LedgerColumn, LedgerSheet, SheetRow};
pub use statement::{Counterparty, LedgerKind, LedgerResponse, PartyInfo, TruckInfo};
pub use totals::{LedgerTotals, compute_totals};
