//! Column totals for the ledger footer.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::entry::LedgerEntry;

/// Footer sums. Independent column sums, not running balances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub total_commission: Decimal,
}

/// Sum debit, credit and commission across `entries`.
///
/// Missing amounts already decode to zero, and decimal addition is exact, so
/// the result does not depend on the order of the rows.
pub fn compute_totals<'a, I>(entries: I) -> LedgerTotals
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    entries
        .into_iter()
        .fold(LedgerTotals::default(), |mut acc, e| {
            acc.total_debit += e.debit;
            acc.total_credit += e.credit;
            acc.total_commission += e.commission;
            acc
        })
}
