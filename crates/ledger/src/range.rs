use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use haulbook_core::{DomainError, DomainResult};

/// Optional `fromDate`/`toDate` filter applied to ledger and list fetches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    /// Build a range, rejecting one that ends before it starts.
    pub fn new(from_date: Option<NaiveDate>, to_date: Option<NaiveDate>) -> DomainResult<Self> {
        if let (Some(from), Some(to)) = (from_date, to_date) {
            if from > to {
                return Err(DomainError::validation(format!(
                    "fromDate {from} is after toDate {to}"
                )));
            }
        }
        Ok(Self { from_date, to_date })
    }

    /// Query pairs in the wire format (`YYYY-MM-DD`).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(from) = self.from_date {
            pairs.push(("fromDate", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to_date {
            pairs.push(("toDate", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}
