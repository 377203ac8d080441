use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use haulbook_core::{PartyId, amount};
use haulbook_ledger::{DateRange, PartyInfo};

use crate::booking::BookingSummary;

/// One row of the selectable party list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartySummary {
    #[serde(alias = "id")]
    pub party_id: PartyId,
    #[serde(default, alias = "partyName")]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_freight: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_paid: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub balance: Decimal,
    #[serde(default, deserialize_with = "amount::lenient_opt")]
    pub total_halting: Option<Decimal>,
}

/// Aggregate figures shown above a party's booking list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyBalanceSummary {
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_freight: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_paid: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_halting: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub balance: Decimal,
    #[serde(default)]
    pub total_bookings: u32,
}

/// `GET /ledger/party-details/:partyId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartyDetails {
    pub party: PartyInfo,
    #[serde(default)]
    pub summary: PartyBalanceSummary,
    #[serde(default)]
    pub bookings: Vec<BookingSummary>,
}

/// Filters for `GET /ledger/party`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub range: DateRange,
}

impl PartyListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }
        pairs.extend(self.range.query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_row_decodes_with_optional_halting() {
        let row: PartySummary = serde_json::from_str(
            r#"{"partyId": 4, "name": "Acme", "phone": "9", "totalFreight": "12000", "totalPaid": 2000, "balance": 10000}"#,
        )
        .unwrap();
        assert_eq!(row.party_id, PartyId::new(4));
        assert_eq!(row.total_freight, Decimal::from(12000));
        assert_eq!(row.total_halting, None);
        assert_eq!(row.balance, Decimal::from(10000));
    }

    #[test]
    fn details_carry_bookings() {
        let details: PartyDetails = serde_json::from_str(
            r#"{
                "party": {"id": 4, "name": "Acme"},
                "summary": {"totalFreight": 9000, "balance": 9000, "totalBookings": 1},
                "bookings": [{"id": 88, "bookingNo": "BK-88", "freight": 9000}]
            }"#,
        )
        .unwrap();
        assert_eq!(details.bookings.len(), 1);
        assert_eq!(details.summary.total_bookings, 1);
    }

    #[test]
    fn blank_filters_are_not_sent() {
        let q = PartyListQuery {
            search: Some("  ".into()),
            status: Some("pending".into()),
            range: DateRange::all(),
        };
        assert_eq!(q.query_pairs(), vec![("status", "pending".to_string())]);
    }
}
