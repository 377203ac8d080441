use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use haulbook_core::{TruckId, amount};
use haulbook_ledger::DateRange;

/// One row of the truck (vendor) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckSummary {
    #[serde(alias = "id")]
    pub truck_id: TruckId,
    #[serde(default, alias = "truckNumber", alias = "name")]
    pub truck_no: String,
    #[serde(default, alias = "driverName")]
    pub driver: Option<String>,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_freight: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub total_paid: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub balance: Decimal,
    #[serde(default, deserialize_with = "amount::lenient_opt")]
    pub total_halting: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::lenient_opt")]
    pub total_commission: Option<Decimal>,
    #[serde(default, deserialize_with = "amount::lenient_opt")]
    pub total_payable: Option<Decimal>,
}

impl TruckSummary {
    /// Amount owed to the vendor: the backend figure when sent, otherwise
    /// freight plus halting less commission and payments.
    pub fn payable(&self) -> Decimal {
        self.total_payable.unwrap_or_else(|| {
            self.total_freight + self.total_halting.unwrap_or_default()
                - self.total_commission.unwrap_or_default()
                - self.total_paid
        })
    }
}

/// Filters for `GET /vendor/truck`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruckListQuery {
    pub search: Option<String>,
    pub range: DateRange,
}

impl TruckListQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs.extend(self.range.query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payable_prefers_backend_figure() {
        let row: TruckSummary = serde_json::from_str(
            r#"{"truckId": 1, "truckNo": "MH12", "totalFreight": 10000, "totalPaid": 4000,
                "totalHalting": 500, "totalCommission": 300, "totalPayable": 6100}"#,
        )
        .unwrap();
        assert_eq!(row.payable(), Decimal::from(6100));
    }

    #[test]
    fn payable_is_derived_when_missing() {
        let row: TruckSummary = serde_json::from_str(
            r#"{"id": 1, "truckNumber": "MH12", "totalFreight": 10000, "totalPaid": 4000,
                "totalHalting": 500, "totalCommission": 300}"#,
        )
        .unwrap();
        assert_eq!(row.payable(), Decimal::from(6200));
    }
}
