//! The ledger statement returned by the tally endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use haulbook_core::{DomainError, PartyId, TruckId, amount};

use crate::entry::{BalanceSide, LedgerEntry};

/// Header of a party ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    #[serde(alias = "partyId")]
    pub id: PartyId,
    #[serde(default, alias = "partyName")]
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Header of a truck (vendor) ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckInfo {
    #[serde(alias = "truckId")]
    pub id: TruckId,
    #[serde(default, alias = "truckNumber")]
    pub truck_no: String,
    #[serde(default, alias = "driverName")]
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    Party,
    Truck,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Party => "party",
            LedgerKind::Truck => "truck",
        }
    }
}

/// Whose ledger a statement belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Counterparty {
    Party(PartyInfo),
    Truck(TruckInfo),
}

impl Counterparty {
    pub fn kind(&self) -> LedgerKind {
        match self {
            Counterparty::Party(_) => LedgerKind::Party,
            Counterparty::Truck(_) => LedgerKind::Truck,
        }
    }

    /// Party name or truck number.
    pub fn display_name(&self) -> &str {
        match self {
            Counterparty::Party(p) => &p.name,
            Counterparty::Truck(t) => &t.truck_no,
        }
    }

    /// Phone for parties, driver for trucks.
    pub fn contact(&self) -> Option<&str> {
        match self {
            Counterparty::Party(p) => p.phone.as_deref(),
            Counterparty::Truck(t) => t.driver.as_deref(),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Counterparty::Party(p) => p.id.get(),
            Counterparty::Truck(t) => t.id.get(),
        }
    }

    /// Filesystem-safe identifier, e.g. `mh12ab1234` or `acme-roadways`.
    pub fn slug(&self) -> String {
        let mut out = String::new();
        for c in self.display_name().chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c.to_ascii_lowercase());
            } else if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        }
        let trimmed = out.trim_end_matches('-');
        if trimmed.is_empty() {
            self.id().to_string()
        } else {
            trimmed.to_string()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLedgerResponse {
    #[serde(default)]
    party: Option<PartyInfo>,
    #[serde(default)]
    truck: Option<TruckInfo>,
    #[serde(default, deserialize_with = "amount::lenient")]
    opening_balance: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    closing_balance: Decimal,
    #[serde(default, deserialize_with = "lenient_side")]
    closing_balance_type: Option<BalanceSide>,
    #[serde(default)]
    ledger: Vec<LedgerEntry>,
}

/// Unrecognised sides decode as unknown rather than failing the statement.
fn lenient_side<'de, D>(deserializer: D) -> Result<Option<BalanceSide>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| serde_json::from_value(serde_json::Value::String(s)).ok()))
}

/// A complete ledger statement. Immutable once received; a new fetch replaces
/// it wholesale.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawLedgerResponse")]
pub struct LedgerResponse {
    pub counterparty: Counterparty,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub closing_balance_type: Option<BalanceSide>,
    pub ledger: Vec<LedgerEntry>,
}

impl TryFrom<RawLedgerResponse> for LedgerResponse {
    type Error = DomainError;

    fn try_from(raw: RawLedgerResponse) -> Result<Self, Self::Error> {
        let counterparty = match (raw.party, raw.truck) {
            (Some(p), None) => Counterparty::Party(p),
            (None, Some(t)) => Counterparty::Truck(t),
            (Some(_), Some(_)) => {
                return Err(DomainError::malformed(
                    "ledger response carries both a party and a truck",
                ));
            }
            (None, None) => {
                return Err(DomainError::malformed(
                    "ledger response carries neither a party nor a truck",
                ));
            }
        };

        Ok(Self {
            counterparty,
            opening_balance: raw.opening_balance,
            closing_balance: raw.closing_balance,
            closing_balance_type: raw.closing_balance_type,
            ledger: raw.ledger,
        })
    }
}

impl LedgerResponse {
    pub fn kind(&self) -> LedgerKind {
        self.counterparty.kind()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_statement_decodes() {
        let resp: LedgerResponse = serde_json::from_str(
            r#"{
                "party": {"id": 7, "name": "Acme Roadways", "phone": "98200"},
                "openingBalance": 5000,
                "closingBalance": 3000,
                "closingBalanceType": "Dr",
                "ledger": []
            }"#,
        )
        .unwrap();

        assert_eq!(resp.kind(), LedgerKind::Party);
        assert_eq!(resp.counterparty.display_name(), "Acme Roadways");
        assert_eq!(resp.counterparty.slug(), "acme-roadways");
        assert_eq!(resp.closing_balance, Decimal::from(3000));
        assert!(resp.is_empty());
    }

    #[test]
    fn truck_statement_decodes_with_aliases() {
        let resp: LedgerResponse = serde_json::from_str(
            r#"{
                "truck": {"truckId": "12", "truckNumber": "MH 12 AB 1234", "driverName": "Ravi"},
                "closingBalance": "1500.00",
                "closingBalanceType": "Cr",
                "ledger": [{"voucherType": "Commission", "commission": 250, "balance": 1500, "balanceType": "Cr"}]
            }"#,
        )
        .unwrap();

        assert_eq!(resp.kind(), LedgerKind::Truck);
        assert_eq!(resp.counterparty.contact(), Some("Ravi"));
        assert_eq!(resp.counterparty.slug(), "mh-12-ab-1234");
        assert_eq!(resp.opening_balance, Decimal::ZERO);
        assert_eq!(resp.ledger.len(), 1);
    }

    #[test]
    fn statement_without_counterparty_is_rejected() {
        let res = serde_json::from_str::<LedgerResponse>(r#"{"ledger": []}"#);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_closing_side_is_dropped() {
        let res: LedgerResponse = serde_json::from_str(
            r#"{"party": {"id": 1, "name": "A"}, "closingBalance": 10, "closingBalanceType": "Nil", "ledger": []}"#,
        )
        .unwrap();
        assert_eq!(res.closing_balance_type, None);
    }

    #[test]
    fn slug_falls_back_to_id() {
        let cp = Counterparty::Party(PartyInfo {
            id: PartyId::new(9),
            name: "***".into(),
            phone: None,
        });
        assert_eq!(cp.slug(), "9");
    }
}
