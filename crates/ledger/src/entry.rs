use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use haulbook_core::{BookingId, amount};

/// Kind of transaction backing a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoucherType {
    #[serde(alias = "booking", alias = "BOOKING")]
    Booking,
    #[serde(alias = "payment", alias = "PAYMENT")]
    Payment,
    #[serde(alias = "commission", alias = "COMMISSION")]
    Commission,
    #[serde(alias = "halting", alias = "HALTING")]
    Halting,
}

impl VoucherType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoucherType::Booking => "Booking",
            VoucherType::Payment => "Payment",
            VoucherType::Commission => "Commission",
            VoucherType::Halting => "Halting",
        }
    }
}

impl core::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side a balance sits on: debtor (`Dr`) or creditor (`Cr`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceSide {
    #[serde(alias = "DR", alias = "dr", alias = "Debit")]
    Dr,
    #[serde(alias = "CR", alias = "cr", alias = "Credit")]
    Cr,
}

impl BalanceSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceSide::Dr => "Dr",
            BalanceSide::Cr => "Cr",
        }
    }
}

impl core::fmt::Display for BalanceSide {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voucher reference as free text.
///
/// The API sends it either as a string (`"#BK-101"`) or a bare number (`101`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VoucherNo(String);

impl VoucherNo {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Display for VoucherNo {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VoucherNo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde_json::Value;

        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::String(s)) => Ok(Self(s)),
            Some(Value::Number(n)) => Ok(Self(n.to_string())),
            Some(other) => Err(serde::de::Error::custom(format!(
                "voucher number must be a string or number, got {other}"
            ))),
        }
    }
}

/// One row of a party or truck ledger, as computed by the backend.
///
/// `balance` is the server's running balance after this row; the client never
/// recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub particulars: String,
    pub voucher_type: VoucherType,
    #[serde(default)]
    pub voucher_no: VoucherNo,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub debit: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub credit: Decimal,
    /// Only truck ledgers carry commission.
    #[serde(default, deserialize_with = "amount::lenient")]
    pub commission: Decimal,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub balance: Decimal,
    #[serde(default)]
    pub balance_type: Option<BalanceSide>,
    /// Explicit link to the originating booking, when the backend provides it.
    #[serde(default)]
    pub booking_id: Option<BookingId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_backend_row() {
        let entry: LedgerEntry = serde_json::from_str(
            r#"{
                "date": "2024-01-01",
                "particulars": "Freight for Booking #101",
                "voucherType": "Booking",
                "voucherNo": 101,
                "debit": 5000,
                "credit": 0,
                "balance": 5000,
                "balanceType": "Dr"
            }"#,
        )
        .unwrap();

        assert_eq!(entry.voucher_type, VoucherType::Booking);
        assert_eq!(entry.voucher_no.as_str(), "101");
        assert_eq!(entry.debit, Decimal::from(5000));
        assert_eq!(entry.commission, Decimal::ZERO);
        assert_eq!(entry.balance_type, Some(BalanceSide::Dr));
        assert_eq!(entry.booking_id, None);
    }

    #[test]
    fn unknown_voucher_type_is_rejected_at_the_boundary() {
        let res = serde_json::from_str::<LedgerEntry>(r#"{"voucherType": "Refund"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn voucher_number_accepts_strings_and_null() {
        let a: LedgerEntry =
            serde_json::from_str(r##"{"voucherType": "payment", "voucherNo": "#P-7"}"##).unwrap();
        assert_eq!(a.voucher_no.as_str(), "#P-7");
        assert_eq!(a.voucher_type, VoucherType::Payment);

        let b: LedgerEntry =
            serde_json::from_str(r#"{"voucherType": "Halting", "voucherNo": null}"#).unwrap();
        assert!(b.voucher_no.is_empty());
    }
}
