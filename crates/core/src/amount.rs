//! Monetary amounts as the API sends them.
//!
//! Amounts are exact decimals. The backend is loose about their encoding:
//! a field may be a JSON integer, a float, a numeric string, an empty string,
//! `null`, or missing altogether. Everything that carries no number decodes
//! to zero; text that is not a number is rejected.

use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};

/// Exact monetary amount (rupees, fractional paise allowed).
pub type Amount = Decimal;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Int(i64),
    Float(f64),
    Text(String),
}

fn to_decimal<E: serde::de::Error>(raw: RawAmount) -> Result<Option<Decimal>, E> {
    match raw {
        RawAmount::Int(n) => Ok(Some(Decimal::from(n))),
        // Non-finite floats cannot appear in JSON; treat them as absent anyway.
        RawAmount::Float(f) => Ok(Decimal::from_f64(f)),
        RawAmount::Text(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .map(Some)
                .map_err(|_| E::custom(format!("invalid amount: {s:?}")))
        }
    }
}

/// `deserialize_with` helper: absent, `null` and blank amounts become zero.
///
/// Pair with `#[serde(default)]` so a missing key also yields zero.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// `deserialize_with` helper for amounts whose absence is meaningful.
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawAmount>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => to_decimal(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient")]
        debit: Decimal,
        #[serde(default, deserialize_with = "lenient_opt")]
        commission: Option<Decimal>,
    }

    fn row(json: &str) -> Row {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_null_and_blank_amounts_are_zero() {
        assert_eq!(row("{}").debit, Decimal::ZERO);
        assert_eq!(row(r#"{"debit": null}"#).debit, Decimal::ZERO);
        assert_eq!(row(r#"{"debit": " "}"#).debit, Decimal::ZERO);
        assert_eq!(row("{}").commission, None);
    }

    #[test]
    fn numbers_and_numeric_strings_decode_exactly() {
        assert_eq!(row(r#"{"debit": 5000}"#).debit, Decimal::from(5000));
        assert_eq!(row(r#"{"debit": "1250.50"}"#).debit, Decimal::new(125050, 2));
        assert_eq!(row(r#"{"debit": 12.5}"#).debit, Decimal::new(125, 1));
        assert_eq!(
            row(r#"{"commission": 300}"#).commission,
            Some(Decimal::from(300))
        );
    }

    #[test]
    fn garbage_text_is_rejected() {
        assert!(serde_json::from_str::<Row>(r#"{"debit": "five"}"#).is_err());
    }
}
