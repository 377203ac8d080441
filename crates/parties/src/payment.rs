//! Partial payment against a party account.
//!
//! Validation runs locally and blocks submission: an invalid request never
//! produces a network call, and every failing field is reported at once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use haulbook_core::{BookingId, PartyId};

const MAX_REMARKS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMode {
    Cash,
    Cheque,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMode {
    /// Every mode except cash leaves a traceable reference.
    pub fn requires_reference(&self) -> bool {
        !matches!(self, PaymentMode::Cash)
    }
}

impl core::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "cash" => Ok(PaymentMode::Cash),
            "cheque" | "check" => Ok(PaymentMode::Cheque),
            "banktransfer" | "neft" | "rtgs" | "bank" => Ok(PaymentMode::BankTransfer),
            "upi" => Ok(PaymentMode::Upi),
            other => Err(format!("unknown payment mode: {other}")),
        }
    }
}

/// Body of `POST /ledger/party-partial-payment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPaymentRequest {
    pub party_id: PartyId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub payment_mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub booking_ids: Vec<BookingId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Inline form errors, one per failing field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid payment: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl PartialPaymentRequest {
    /// Check the form against `today` (payments cannot be post-dated) and the
    /// party's outstanding balance, when known.
    pub fn validate(
        &self,
        today: NaiveDate,
        outstanding: Option<Decimal>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        let mut push = |field: &'static str, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        if self.amount <= Decimal::ZERO {
            push("amount", "amount must be greater than zero");
        } else if self.amount.normalize().scale() > 2 {
            push("amount", "amount cannot have more than two decimal places");
        } else if let Some(limit) = outstanding.filter(|o| *o > Decimal::ZERO) {
            if self.amount > limit {
                push("amount", "amount exceeds the outstanding balance");
            }
        }

        match self.payment_date {
            None => push("paymentDate", "payment date is required"),
            Some(d) if d > today => push("paymentDate", "payment date cannot be in the future"),
            Some(_) => {}
        }

        let has_reference = self
            .reference_no
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty());
        if self.payment_mode.requires_reference() && !has_reference {
            push("referenceNo", "reference number is required for this payment mode");
        }

        if self
            .remarks
            .as_deref()
            .is_some_and(|r| r.chars().count() > MAX_REMARKS)
        {
            push("remarks", "remarks are limited to 500 characters");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
