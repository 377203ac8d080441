use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use haulbook_core::{BookingId, amount};
use haulbook_ledger::BookingIdMap;

/// A booking as listed under a party's details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: BookingId,
    /// Display number printed on vouchers, e.g. `BK-101`.
    #[serde(default, alias = "bookingNumber", alias = "voucherNo")]
    pub booking_no: Option<String>,
    #[serde(default, alias = "bookingDate")]
    pub date: Option<String>,
    #[serde(default, alias = "from")]
    pub from_location: Option<String>,
    #[serde(default, alias = "to")]
    pub to_location: Option<String>,
    #[serde(default, deserialize_with = "amount::lenient")]
    pub freight: Decimal,
    #[serde(default)]
    pub status: Option<String>,
}

/// Index a party's bookings by display number and by id.
pub fn bookings_index(bookings: &[BookingSummary]) -> BookingIdMap {
    let mut map = BookingIdMap::new();
    for b in bookings {
        if let Some(no) = b.booking_no.as_deref() {
            map.insert(no, b.id);
        }
        map.insert(b.id.to_string(), b.id);
    }
    map
}

/// Full record from `GET /booking/one/:bookingId`, fetched for the booking PDF.
///
/// Only the identifying fields are typed; the rest is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[serde(default, alias = "bookingNumber")]
    pub booking_no: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulbook_ledger::{LedgerEntry, VoucherType, extract_booking_id};

    #[test]
    fn index_resolves_display_numbers_and_ids() {
        let bookings: Vec<BookingSummary> = serde_json::from_str(
            r##"[
                {"id": 11, "bookingNo": "#BK-11"},
                {"id": 12, "bookingNumber": "BK-12"},
                {"id": 13}
            ]"##,
        )
        .unwrap();
        let map = bookings_index(&bookings);

        assert_eq!(map.get("#BK-11"), Some(BookingId::new(11)));
        assert_eq!(map.get("BK-12"), Some(BookingId::new(12)));
        assert_eq!(map.get("13"), Some(BookingId::new(13)));

        let entry: LedgerEntry =
            serde_json::from_str(r#"{"voucherType": "Payment", "voucherNo": "BK-11"}"#).unwrap();
        assert_eq!(entry.voucher_type, VoucherType::Payment);
        assert_eq!(extract_booking_id(&entry, &map), Some(BookingId::new(11)));
    }

    #[test]
    fn full_booking_keeps_unknown_fields() {
        let booking: Booking = serde_json::from_str(
            r#"{"id": 5, "bookingNo": "BK-5", "consignor": "Acme", "weight": 12.5}"#,
        )
        .unwrap();
        assert_eq!(booking.booking_no.as_deref(), Some("BK-5"));
        assert_eq!(booking.details["consignor"], "Acme");
    }
}
