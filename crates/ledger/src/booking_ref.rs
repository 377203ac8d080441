//! Linking a party ledger row back to the booking it came from.
//!
//! Rows that carry an explicit `bookingId` use it directly. Older backends do
//! not send one, so the remaining rules mine the voucher number and the
//! particulars text. That fallback is heuristic: it can match an unrelated
//! number or miss an unusual voucher format. A `None` result only means "no
//! booking PDF for this row".

use std::collections::{HashMap, HashSet};

use regex::Regex;

use haulbook_core::BookingId;

use crate::entry::{LedgerEntry, VoucherType};

/// Voucher/display number -> booking id, rebuilt for every party selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingIdMap {
    by_key: HashMap<String, BookingId>,
    ids: HashSet<BookingId>,
}

impl BookingIdMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` for `id`. Blank keys are ignored.
    pub fn insert(&mut self, key: impl AsRef<str>, id: BookingId) {
        let key = key.as_ref().trim();
        self.ids.insert(id);
        if !key.is_empty() {
            self.by_key.insert(key.to_string(), id);
        }
    }

    pub fn get(&self, key: &str) -> Option<BookingId> {
        self.by_key.get(key).copied()
    }

    pub fn contains_id(&self, id: BookingId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Raw key, then without a leading `#`, then with one.
    fn lookup_any_form(&self, key: &str) -> Option<BookingId> {
        let stripped = key.trim_start_matches('#');
        self.get(key)
            .or_else(|| self.get(stripped))
            .or_else(|| self.get(&format!("#{stripped}")))
    }
}

impl FromIterator<(String, BookingId)> for BookingIdMap {
    fn from_iter<T: IntoIterator<Item = (String, BookingId)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (key, id) in iter {
            map.insert(key, id);
        }
        map
    }
}

fn particulars_patterns() -> &'static [Regex] {
    static PATTERNS: once_cell::sync::OnceCell<Vec<Regex>> = once_cell::sync::OnceCell::new();
    PATTERNS.get_or_init(|| {
        [
            r"(?i)\bbooking\s*#\s*(\d+)",
            r"(?i)\bbooking\s*(?:id|no\.?|number)\s*[:#-]?\s*#?\s*(\d+)",
            r"(?i)\bbooking\s*[:-]?\s*(\d+)",
            r"#\s*(\d+)",
        ]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
    })
}

fn parse_id(digits: &str) -> Option<BookingId> {
    digits.parse::<i64>().ok().map(BookingId::new)
}

/// Resolve the booking behind a ledger row, if any rule matches.
pub fn extract_booking_id(entry: &LedgerEntry, map: &BookingIdMap) -> Option<BookingId> {
    if let Some(id) = entry.booking_id {
        return Some(id);
    }

    let raw = entry.voucher_no.as_str().trim();
    let is_booking = entry.voucher_type == VoucherType::Booking;

    if !raw.is_empty() {
        if let Some(id) = map.lookup_any_form(raw) {
            return Some(id);
        }

        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(id) = parse_id(raw) {
                if is_booking || map.contains_id(id) {
                    return Some(id);
                }
            }
        }
    }

    for pattern in particulars_patterns() {
        if let Some(digits) = pattern
            .captures(&entry.particulars)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
        {
            let resolved = map.lookup_any_form(digits).or_else(|| parse_id(digits));
            if resolved.is_some() {
                tracing::debug!(
                    voucher_no = raw,
                    particulars = %entry.particulars,
                    "booking id recovered from particulars text"
                );
                return resolved;
            }
        }
    }

    if is_booking {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if !digits.is_empty() {
            return parse_id(&digits);
        }
    }

    None
}
