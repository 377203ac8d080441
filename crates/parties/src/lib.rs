//! Parties and trucks as listed by the back office.
//!
//! Read-side shapes for the party and truck lists, party details with their
//! bookings, and the one write the ledger screens issue themselves: a partial
//! payment against a party, validated before it ever reaches the network.

pub mod booking;
pub mod party;
pub mod payment;
pub mod truck;

pub use booking::{Booking, BookingSummary, bookings_index};
pub use party::{PartyDetails, PartyListQuery, PartySummary};
pub use payment::{FieldError, PartialPaymentRequest, PaymentMode, ValidationErrors};
pub use truck::{TruckListQuery, TruckSummary};
