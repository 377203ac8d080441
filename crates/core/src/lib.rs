//! `haulbook-core`: shared building blocks for the back-office client.
//!
//! This crate contains **pure** primitives (no I/O): the domain error model,
//! typed identifiers and the amount decoding rules every API payload uses.

pub mod amount;
pub mod error;
pub mod id;

pub use amount::Amount;
pub use error::{DomainError, DomainResult};
pub use id::{BookingId, PartyId, TruckId};
