//! `haulbook-client`
//!
//! **Responsibility:** typed access to the back-office REST API.
//!
//! This crate provides:
//! - An explicit [`ClientConfig`] (no ambient globals)
//! - [`ApiClient`] for the ledger, party, truck and booking endpoints
//! - Generic paginated listing for the bank/company/challan/halting/payment resources
//! - The [`LedgerSource`] seam the view layer fetches through
//!
//! The API is the authority; nothing here caches or computes balances.

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod resources;
pub mod source;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use envelope::Page;
pub use error::{ClientError, ClientResult};
pub use resources::{PageQuery, Resource};
pub use source::{LedgerSource, LedgerTarget};
