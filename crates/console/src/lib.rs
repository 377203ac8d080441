//! `haulbook-console`
//!
//! View state for the ledger and list screens, kept independent of any
//! particular front end. The `haulbook` binary drives it from the terminal.
//!
//! Every fetch is tagged by a [`RequestGate`]: starting a new one aborts the
//! previous in-flight task, and a completion whose ticket is no longer current
//! is discarded, so only the latest request ever reaches view state.

pub mod connectivity;
pub mod debounce;
pub mod gate;
pub mod ledger_view;
pub mod list_view;
pub mod notify;
pub mod render;

pub use connectivity::{Connectivity, ConnectivityState};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use gate::{Outcome, RequestGate, Ticket};
pub use ledger_view::{LedgerView, LoadedLedger, ViewStatus};
pub use list_view::{ListSource, ListView, PartyList, ResourceList, TruckList};
pub use notify::{Notice, NoticeLevel, Notifier, RecordingNotifier, TracingNotifier};
