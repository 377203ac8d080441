//! `haulbook-export`: downloadable artifacts for ledgers and list pages.
//!
//! Every generator goes through a [`Table`]: build it from the data on screen,
//! then encode it as CSV or as a self-contained print document. An empty
//! dataset is refused up front, so no artifact is ever produced for it.

pub mod artifact;
pub mod delimited;
pub mod error;
pub mod ledger;
pub mod lists;
pub mod print;
pub mod table;

pub use artifact::{Artifact, ExportFormat, write_file};
pub use error::ExportError;
pub use ledger::{export_ledger, ledger_table};
pub use lists::{
    export_parties, export_records, export_trucks, parties_table, records_table, trucks_table,
};
pub use table::Table;
