//! Party / truck ledger screen.
//!
//! Holds the currently displayed statement. Selecting a counterparty (or
//! changing the date range) starts a fetch; the previous in-flight fetch is
//! aborted and, should its response still arrive, it is dropped by the gate.
//! Failures are reported through the [`Notifier`] and leave the last good
//! statement on screen.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use tokio::task::JoinHandle;

use haulbook_client::{ClientResult, LedgerSource, LedgerTarget};
use haulbook_core::BookingId;
use haulbook_export::{Artifact, ExportError, ExportFormat, export_ledger};
use haulbook_ledger::{BookingIdMap, DateRange, LedgerColumn, LedgerResponse, LedgerSheet};

use crate::connectivity::Connectivity;
use crate::gate::{Outcome, RequestGate, Ticket};
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing loaded and nothing pending.
    Empty,
    /// A fetch is in flight (a previous statement may still be shown).
    Loading,
    Loaded,
}

/// A statement on screen, with its formatted sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLedger {
    pub target: LedgerTarget,
    pub range: DateRange,
    pub statement: LedgerResponse,
    pub sheet: LedgerSheet,
    bookings: Option<BookingIdMap>,
}

impl LoadedLedger {
    fn new(target: LedgerTarget, range: DateRange, statement: LedgerResponse) -> Self {
        let sheet = LedgerSheet::build(&statement, None);
        Self {
            target,
            range,
            statement,
            sheet,
            bookings: None,
        }
    }

    fn with_bookings(mut self, bookings: Option<BookingIdMap>) -> Self {
        if bookings.is_some() {
            self.sheet = LedgerSheet::build(&self.statement, bookings.as_ref());
        }
        self.bookings = bookings;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.statement.is_empty()
    }
}

#[derive(Debug, Default)]
struct Inner {
    loaded: Option<LoadedLedger>,
    pending: Option<(Ticket, LedgerTarget)>,
    connectivity: Connectivity,
    /// Bookings attached for a target, applied when its statement lands.
    bookings: Option<(LedgerTarget, BookingIdMap)>,
}

pub struct LedgerView<S, N> {
    source: Arc<S>,
    notifier: Arc<N>,
    gate: Arc<RequestGate>,
    inner: Arc<Mutex<Inner>>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl<S: LedgerSource, N: Notifier> LedgerView<S, N> {
    pub fn new(source: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            source,
            notifier,
            gate: Arc::new(RequestGate::new()),
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Show the ledger for `target` over `range`.
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// resolves to what became of this particular request; it errors as
    /// cancelled if a later `select` aborted it.
    pub fn select(&self, target: LedgerTarget, range: DateRange) -> JoinHandle<Outcome> {
        let ticket = {
            let mut inner = lock(&self.inner);
            let ticket = self.gate.issue();
            inner.pending = Some((ticket, target));
            ticket
        };
        tracing::debug!(%target, ticket = ticket.get(), "ledger fetch started");

        let source = Arc::clone(&self.source);
        let notifier = Arc::clone(&self.notifier);
        let gate = Arc::clone(&self.gate);
        let inner = Arc::clone(&self.inner);

        let task = tokio::spawn(async move {
            let result = source.fetch_ledger(target, range).await;
            commit(&gate, &inner, notifier.as_ref(), ticket, target, range, result)
        });
        self.gate.track(task.abort_handle());
        task
    }

    /// Re-run the current selection with a new date range.
    pub fn set_range(&self, range: DateRange) -> Option<JoinHandle<Outcome>> {
        let target = {
            let inner = lock(&self.inner);
            inner
                .pending
                .map(|(_, t)| t)
                .or_else(|| inner.loaded.as_ref().map(|l| l.target))
        }?;
        Some(self.select(target, range))
    }

    /// Associate a party's bookings with its ledger so rows can link to their
    /// booking. Ignored for truck ledgers.
    pub fn attach_bookings(&self, target: LedgerTarget, bookings: BookingIdMap) {
        if !matches!(target, LedgerTarget::Party(_)) {
            return;
        }
        let mut inner = lock(&self.inner);
        if let Some(loaded) = inner.loaded.take() {
            inner.loaded = Some(if loaded.target == target {
                loaded.with_bookings(Some(bookings.clone()))
            } else {
                loaded
            });
        }
        inner.bookings = Some((target, bookings));
    }

    /// Drop the selection and abort anything in flight.
    pub fn clear(&self) {
        self.gate.cancel();
        let mut inner = lock(&self.inner);
        inner.loaded = None;
        inner.pending = None;
        inner.bookings = None;
    }

    pub fn status(&self) -> ViewStatus {
        let inner = lock(&self.inner);
        if inner.pending.is_some() {
            ViewStatus::Loading
        } else if inner.loaded.is_some() {
            ViewStatus::Loaded
        } else {
            ViewStatus::Empty
        }
    }

    pub fn loaded(&self) -> Option<LoadedLedger> {
        lock(&self.inner).loaded.clone()
    }

    pub fn sheet(&self) -> Option<LedgerSheet> {
        lock(&self.inner).loaded.as_ref().map(|l| l.sheet.clone())
    }

    pub fn connectivity(&self) -> Connectivity {
        lock(&self.inner).connectivity.clone()
    }

    /// Whether the view has something to show but no rows (explicit empty
    /// state; export actions are disabled).
    pub fn is_empty_ledger(&self) -> bool {
        lock(&self.inner).loaded.as_ref().is_none_or(LoadedLedger::is_empty)
    }

    /// Booking behind row `row` of the displayed sheet, if it can be resolved.
    pub fn booking_pdf_target(&self, row: usize) -> Option<BookingId> {
        lock(&self.inner)
            .loaded
            .as_ref()
            .and_then(|l| l.sheet.rows.get(row))
            .and_then(|r| r.booking_id)
    }

    /// Export the displayed ledger. An empty or missing ledger produces no
    /// artifact and a warning notice.
    pub fn export(
        &self,
        format: ExportFormat,
        columns: Option<&[LedgerColumn]>,
        today: NaiveDate,
    ) -> Result<Artifact, ExportError> {
        let loaded = self.loaded().filter(|l| !l.is_empty());
        let Some(loaded) = loaded else {
            self.notifier.warning("No ledger entries to export");
            return Err(ExportError::NothingToExport("ledger".to_string()));
        };

        match export_ledger(&loaded.statement, format, columns, today) {
            Ok(artifact) => {
                self.notifier
                    .success(&format!("Exported {}", artifact.file_name));
                Ok(artifact)
            }
            Err(err) => {
                self.notifier.error(&format!("Export failed: {err}"));
                Err(err)
            }
        }
    }
}

fn commit<N: Notifier + ?Sized>(
    gate: &RequestGate,
    inner: &Mutex<Inner>,
    notifier: &N,
    ticket: Ticket,
    target: LedgerTarget,
    range: DateRange,
    result: ClientResult<LedgerResponse>,
) -> Outcome {
    let mut inner = lock(inner);
    if !gate.is_current(ticket) {
        tracing::debug!(%target, ticket = ticket.get(), "dropping stale ledger response");
        return Outcome::Stale;
    }
    inner.pending = None;
    inner.connectivity.observe(&result);

    match result {
        Ok(statement) => {
            let bookings = inner
                .bookings
                .as_ref()
                .filter(|(t, _)| *t == target)
                .map(|(_, m)| m.clone());
            tracing::info!(%target, entries = statement.ledger.len(), "ledger loaded");
            inner.loaded = Some(LoadedLedger::new(target, range, statement).with_bookings(bookings));
            Outcome::Applied
        }
        Err(err) => {
            tracing::warn!(%target, error = %err, "ledger fetch failed");
            let message = format!("Failed to load {} ledger: {err}", target.kind().as_str());
            notifier.error(&message);
            Outcome::Failed(message)
        }
    }
}
