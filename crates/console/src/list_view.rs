//! Searchable, paginated list screens (parties, trucks, back-office
//! resources).
//!
//! Paging and searching go through the same gate as the ledger view, so
//! flipping pages quickly never lets an older page overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tokio::task::JoinHandle;

use haulbook_client::{ApiClient, ClientResult, Page, PageQuery, Resource};
use haulbook_ledger::DateRange;
use haulbook_parties::{PartyListQuery, PartySummary, TruckListQuery, TruckSummary};

use crate::connectivity::Connectivity;
use crate::debounce::Debouncer;
use crate::gate::{Outcome, RequestGate, Ticket};
use crate::ledger_view::ViewStatus;
use crate::notify::Notifier;

/// Something that serves one page of a list for a query.
#[async_trait]
pub trait ListSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Plural entity name for notices and export file names.
    fn entity(&self) -> &'static str;

    async fn fetch_page(&self, query: &PageQuery) -> ClientResult<Page<Self::Item>>;
}

/// Wrap an unpaginated listing as a single page.
fn single_page<T>(data: Vec<T>) -> Page<T> {
    let count = data.len() as u64;
    Page {
        data,
        total_pages: 1,
        count,
    }
}

/// `GET /ledger/party`; the API returns the whole filtered list at once.
pub struct PartyList {
    pub client: ApiClient,
    pub status: Option<String>,
    pub range: DateRange,
}

#[async_trait]
impl ListSource for PartyList {
    type Item = PartySummary;

    fn entity(&self) -> &'static str {
        "parties"
    }

    async fn fetch_page(&self, query: &PageQuery) -> ClientResult<Page<PartySummary>> {
        let query = PartyListQuery {
            search: query.search.clone(),
            status: self.status.clone(),
            range: self.range,
        };
        self.client.list_parties(&query).await.map(single_page)
    }
}

/// `GET /vendor/truck`
pub struct TruckList {
    pub client: ApiClient,
    pub range: DateRange,
}

#[async_trait]
impl ListSource for TruckList {
    type Item = TruckSummary;

    fn entity(&self) -> &'static str {
        "trucks"
    }

    async fn fetch_page(&self, query: &PageQuery) -> ClientResult<Page<TruckSummary>> {
        let query = TruckListQuery {
            search: query.search.clone(),
            range: self.range,
        };
        self.client.list_trucks(&query).await.map(single_page)
    }
}

pub struct ResourceList {
    pub client: ApiClient,
    pub resource: Resource,
}

#[async_trait]
impl ListSource for ResourceList {
    type Item = Value;

    fn entity(&self) -> &'static str {
        self.resource.plural()
    }

    async fn fetch_page(&self, query: &PageQuery) -> ClientResult<Page<Value>> {
        self.client.list_resource(self.resource, query).await
    }
}

struct Inner<T> {
    /// Most recently requested query.
    query: PageQuery,
    /// Query and page currently displayed.
    shown: Option<(PageQuery, Page<T>)>,
    pending: Option<Ticket>,
    connectivity: Connectivity,
}

pub struct ListView<L: ListSource, N> {
    source: Arc<L>,
    notifier: Arc<N>,
    gate: Arc<RequestGate>,
    inner: Arc<Mutex<Inner<L::Item>>>,
}

fn lock<T>(inner: &Mutex<Inner<T>>) -> MutexGuard<'_, Inner<T>> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl<L: ListSource, N: Notifier> ListView<L, N> {
    pub fn new(source: Arc<L>, notifier: Arc<N>) -> Self {
        Self::with_query(source, notifier, PageQuery::default())
    }

    pub fn with_query(source: Arc<L>, notifier: Arc<N>, query: PageQuery) -> Self {
        Self {
            source,
            notifier,
            gate: Arc::new(RequestGate::new()),
            inner: Arc::new(Mutex::new(Inner {
                query,
                shown: None,
                pending: None,
                connectivity: Connectivity::default(),
            })),
        }
    }

    /// Fetch with the current query.
    pub fn refresh(&self) -> JoinHandle<Outcome> {
        self.fetch(|_| {})
    }

    pub fn goto(&self, page: u32) -> JoinHandle<Outcome> {
        self.fetch(|q| q.page = page.max(1))
    }

    /// New search text; always restarts from page 1.
    pub fn search(&self, text: impl Into<String>) -> JoinHandle<Outcome> {
        let text = text.into();
        self.fetch(move |q| {
            q.page = 1;
            q.search = (!text.trim().is_empty()).then_some(text);
        })
    }

    /// Search after the input has been quiet for the debounce delay. Returns
    /// `None` when a later keystroke superseded this one.
    pub async fn search_debounced(&self, text: impl Into<String>, debouncer: &Debouncer) -> Option<Outcome> {
        let text = debouncer.settle(text.into()).await?;
        self.search(text).await.ok()
    }

    pub fn set_filter(&self, key: &str, value: impl Into<String>) -> JoinHandle<Outcome> {
        let value = value.into();
        self.fetch(move |q| {
            q.page = 1;
            q.filters.retain(|(k, _)| k != key);
            if !value.trim().is_empty() {
                q.filters.push((key.to_string(), value));
            }
        })
    }

    fn fetch(&self, change: impl FnOnce(&mut PageQuery)) -> JoinHandle<Outcome> {
        let (ticket, query) = {
            let mut inner = lock(&self.inner);
            change(&mut inner.query);
            let ticket = self.gate.issue();
            inner.pending = Some(ticket);
            (ticket, inner.query.clone())
        };
        tracing::debug!(entity = self.source.entity(), page = query.page, "list fetch started");

        let source = Arc::clone(&self.source);
        let notifier = Arc::clone(&self.notifier);
        let gate = Arc::clone(&self.gate);
        let inner = Arc::clone(&self.inner);

        let task = tokio::spawn(async move {
            let result = source.fetch_page(&query).await;
            let mut inner = lock(&inner);
            if !gate.is_current(ticket) {
                tracing::debug!(page = query.page, "dropping stale page");
                return Outcome::Stale;
            }
            inner.pending = None;
            inner.connectivity.observe(&result);

            match result {
                Ok(page) => {
                    inner.shown = Some((query, page));
                    Outcome::Applied
                }
                Err(err) => {
                    // Fall back to the query that matches what is on screen.
                    if let Some(shown) = inner.shown.as_ref().map(|(q, _)| q.clone()) {
                        inner.query = shown;
                    }
                    let message = format!("Failed to load {}: {err}", source.entity());
                    notifier.error(&message);
                    Outcome::Failed(message)
                }
            }
        });
        self.gate.track(task.abort_handle());
        task
    }

    pub fn status(&self) -> ViewStatus {
        let inner = lock(&self.inner);
        if inner.pending.is_some() {
            ViewStatus::Loading
        } else if inner.shown.is_some() {
            ViewStatus::Loaded
        } else {
            ViewStatus::Empty
        }
    }

    pub fn items(&self) -> Vec<L::Item> {
        lock(&self.inner)
            .shown
            .as_ref()
            .map(|(_, p)| p.data.clone())
            .unwrap_or_default()
    }

    /// `(page, total_pages, count)` of the displayed page.
    pub fn position(&self) -> Option<(u32, u32, u64)> {
        lock(&self.inner)
            .shown
            .as_ref()
            .map(|(q, p)| (q.page, p.total_pages, p.count))
    }

    pub fn query(&self) -> PageQuery {
        lock(&self.inner).query.clone()
    }

    pub fn connectivity(&self) -> Connectivity {
        lock(&self.inner).connectivity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NoticeLevel, RecordingNotifier};
    use haulbook_client::ClientError;
    use std::time::Duration;

    /// Page `n` answers after `(5 - n) * 100` ms, so later pages come back
    /// first; page 4 fails.
    struct Numbers;

    #[async_trait]
    impl ListSource for Numbers {
        type Item = u32;

        fn entity(&self) -> &'static str {
            "numbers"
        }

        async fn fetch_page(&self, query: &PageQuery) -> ClientResult<Page<u32>> {
            let n = query.page;
            tokio::time::sleep(Duration::from_millis(u64::from(5 - n.min(5)) * 100)).await;
            if n == 4 {
                return Err(ClientError::Api {
                    status: 500,
                    message: "boom".into(),
                });
            }
            let base = if query.search.is_some() { 1000 } else { 0 };
            Ok(Page {
                data: vec![base + n],
                total_pages: 5,
                count: 50,
            })
        }
    }

    fn view() -> (ListView<Numbers, RecordingNotifier>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (ListView::new(Arc::new(Numbers), Arc::clone(&notifier)), notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_paging_shows_the_last_page_requested() {
        let (view, _) = view();
        let _ = view.goto(1);
        let _ = view.goto(2);
        let last = view.goto(3);

        assert_eq!(last.await.unwrap(), Outcome::Applied);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(view.items(), vec![3]);
        assert_eq!(view.position(), Some((3, 5, 50)));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_page_keeps_the_previous_one() {
        let (view, notifier) = view();
        view.goto(2).await.unwrap();
        let outcome = view.goto(4).await.unwrap();

        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(view.items(), vec![2]);
        assert_eq!(view.query().page, 2);
        assert_eq!(notifier.count(NoticeLevel::Error), 1);
        assert!(!view.connectivity().is_offline());
    }

    #[tokio::test(start_paused = true)]
    async fn search_resets_to_the_first_page() {
        let (view, _) = view();
        view.goto(3).await.unwrap();
        view.search("acme").await.unwrap();

        assert_eq!(view.items(), vec![1001]);
        assert_eq!(view.query().search.as_deref(), Some("acme"));
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_issues_one_request() {
        let (view, _) = view();
        let view = Arc::new(view);
        let debouncer = Debouncer::default();

        let mut typed = Vec::new();
        for text in ["a", "ac", "acme"] {
            let v = Arc::clone(&view);
            let d = debouncer.clone();
            typed.push(tokio::spawn(async move { v.search_debounced(text, &d).await }));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let mut outcomes = Vec::new();
        for t in typed {
            outcomes.push(t.await.unwrap());
        }
        assert_eq!(outcomes, vec![None, None, Some(Outcome::Applied)]);
        assert_eq!(view.query().search.as_deref(), Some("acme"));
    }

    #[tokio::test(start_paused = true)]
    async fn filters_replace_by_key() {
        let (view, _) = view();
        view.set_filter("status", "active").await.unwrap();
        view.set_filter("status", "closed").await.unwrap();
        assert_eq!(view.query().filters, vec![("status".to_string(), "closed".to_string())]);

        view.set_filter("status", "").await.unwrap();
        assert!(view.query().filters.is_empty());
    }

    #[test]
    fn nothing_loaded_is_empty() {
        let (view, _) = view();
        assert_eq!(view.status(), ViewStatus::Empty);
        assert!(view.items().is_empty());
    }
}
