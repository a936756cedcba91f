//! Receipt search and the displayed result set.

use std::cell::RefCell;
use std::rc::Rc;

use api::{OrderingPolicy, ReceiptBackend, ReceiptRecord, SearchQuery};
use tracing::{debug, warn};

use crate::error::{ErrorScope, ErrorSlot, ErrorState, FailureKind};
use crate::notice::Notice;
use crate::sequence::Sequencer;

pub const SEARCH_FAILED: &str = "Search failed.";

/// What the results panel shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchResults {
    #[default]
    NotSearched,
    /// Records for `query`, in the order the service returned them. May be empty.
    Results {
        query: String,
        records: Vec<ReceiptRecord>,
    },
}

impl SearchResults {
    pub fn records(&self) -> &[ReceiptRecord] {
        match self {
            Self::NotSearched => &[],
            Self::Results { records, .. } => records,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchOutcome {
    Applied(Vec<ReceiptRecord>),
    /// A newer search already owns the panel.
    Superseded,
    Failed { notice: Notice, error: ErrorState },
}

impl SearchOutcome {
    pub fn records(&self) -> Option<&[ReceiptRecord]> {
        match self {
            Self::Applied(records) => Some(records),
            _ => None,
        }
    }
}

struct SearchInner<R> {
    backend: R,
    seq: Sequencer,
    results: RefCell<SearchResults>,
    error: ErrorSlot,
}

/// Runs searches and owns the result set they replace.
pub struct SearchController<R> {
    inner: Rc<SearchInner<R>>,
}

impl<R> Clone for SearchController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R> SearchController<R> {
    pub fn new(backend: R, ordering: OrderingPolicy) -> Self {
        Self {
            inner: Rc::new(SearchInner {
                backend,
                seq: Sequencer::new(ordering),
                results: RefCell::new(SearchResults::NotSearched),
                error: ErrorSlot::new(ErrorScope::Search),
            }),
        }
    }

    pub fn results(&self) -> SearchResults {
        self.inner.results.borrow().clone()
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.inner.error.get()
    }
}

impl<R: ReceiptBackend> SearchController<R> {
    pub async fn submit_search(&self, query: impl Into<String>) -> SearchOutcome {
        let inner = &self.inner;
        let query = SearchQuery::new(query);
        let ticket = inner.seq.issue();
        debug!(seq = ticket.seq(), query = %query.query, "issuing search");

        let result = inner.backend.search(&query).await;

        if !inner.seq.admit(ticket) {
            debug!(
                seq = ticket.seq(),
                policy = ?inner.seq.policy(),
                query = %query.query,
                "dropping stale search response"
            );
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(records) => {
                debug!(seq = ticket.seq(), count = records.len(), "search applied");
                inner.error.clear();
                *inner.results.borrow_mut() = SearchResults::Results {
                    query: query.query,
                    records: records.clone(),
                };
                SearchOutcome::Applied(records)
            }
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "search failed");
                let kind = FailureKind::classify(ErrorScope::Search, &err);
                SearchOutcome::Failed {
                    notice: Notice::failure(SEARCH_FAILED),
                    error: inner.error.set(kind, SEARCH_FAILED),
                }
            }
        }
    }
}
