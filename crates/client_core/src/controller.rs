use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use shared::{domain::Recipe, protocol::SortOrder};

use crate::provider::RecipeProvider;

/// Rows per page until the user picks otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Shown for every failed fetch, whatever the underlying cause.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch recipes. Please try again later.";

/// Browsing always shows the highest-rated recipes first.
const BROWSE_SORT: SortOrder = SortOrder::Desc;

/// Whether the catalogue is being browsed in full or filtered by title.
/// A `Search` always carries its trimmed, non-empty term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    Browse,
    Search { term: String },
}

/// Everything that determines which page the provider is asked for.
/// `page_index` is 0-based; the wire protocol is 1-based and the translation
/// happens once, at dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub mode: QueryMode,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            mode: QueryMode::Browse,
        }
    }
}

/// Load status as one tagged value, so a failure message exists exactly when
/// the state is `Failed` and loading can never overlap with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed { message: String },
}

/// The most recently applied page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult {
    pub items: Vec<Recipe>,
    pub total_count: u64,
}

/// A cloned, render-ready view of the controller at one instant.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub query: ListQuery,
    pub pending_term: String,
    pub status: LoadState,
    pub result: Option<ListResult>,
}

impl ListSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == LoadState::Loading
    }

    pub fn has_error(&self) -> bool {
        matches!(self.status, LoadState::Failed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Rows to render. Empty until some fetch has succeeded; a failed fetch
    /// keeps showing the rows that were on screen before it.
    pub fn rows(&self) -> &[Recipe] {
        self.result
            .as_ref()
            .map(|result| result.items.as_slice())
            .unwrap_or_default()
    }

    /// Server-side total of matching rows, across all pages.
    pub fn row_count(&self) -> u64 {
        self.result
            .as_ref()
            .map(|result| result.total_count)
            .unwrap_or(0)
    }

    /// Pages needed for `row_count` at the current page size. 0 when empty.
    pub fn page_count(&self) -> u64 {
        self.row_count()
            .div_ceil(u64::from(self.query.page_size.max(1)))
    }
}

struct ControllerState {
    query: ListQuery,
    pending_term: String,
    result: Option<ListResult>,
    status: LoadState,
    fetch_seq: u64,
}

impl ControllerState {
    fn new(page_size: u32) -> Self {
        Self {
            query: ListQuery {
                page_size: page_size.max(1),
                ..ListQuery::default()
            },
            pending_term: String::new(),
            result: None,
            status: LoadState::Idle,
            fetch_seq: 0,
        }
    }
}

fn reset_to_browse(state: &mut ControllerState) {
    state.pending_term.clear();
    state.query.mode = QueryMode::Browse;
    state.query.page_index = 0;
}

/// Owns the paging and search state for one recipe list and decides what to
/// fetch when. Every mutating operation applies its state change, stamps a
/// fresh fetch sequence number, and dispatches exactly one provider call; a
/// response lands only while its number is still the newest, so out-of-order
/// completions can never clobber a later page.
pub struct ListController {
    provider: Arc<dyn RecipeProvider>,
    state: Mutex<ControllerState>,
}

impl ListController {
    pub fn new(provider: Arc<dyn RecipeProvider>) -> Self {
        Self::with_page_size(provider, DEFAULT_PAGE_SIZE)
    }

    /// Start on page 0 in browse mode with a caller-chosen page size.
    pub fn with_page_size(provider: Arc<dyn RecipeProvider>, page_size: u32) -> Self {
        Self {
            provider,
            state: Mutex::new(ControllerState::new(page_size)),
        }
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.state.lock().await;
        ListSnapshot {
            query: state.query.clone(),
            pending_term: state.pending_term.clone(),
            status: state.status.clone(),
            result: state.result.clone(),
        }
    }

    /// Fetch the first page for the current query. Callers run this once
    /// after construction; it also serves as a reload.
    pub async fn initialize(&self) {
        self.apply_and_fetch(|_state| {}).await;
    }

    /// Update the pending search text. No fetch happens until
    /// `submit_search`; submitting is the only way text takes effect.
    pub async fn set_search_term(&self, term: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.pending_term = term.into();
    }

    /// Apply the pending text: a non-empty trimmed term switches to search
    /// mode on page 0, while whitespace-only text behaves exactly like
    /// `clear_search`.
    pub async fn submit_search(&self) {
        self.apply_and_fetch(|state| {
            let trimmed = state.pending_term.trim().to_string();
            if trimmed.is_empty() {
                reset_to_browse(state);
            } else {
                state.query.mode = QueryMode::Search { term: trimmed };
                state.query.page_index = 0;
            }
        })
        .await;
    }

    /// Drop any applied search and pending text, back to browsing page 0.
    pub async fn clear_search(&self) {
        self.apply_and_fetch(reset_to_browse).await;
    }

    /// Jump to a 0-based page in the current mode. No upper bound check: the
    /// backend answers past-the-end pages with an empty page and the same
    /// total.
    pub async fn set_page(&self, page_index: u32) {
        self.apply_and_fetch(move |state| {
            state.query.page_index = page_index;
        })
        .await;
    }

    /// Change rows-per-page. Always lands back on the first page, since the
    /// old index points at a different slice of the catalogue under the new
    /// size.
    pub async fn set_page_size(&self, page_size: u32) {
        self.apply_and_fetch(move |state| {
            state.query.page_size = page_size.max(1);
            state.query.page_index = 0;
        })
        .await;
    }

    async fn apply_and_fetch(&self, mutate: impl FnOnce(&mut ControllerState)) {
        let (seq, query) = {
            let mut state = self.state.lock().await;
            mutate(&mut state);
            state.fetch_seq += 1;
            state.status = LoadState::Loading;
            (state.fetch_seq, state.query.clone())
        };

        let wire_page = query.page_index.saturating_add(1);
        let outcome = match &query.mode {
            QueryMode::Browse => {
                self.provider
                    .list(wire_page, query.page_size, BROWSE_SORT)
                    .await
            }
            QueryMode::Search { term } => {
                self.provider.search(wire_page, query.page_size, term).await
            }
        };

        let mut state = self.state.lock().await;
        if state.fetch_seq != seq {
            // A newer fetch was dispatched while this one was in flight.
            debug!(seq, newest = state.fetch_seq, "dropping superseded fetch response");
            return;
        }

        match outcome {
            Ok(page) => {
                if page.data.len() > query.page_size as usize {
                    warn!(
                        rows = page.data.len(),
                        page_size = query.page_size,
                        "backend returned more rows than requested"
                    );
                }
                debug!(
                    rows = page.data.len(),
                    total = page.total,
                    page = wire_page,
                    "applied fetched page"
                );
                state.result = Some(ListResult {
                    items: page.data,
                    total_count: page.total,
                });
                state.status = LoadState::Loaded;
            }
            Err(err) => {
                error!(error = %err, page = wire_page, "recipe fetch failed");
                state.status = LoadState::Failed {
                    message: FETCH_FAILED_MESSAGE.to_string(),
                };
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
