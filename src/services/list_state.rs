//! Paginated product view with infinite-scroll semantics.
//!
//! The controller keeps one pagination session at a time. Its state lock is
//! never held across a fetch: `loading` is raised under the lock, the page is
//! fetched unlocked, and the result is applied under the lock only if no newer
//! first-page load started in the meantime. A fetch whose future is dropped
//! (a client disconnect cancels the handler) still clears `loading`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use tokio::{sync::broadcast, task::JoinHandle};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    events::ProductEvent,
    models::Product,
    routes::params::ListQuery,
    services::product_service::ProductService,
};

/// Anything that can serve a page of products for a descriptor.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Vec<Product>>;
}

#[async_trait]
impl<T: ProductSource + ?Sized> ProductSource for Arc<T> {
    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Vec<Product>> {
        (**self).fetch_page(query).await
    }
}

#[async_trait]
impl ProductSource for ProductService {
    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Vec<Product>> {
        self.list_products(query).await
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub items: Vec<Product>,
    pub current_page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub query: Option<ListQuery>,
}

impl Default for ListView {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            has_more: true,
            loading: false,
            query: None,
        }
    }
}

#[derive(Debug, Default)]
struct ListState {
    view: ListView,
    generation: u64,
}

/// Marks a fetch as in flight. If the fetching future is dropped before the
/// result is applied, dropping this clears `loading` for its session.
struct InFlight<'a> {
    state: &'a Mutex<ListState>,
    generation: u64,
    first_page: bool,
    applied: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<ListState>, generation: u64, first_page: bool) -> Self {
        Self {
            state,
            generation,
            first_page,
            applied: false,
        }
    }

    /// Called with the state lock held, right before the result is applied.
    fn applied(mut self) {
        self.applied = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.applied {
            return;
        }
        let mut state = lock(self.state);
        if state.generation != self.generation {
            return;
        }
        tracing::debug!(first_page = self.first_page, "page fetch cancelled");
        state.view.loading = false;
        if self.first_page {
            state.view.has_more = false;
        }
    }
}

fn lock(state: &Mutex<ListState>) -> MutexGuard<'_, ListState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ListController<S> {
    source: S,
    state: Mutex<ListState>,
}

impl<S: ProductSource> ListController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(ListState::default()),
        }
    }

    pub fn snapshot(&self) -> ListView {
        lock(&self.state).view.clone()
    }

    /// Starts a new session: clears the view and fetches page 1.
    pub async fn load_first_page(&self, query: ListQuery) -> AppResult<ListView> {
        let query = query.normalize().with_page(1);
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.view = ListView {
                loading: true,
                query: Some(query.clone()),
                ..ListView::default()
            };
            state.generation
        };
        let in_flight = InFlight::new(&self.state, generation, true);

        let result = self.source.fetch_page(&query).await;

        let mut state = lock(&self.state);
        in_flight.applied();
        if state.generation != generation {
            tracing::debug!("discarding first page from a superseded session");
            return Ok(state.view.clone());
        }
        state.view.loading = false;
        match result {
            Ok(items) => {
                state.view.has_more = items.len() == query.page_size as usize;
                state.view.items = items;
                Ok(state.view.clone())
            }
            Err(err) => {
                state.view.has_more = false;
                tracing::warn!(error = %err, "failed to load first page");
                Err(err)
            }
        }
    }

    /// Appends the next page. A no-op while a fetch is in flight, when the
    /// previous page came back short, or before any session was started.
    pub async fn load_next_page(&self) -> AppResult<ListView> {
        let (query, generation) = {
            let mut state = lock(&self.state);
            if state.view.loading || !state.view.has_more {
                return Ok(state.view.clone());
            }
            let Some(query) = state.view.query.clone() else {
                return Ok(state.view.clone());
            };
            state.view.loading = true;
            (query.with_page(state.view.current_page + 1), state.generation)
        };
        let in_flight = InFlight::new(&self.state, generation, false);

        let result = self.source.fetch_page(&query).await;

        let mut state = lock(&self.state);
        in_flight.applied();
        if state.generation != generation {
            tracing::debug!(page = query.page, "discarding page from a superseded session");
            return Ok(state.view.clone());
        }
        state.view.loading = false;
        match result {
            Ok(items) if items.is_empty() => {
                state.view.has_more = false;
                Ok(state.view.clone())
            }
            Ok(items) => {
                state.view.has_more = items.len() == query.page_size as usize;
                state.view.current_page = query.page;
                state.view.items.extend(items);
                Ok(state.view.clone())
            }
            Err(err) => {
                tracing::warn!(error = %err, page = query.page, "failed to load next page");
                Err(err)
            }
        }
    }

    /// Reloads page 1 of the last session, if there is one.
    pub async fn on_external_change(&self) -> AppResult<Option<ListView>> {
        let query = lock(&self.state).view.query.clone();
        match query {
            Some(query) => self.load_first_page(query).await.map(Some),
            None => Ok(None),
        }
    }
}

impl<S: ProductSource + 'static> ListController<S> {
    /// Refreshes the view on every product change until the channel closes.
    pub fn spawn_refresh(
        self: Arc<Self>,
        mut events: broadcast::Receiver<ProductEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        tracing::debug!(product_id = %event.product_id(), "refreshing product list");
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "product events lagged, refreshing once");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("product events closed, stopping list refresh");
                        return;
                    }
                }
                if let Err(err) = self.on_external_change().await {
                    tracing::error!(error = %err, "list refresh failed");
                }
            }
        })
    }
}
