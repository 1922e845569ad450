use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    events::ProductEvents,
    services::{list_state::ListController, product_service::ProductService},
};

pub type ProductFeed = ListController<ProductService>;

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub feed: Arc<ProductFeed>,
    pub default_page_size: u32,
}

impl AppState {
    /// Wires the service, the shared list view and the refresh task.
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let events = ProductEvents::new();
        let products = ProductService::new(config, events.clone())?;
        let feed = Arc::new(ListController::new(products.clone()));
        feed.clone().spawn_refresh(events.subscribe());

        Ok(Self {
            products,
            feed,
            default_page_size: config.default_page_size,
        })
    }
}
