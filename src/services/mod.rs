pub mod list_state;
pub mod product_service;
