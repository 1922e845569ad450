pub mod products;
pub mod remote;
