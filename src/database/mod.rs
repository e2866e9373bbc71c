pub mod manager;
pub mod models;
pub mod postgres;
pub mod store;
