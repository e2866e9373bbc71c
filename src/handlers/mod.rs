pub mod account;
pub mod resources;
