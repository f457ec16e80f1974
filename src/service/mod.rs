//! Business workflows built on the storage layer.

pub mod accounts;

pub use accounts::AccountService;
