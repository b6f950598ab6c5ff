//! Business services for the backend.

pub mod accounts;

pub use accounts::{AccountError, AccountService};
