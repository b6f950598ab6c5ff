//! Careline Core - Shared types library.
//!
//! This crate provides common types used across all Careline components:
//! - `backend` - Complaint intake and admin triage HTTP service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no store access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for usernames, complaint ids, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
