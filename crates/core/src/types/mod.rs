//! Core types for Careline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod complaint_id;
pub mod status;
pub mod username;

pub use complaint_id::{ComplaintId, ComplaintIdError};
pub use status::ComplaintStatus;
pub use username::{Username, UsernameError};
