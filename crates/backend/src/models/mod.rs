//! Domain models for the Careline backend.

pub mod admin;
pub mod complaint;
pub mod session;

pub use admin::{AdminAccount, AdminRecord, AdminSummary};
pub use complaint::{Complaint, ComplaintRecord};
pub use session::CurrentAdmin;
