//! Complaint domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use careline_core::{ComplaintId, ComplaintStatus};

/// Stored shape of a complaint.
///
/// The complaint id is the store key; [`Complaint`] carries both together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub patient_name: String,
    pub complaint_type: String,
    pub description: String,
    /// Calendar date of submission (UTC).
    pub date_submitted: NaiveDate,
    pub status: ComplaintStatus,
    /// Triage note left by an admin; empty until one comments.
    #[serde(default)]
    pub admin_comment: String,
}

/// A complaint with its tracking id (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct Complaint {
    pub id: ComplaintId,
    #[serde(flatten)]
    pub record: ComplaintRecord,
}
