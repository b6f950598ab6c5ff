//! Status enums for complaint triage.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Triage status of a complaint.
///
/// Every complaint starts out `Pending`; administrators move it through the
/// remaining states from the triage dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplaintStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Rejected,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        };
        write!(f, "{s}")
    }
}
