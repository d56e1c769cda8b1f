use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Processing status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Processing,
    Completed,
    Rejected,
    OnHold,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Processing,
        ApplicationStatus::Completed,
        ApplicationStatus::Rejected,
        ApplicationStatus::OnHold,
    ];

    /// Serialized identifier, as used in catalog params and exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Processing => "Processing",
            ApplicationStatus::Completed => "Completed",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::OnHold => "OnHold",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::OnHold => f.write_str("On Hold"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// A generated property-registration application.
///
/// Type-specific fields are `None` unless the application type declares them,
/// and are omitted from serialized output when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Unique reference, `LR` + 6 digits + 1 uppercase letter.
    pub reference: String,
    pub application_type_id: u32,
    pub property_address: String,
    pub applicants: Vec<String>,
    pub submission_date: NaiveDate,
    pub expected_completion_date: NaiveDate,
    pub status: ApplicationStatus,
    /// 1 (highest) to 5.
    pub priority: u8,
    pub form_used: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_for_correction: Option<String>,
}
