// libs/patient-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notification_cell::models::PatientSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryKind {
    Budget,
    Payment,
    Consultation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: HistoryKind,
    pub date: NaiveDate,
    pub description: String,
    pub value: Option<f64>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    /// Portuguese tax identifier (NIF): exactly nine digits.
    pub nif: String,
    pub phone: String,
    pub email: Option<String>,
    pub last_visit: Option<NaiveDate>,
    /// Stamped whenever staff open the full record, for the audit trail.
    pub last_viewed_at: Option<DateTime<Utc>>,
    pub health_plan: String,
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
    pub history: Vec<HistoryEntry>,
}

impl Patient {
    /// Identity captured by value for the notification feed.
    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            name: self.name.clone(),
            nif: Some(self.nif.clone()),
            email: self.email.clone(),
            phone: Some(self.phone.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub nif: String,
    pub phone: String,
    pub email: Option<String>,
    pub health_plan: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub nif: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub health_plan: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveNotesRequest {
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastVisitWindow {
    /// Seen within the last 7 days.
    Week,
    /// Seen within the last 30 days.
    Month,
    /// No visit for more than 180 days.
    Inactive,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientQuery {
    pub search: Option<String>,
    pub doctor_id: Option<Uuid>,
    pub last_visit: Option<LastVisitWindow>,
}

/// The booking gate: a tax identifier is exactly nine characters, all of
/// them digits.
pub fn validate_nif(nif: &str) -> bool {
    nif.len() == 9 && nif.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nif_requires_exactly_nine_digits() {
        assert!(validate_nif("123456789"));
        assert!(validate_nif("254888999"));

        assert!(!validate_nif("12345678")); // too short
        assert!(!validate_nif("1234567890")); // too long
        assert!(!validate_nif("12345678A")); // non-numeric
        assert!(!validate_nif("12 345678")); // whitespace
        assert!(!validate_nif(""));
    }
}
