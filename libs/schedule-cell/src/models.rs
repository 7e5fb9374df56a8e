// libs/schedule-cell/src/models.rs
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Canceled,
    /// Declared for future use: a slot pre-assigned to a waitlist candidate
    /// before the match is confirmed. No transition reaches it yet.
    Waitlist,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::Canceled => write!(f, "CANCELED"),
            AppointmentStatus::Waitlist => write!(f, "WAITLIST"),
        }
    }
}

/// Who the slot is held for. `id` is `None` for walk-ins and public bookings
/// whose patient record does not exist in the roster yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    pub id: Option<Uuid>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient: PatientRef,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub procedure: String,
    pub value: f64,
}

/// Fixed label written into a slot filled from the waitlist.
pub const WAITLIST_BACKFILL_PROCEDURE: &str = "Urgent (waitlist)";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    /// Free-text preference ("Morning", "Afternoon") shown to the desk.
    pub preferred_period: String,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureItem {
    #[serde(default)]
    pub description: String,
    /// Prices arrive from free-form budget rows; anything non-numeric counts
    /// as zero rather than failing the booking.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: Option<Uuid>,
    pub patient_name: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Explicit practitioner choice; falls back to the selected filter, then
    /// the first practitioner in registration order.
    pub doctor_id: Option<Uuid>,
    #[serde(default)]
    pub items: Vec<ProcedureItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicBookingRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub nif: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub taken: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub canceled: usize,
    /// Sum of estimated values over non-canceled appointments.
    pub projected_revenue: f64,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Slot {time} on {date} is already taken for practitioner {doctor_id}")]
    SlotConflict {
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    },

    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("The waitlist is empty")]
    EmptyWaitlist,

    #[error("A bulk confirmation is already in flight")]
    ConfirmationInFlight,

    #[error("Validation error: {0}")]
    Validation(String),
}

// ==============================================================================
// SERDE HELPERS
// ==============================================================================

/// Appointment times travel as fixed-width "HH:MM" strings.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

/// The bookable grid offered by the public flow.
pub fn bookable_times() -> Vec<NaiveTime> {
    ["09:00", "10:00", "11:00", "14:00", "15:00", "16:00", "17:00"]
        .iter()
        .filter_map(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn times_round_trip_as_hhmm() {
        let request: CreateAppointmentRequest = serde_json::from_value(json!({
            "patient_name": "Ana Silva",
            "date": "2024-05-20",
            "time": "09:00"
        }))
        .unwrap();
        assert_eq!(request.time.format("%H:%M").to_string(), "09:00");

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["time"], "09:00");
    }

    #[test]
    fn missing_or_malformed_prices_coerce_to_zero() {
        let request: CreateAppointmentRequest = serde_json::from_value(json!({
            "patient_name": "Ana Silva",
            "date": "2024-05-20",
            "time": "09:00",
            "items": [
                { "description": "Titanium post", "price": 1200 },
                { "description": "Porcelain crown", "price": "1800" },
                { "description": "No price" },
                { "description": "Junk price", "price": "n/a" },
                { "description": "Null price", "price": null }
            ]
        }))
        .unwrap();

        let total: f64 = request.items.iter().map(|i| i.price).sum();
        assert_eq!(total, 3000.0);
    }

    #[test]
    fn bookable_grid_matches_the_public_page() {
        let times = bookable_times();
        assert_eq!(times.len(), 7);
        assert_eq!(times[0].format("%H:%M").to_string(), "09:00");
        assert_eq!(times[6].format("%H:%M").to_string(), "17:00");
    }
}
