// libs/doctor-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: String,
    /// Professional board registration number (e.g. "OMP 12345").
    pub registration: String,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    pub registration: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub registration: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub experience: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectDoctorRequest {
    /// `None` means "all practitioners" - no filter applied.
    pub doctor_id: Option<Uuid>,
}
