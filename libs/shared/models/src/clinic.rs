use serde::{Deserialize, Serialize};

/// Maximum accepted size for an inlined (data-URL) clinic logo.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClinicKind {
    Medical,
    Dental,
}

impl ClinicKind {
    /// Label used for the practitioner role in clinic-facing copy.
    pub fn practitioner_term(&self) -> &'static str {
        match self {
            ClinicKind::Medical => "Doctor",
            ClinicKind::Dental => "Dentist",
        }
    }
}

/// White-label identity shown on every surface, editable from settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicProfile {
    pub clinic_name: String,
    pub logo_url: String,
    pub primary_color: String,
    pub accent_color: String,
    pub kind: ClinicKind,
}

impl Default for ClinicProfile {
    fn default() -> Self {
        Self {
            clinic_name: "OdontoLux Dental Care".to_string(),
            logo_url: "https://picsum.photos/seed/clinic/200/200".to_string(),
            primary_color: "#2563eb".to_string(),
            accent_color: "#4f46e5".to_string(),
            kind: ClinicKind::Dental,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClinicProfileRequest {
    pub clinic_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub kind: Option<ClinicKind>,
}
