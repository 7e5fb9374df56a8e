// libs/doctor-cell/src/services/roster.rs
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{CreateDoctorRequest, Doctor, UpdateDoctorRequest};

/// Practitioner roster plus the process-wide "selected practitioner" filter
/// driving the schedule and patient views. Registration order is preserved:
/// the first entry is the default practitioner when a booking names none.
#[derive(Clone)]
pub struct DoctorRoster {
    doctors: Arc<RwLock<Vec<Doctor>>>,
    selected: Arc<RwLock<Option<Uuid>>>,
}

impl DoctorRoster {
    pub fn new() -> Self {
        Self {
            doctors: Arc::new(RwLock::new(Vec::new())),
            selected: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn add(&self, request: CreateDoctorRequest) -> Doctor {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            specialty: request.specialty,
            registration: request.registration,
            avatar_url: request.avatar_url.unwrap_or_default(),
            bio: request.bio,
            experience: request.experience,
        };
        debug!("Adding practitioner {} ({})", doctor.name, doctor.id);
        self.doctors.write().await.push(doctor.clone());
        doctor
    }

    pub async fn update(&self, id: Uuid, request: UpdateDoctorRequest) -> Option<Doctor> {
        let mut doctors = self.doctors.write().await;
        let doctor = doctors.iter_mut().find(|d| d.id == id)?;

        if let Some(name) = request.name {
            doctor.name = name;
        }
        if let Some(specialty) = request.specialty {
            doctor.specialty = specialty;
        }
        if let Some(registration) = request.registration {
            doctor.registration = registration;
        }
        if let Some(avatar_url) = request.avatar_url {
            doctor.avatar_url = avatar_url;
        }
        if let Some(bio) = request.bio {
            doctor.bio = Some(bio);
        }
        if let Some(experience) = request.experience {
            doctor.experience = Some(experience);
        }

        Some(doctor.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Doctor> {
        let mut doctors = self.doctors.write().await;
        let position = doctors.iter().position(|d| d.id == id)?;
        let removed = doctors.remove(position);
        drop(doctors);

        // A removed practitioner cannot stay selected.
        let mut selected = self.selected.write().await;
        if *selected == Some(id) {
            *selected = None;
        }

        Some(removed)
    }

    pub async fn get(&self, id: Uuid) -> Option<Doctor> {
        self.doctors.read().await.iter().find(|d| d.id == id).cloned()
    }

    pub async fn list(&self) -> Vec<Doctor> {
        self.doctors.read().await.clone()
    }

    pub async fn first(&self) -> Option<Doctor> {
        self.doctors.read().await.first().cloned()
    }

    pub async fn selected(&self) -> Option<Uuid> {
        *self.selected.read().await
    }

    /// Set the active practitioner filter. An unknown id is ignored rather
    /// than surfaced: absence of the target is not contention over it.
    pub async fn set_selected(&self, id: Option<Uuid>) -> Option<Uuid> {
        let valid = match id {
            Some(id) => self.get(id).await.map(|d| d.id),
            None => None,
        };
        *self.selected.write().await = valid;
        valid
    }

    /// Practitioner resolution for bookings: explicit choice, else the
    /// selected filter, else the first practitioner in registration order.
    pub async fn resolve_for_booking(&self, explicit: Option<Uuid>) -> Option<Doctor> {
        if let Some(id) = explicit {
            if let Some(doctor) = self.get(id).await {
                return Some(doctor);
            }
        }
        if let Some(id) = self.selected().await {
            if let Some(doctor) = self.get(id).await {
                return Some(doctor);
            }
        }
        self.first().await
    }
}

impl Default for DoctorRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, specialty: &str) -> CreateDoctorRequest {
        CreateDoctorRequest {
            name: name.to_string(),
            specialty: specialty.to_string(),
            registration: "OMP 12345".to_string(),
            avatar_url: None,
            bio: None,
            experience: None,
        }
    }

    #[tokio::test]
    async fn registration_order_is_preserved() {
        let roster = DoctorRoster::new();
        roster.add(request("Dr. Ricardo M.", "Implantology")).await;
        roster.add(request("Dra. Sofia Bento", "Orthodontics")).await;

        let listed = roster.list().await;
        assert_eq!(listed[0].name, "Dr. Ricardo M.");
        assert_eq!(roster.first().await.unwrap().name, "Dr. Ricardo M.");
    }

    #[tokio::test]
    async fn resolution_prefers_explicit_then_filter_then_first() {
        let roster = DoctorRoster::new();
        let first = roster.add(request("Dr. Ricardo M.", "Implantology")).await;
        let second = roster.add(request("Dra. Sofia Bento", "Orthodontics")).await;

        assert_eq!(
            roster.resolve_for_booking(Some(second.id)).await.unwrap().id,
            second.id
        );

        roster.set_selected(Some(second.id)).await;
        assert_eq!(roster.resolve_for_booking(None).await.unwrap().id, second.id);

        roster.set_selected(None).await;
        assert_eq!(roster.resolve_for_booking(None).await.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn unknown_explicit_id_falls_through_to_the_roster() {
        let roster = DoctorRoster::new();
        let only = roster.add(request("Dr. Ricardo M.", "Implantology")).await;

        let resolved = roster.resolve_for_booking(Some(Uuid::new_v4())).await;
        assert_eq!(resolved.unwrap().id, only.id);
    }

    #[tokio::test]
    async fn removing_the_selected_practitioner_clears_the_filter() {
        let roster = DoctorRoster::new();
        let doctor = roster.add(request("Dr. Ricardo M.", "Implantology")).await;
        roster.set_selected(Some(doctor.id)).await;

        roster.remove(doctor.id).await;
        assert_eq!(roster.selected().await, None);
        assert!(roster.resolve_for_booking(None).await.is_none());
    }

    #[tokio::test]
    async fn selecting_an_unknown_practitioner_is_ignored() {
        let roster = DoctorRoster::new();
        roster.add(request("Dr. Ricardo M.", "Implantology")).await;

        assert_eq!(roster.set_selected(Some(Uuid::new_v4())).await, None);
        assert_eq!(roster.selected().await, None);
    }
}
