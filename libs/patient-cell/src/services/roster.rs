// libs/patient-cell/src/services/roster.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    CreatePatientRequest, LastVisitWindow, Patient, PatientQuery, UpdatePatientRequest,
};

/// In-memory patient roster. Newest registrations come first, matching the
/// way the front desk works through the list.
#[derive(Clone)]
pub struct PatientRoster {
    patients: Arc<RwLock<Vec<Patient>>>,
}

impl PatientRoster {
    pub fn new() -> Self {
        Self {
            patients: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add(&self, request: CreatePatientRequest) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: request.name,
            nif: request.nif,
            phone: request.phone,
            email: request.email,
            last_visit: None,
            last_viewed_at: None,
            health_plan: request.health_plan.unwrap_or_else(|| "Private".to_string()),
            doctor_id: request.doctor_id,
            notes: request.notes,
            history: Vec::new(),
        };
        debug!("Registering patient {} ({})", patient.name, patient.id);
        self.patients.write().await.insert(0, patient.clone());
        patient
    }

    /// Insert a fully-formed record, used for seed data.
    pub async fn insert(&self, patient: Patient) {
        self.patients.write().await.insert(0, patient);
    }

    pub async fn update(&self, id: Uuid, request: UpdatePatientRequest) -> Option<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients.iter_mut().find(|p| p.id == id)?;

        if let Some(name) = request.name {
            patient.name = name;
        }
        if let Some(nif) = request.nif {
            patient.nif = nif;
        }
        if let Some(phone) = request.phone {
            patient.phone = phone;
        }
        if let Some(email) = request.email {
            patient.email = Some(email);
        }
        if let Some(health_plan) = request.health_plan {
            patient.health_plan = health_plan;
        }
        if let Some(doctor_id) = request.doctor_id {
            patient.doctor_id = Some(doctor_id);
        }
        if let Some(notes) = request.notes {
            patient.notes = Some(notes);
        }

        Some(patient.clone())
    }

    pub async fn get(&self, id: Uuid) -> Option<Patient> {
        self.patients.read().await.iter().find(|p| p.id == id).cloned()
    }

    /// Name lookup used when a booking or budget only carries free text.
    pub async fn find_by_name(&self, name: &str) -> Option<Patient> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
    }

    pub async fn search(&self, query: &PatientQuery) -> Vec<Patient> {
        let needle = query
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());
        let today = Utc::now().date_naive();

        self.patients
            .read()
            .await
            .iter()
            .filter(|p| match &needle {
                None => true,
                Some(needle) => {
                    p.name.to_lowercase().contains(needle)
                        || p.nif.contains(needle)
                        || p.phone.contains(needle)
                }
            })
            .filter(|p| query.doctor_id.map_or(true, |id| p.doctor_id == Some(id)))
            .filter(|p| match query.last_visit {
                None => true,
                Some(window) => {
                    let days = p
                        .last_visit
                        .map(|visit| (today - visit).num_days())
                        .unwrap_or(i64::MAX);
                    match window {
                        LastVisitWindow::Week => days <= 7,
                        LastVisitWindow::Month => days <= 30,
                        LastVisitWindow::Inactive => days > 180,
                    }
                }
            })
            .cloned()
            .collect()
    }

    /// Stamp the record as viewed; feeds the "last opened" audit column.
    pub async fn record_view(&self, id: Uuid) -> Option<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients.iter_mut().find(|p| p.id == id)?;
        patient.last_viewed_at = Some(Utc::now());
        Some(patient.clone())
    }

    pub async fn save_notes(&self, id: Uuid, notes: String) -> Option<Patient> {
        let mut patients = self.patients.write().await;
        let patient = patients.iter_mut().find(|p| p.id == id)?;
        patient.notes = Some(notes);
        Some(patient.clone())
    }
}

impl Default for PatientRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(name: &str, nif: &str, phone: &str) -> CreatePatientRequest {
        CreatePatientRequest {
            name: name.to_string(),
            nif: nif.to_string(),
            phone: phone.to_string(),
            email: None,
            health_plan: None,
            doctor_id: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn search_matches_name_nif_and_phone() {
        let roster = PatientRoster::new();
        roster.add(request("Ana Silva", "254888999", "912345678")).await;
        roster.add(request("Bruno Costa", "198765432", "961111222")).await;

        for needle in ["ana", "254888", "9123"] {
            let query = PatientQuery {
                search: Some(needle.to_string()),
                ..Default::default()
            };
            let hits = roster.search(&query).await;
            assert_eq!(hits.len(), 1, "needle {needle}");
            assert_eq!(hits[0].name, "Ana Silva");
        }
    }

    #[tokio::test]
    async fn last_visit_windows_partition_the_roster() {
        let roster = PatientRoster::new();
        let today = Utc::now().date_naive();

        let recent = roster.add(request("Ana Silva", "254888999", "912345678")).await;
        let dormant = roster.add(request("Bruno Costa", "198765432", "961111222")).await;
        {
            let mut patients = roster.patients.write().await;
            patients.iter_mut().find(|p| p.id == recent.id).unwrap().last_visit =
                Some(today - Duration::days(3));
            patients.iter_mut().find(|p| p.id == dormant.id).unwrap().last_visit =
                Some(today - Duration::days(200));
        }

        let week = PatientQuery {
            last_visit: Some(LastVisitWindow::Week),
            ..Default::default()
        };
        assert_eq!(roster.search(&week).await[0].id, recent.id);

        let inactive = PatientQuery {
            last_visit: Some(LastVisitWindow::Inactive),
            ..Default::default()
        };
        assert_eq!(roster.search(&inactive).await[0].id, dormant.id);
    }

    #[tokio::test]
    async fn never_visited_patients_count_as_inactive() {
        let roster = PatientRoster::new();
        roster.add(request("Ana Silva", "254888999", "912345678")).await;

        let inactive = PatientQuery {
            last_visit: Some(LastVisitWindow::Inactive),
            ..Default::default()
        };
        assert_eq!(roster.search(&inactive).await.len(), 1);

        let week = PatientQuery {
            last_visit: Some(LastVisitWindow::Week),
            ..Default::default()
        };
        assert!(roster.search(&week).await.is_empty());
    }

    #[tokio::test]
    async fn viewing_a_record_stamps_the_audit_field() {
        let roster = PatientRoster::new();
        let patient = roster.add(request("Ana Silva", "254888999", "912345678")).await;
        assert!(patient.last_viewed_at.is_none());

        let viewed = roster.record_view(patient.id).await.unwrap();
        assert!(viewed.last_viewed_at.is_some());
        assert!(roster.record_view(Uuid::new_v4()).await.is_none());
    }
}
