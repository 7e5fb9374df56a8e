// libs/budget-cell/src/services/approval.rs
use tracing::info;

use notification_cell::models::{NotificationCategory, NotificationKind};
use notification_cell::services::store::NotificationStore;
use patient_cell::services::roster::PatientRoster;

use crate::models::{ApproveBudgetRequest, BudgetApproval};

/// Treatment-budget approval. No registry interaction: an approval is an
/// event in the feed - one clinical entry, one billing follow-up - and it
/// arms the approval pulse in the header through the BUDGET category.
#[derive(Clone)]
pub struct BudgetService {
    patients: PatientRoster,
    notifications: NotificationStore,
}

impl BudgetService {
    pub fn new(patients: PatientRoster, notifications: NotificationStore) -> Self {
        Self {
            patients,
            notifications,
        }
    }

    pub async fn approve(&self, request: ApproveBudgetRequest) -> BudgetApproval {
        let total = request.total();
        let snapshot = self
            .patients
            .find_by_name(&request.patient_name)
            .await
            .map(|p| p.snapshot());
        let patient_matched = snapshot.is_some();

        info!(
            "Budget approved by {} for \"{}\" (total {:.2})",
            request.patient_name, request.procedure, total
        );

        self.notifications
            .record(
                format!(
                    "Budget approved: {} accepted the plan for \"{}\".",
                    request.patient_name, request.procedure
                ),
                NotificationKind::Success,
                snapshot.clone(),
                NotificationCategory::Budget,
            )
            .await;

        self.notifications
            .record(
                format!(
                    "URGENT BILLING: budget of €{total} approved by {}. Start invoice/contract issue.",
                    request.patient_name
                ),
                NotificationKind::Info,
                snapshot,
                NotificationCategory::Budget,
            )
            .await;

        BudgetApproval {
            patient_name: request.patient_name,
            procedure: request.procedure,
            total,
            patient_matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetItem;
    use patient_cell::models::CreatePatientRequest;

    fn request(patient_name: &str) -> ApproveBudgetRequest {
        ApproveBudgetRequest {
            patient_name: patient_name.to_string(),
            procedure: "Dental implant".to_string(),
            date: None,
            items: vec![
                BudgetItem {
                    description: "Titanium post".to_string(),
                    price: 1200.0,
                },
                BudgetItem {
                    description: "Porcelain crown".to_string(),
                    price: 1800.0,
                },
                BudgetItem {
                    description: "Surgical work".to_string(),
                    price: 500.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn approval_emits_the_clinical_and_billing_entries() {
        let notifications = NotificationStore::new();
        let service = BudgetService::new(PatientRoster::new(), notifications.clone());

        let approval = service.approve(request("Ana Silva")).await;
        assert_eq!(approval.total, 3500.0);
        assert!(!approval.patient_matched);

        let feed = notifications.bell_feed().await;
        assert_eq!(feed.len(), 2);
        // Billing follow-up is the most recent entry.
        assert_eq!(feed[0].kind, NotificationKind::Info);
        assert!(feed[0].message.contains("3500"));
        assert_eq!(feed[1].kind, NotificationKind::Success);
        assert!(feed.iter().all(|n| n.category == NotificationCategory::Budget));
    }

    #[tokio::test]
    async fn approval_arms_the_budget_pulse() {
        let notifications = NotificationStore::new();
        let service = BudgetService::new(PatientRoster::new(), notifications.clone());

        service.approve(request("Ana Silva")).await;
        assert!(notifications.budget_pulse().await);
    }

    #[tokio::test]
    async fn roster_match_snapshots_the_patient_identity() {
        let notifications = NotificationStore::new();
        let patients = PatientRoster::new();
        patients
            .add(CreatePatientRequest {
                name: "Ana Silva".to_string(),
                nif: "254888999".to_string(),
                phone: "912345678".to_string(),
                email: Some("ana.silva@email.com".to_string()),
                health_plan: None,
                doctor_id: None,
                notes: None,
            })
            .await;
        let service = BudgetService::new(patients, notifications.clone());

        // The approval screen carries a first name; the roster match is fuzzy.
        let approval = service.approve(request("Ana")).await;
        assert!(approval.patient_matched);

        let feed = notifications.bell_feed().await;
        assert_eq!(
            feed[0].patient.as_ref().unwrap().nif.as_deref(),
            Some("254888999")
        );
    }
}
