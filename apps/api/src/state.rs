// apps/api/src/state.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use assistant_cell::services::client::AssistantClient;
use budget_cell::services::approval::BudgetService;
use doctor_cell::models::CreateDoctorRequest;
use doctor_cell::services::roster::DoctorRoster;
use messaging_cell::services::sms::SmsGateway;
use messaging_cell::services::whatsapp::WhatsAppClient;
use notification_cell::services::store::NotificationStore;
use patient_cell::models::{HistoryEntry, HistoryKind, Patient};
use patient_cell::services::roster::PatientRoster;
use schedule_cell::models::{Appointment, AppointmentStatus, PatientRef};
use schedule_cell::services::booking::BookingService;
use schedule_cell::services::registry::SlotRegistry;
use schedule_cell::services::waitlist::Waitlist;
use shared_config::AppConfig;
use shared_models::clinic::ClinicProfile;

/// Process-wide state container. Owns every store once; routers receive the
/// pieces they need, so no component reaches for ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clinic: Arc<RwLock<ClinicProfile>>,
    pub notifications: NotificationStore,
    pub doctors: DoctorRoster,
    pub patients: PatientRoster,
    pub booking: BookingService,
    pub budgets: BudgetService,
    pub whatsapp: WhatsAppClient,
    pub sms: SmsGateway,
    pub assistant: AssistantClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let notifications = NotificationStore::new();
        let doctors = DoctorRoster::new();
        let patients = PatientRoster::new();
        let whatsapp = WhatsAppClient::new(Arc::clone(&config));

        let booking = BookingService::new(
            SlotRegistry::new(),
            Waitlist::new(),
            doctors.clone(),
            patients.clone(),
            notifications.clone(),
            Arc::new(whatsapp.clone()),
        );
        let budgets = BudgetService::new(patients.clone(), notifications.clone());
        let assistant = AssistantClient::new(Arc::clone(&config));

        Self {
            clinic: Arc::new(RwLock::new(ClinicProfile::default())),
            notifications,
            doctors,
            patients,
            booking,
            budgets,
            whatsapp,
            sms: SmsGateway::new(),
            assistant,
            config,
        }
    }

    /// Demo dataset the dashboard boots with: two practitioners, one roster
    /// patient, one confirmed appointment and one waitlisted candidate.
    pub async fn seeded(config: AppConfig) -> Self {
        let state = Self::new(config);

        let ricardo = state
            .doctors
            .add(CreateDoctorRequest {
                name: "Dr. Ricardo M.".to_string(),
                specialty: "Implantology".to_string(),
                registration: "OMP 12345".to_string(),
                avatar_url: Some("https://i.pravatar.cc/150?u=d1".to_string()),
                bio: None,
                experience: None,
            })
            .await;
        state
            .doctors
            .add(CreateDoctorRequest {
                name: "Dra. Sofia Bento".to_string(),
                specialty: "Orthodontics".to_string(),
                registration: "OMP 67890".to_string(),
                avatar_url: Some("https://i.pravatar.cc/150?u=d2".to_string()),
                bio: None,
                experience: None,
            })
            .await;

        let ana = Patient {
            id: Uuid::new_v4(),
            name: "Ana Silva".to_string(),
            nif: "254888999".to_string(),
            phone: "912345678".to_string(),
            email: Some("ana.silva@email.com".to_string()),
            last_visit: Some("2024-05-18".parse().unwrap_or_else(|_| Utc::now().date_naive())),
            last_viewed_at: None,
            health_plan: "Médis".to_string(),
            doctor_id: Some(ricardo.id),
            notes: Some("Patient with tooth sensitivity.".to_string()),
            history: vec![HistoryEntry {
                id: Uuid::new_v4(),
                kind: HistoryKind::Budget,
                date: "2024-05-18".parse().unwrap_or_else(|_| Utc::now().date_naive()),
                description: "Cleaning and polishing".to_string(),
                value: Some(60.0),
                status: "Paid".to_string(),
            }],
        };
        let ana_id = ana.id;
        state.patients.insert(ana).await;

        if let Some(nine) = chrono::NaiveTime::from_hms_opt(9, 0, 0) {
            let _ = state
                .booking
                .registry()
                .book(Appointment {
                    id: Uuid::new_v4(),
                    patient: PatientRef {
                        id: Some(ana_id),
                        name: "Ana Silva".to_string(),
                    },
                    doctor_id: ricardo.id,
                    date: "2024-05-20".parse().unwrap_or_else(|_| Utc::now().date_naive()),
                    time: nine,
                    status: AppointmentStatus::Confirmed,
                    procedure: "General cleaning".to_string(),
                    value: 60.0,
                })
                .await;
        }

        state
            .booking
            .waitlist()
            .join("Eduarda Gomes", "(+351) 912 888 777", "Afternoon")
            .await;

        state
    }
}
