// libs/schedule-cell/src/services/booking.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use doctor_cell::services::roster::DoctorRoster;
use messaging_cell::models::{BookingDelivery, BookingPayload, TriggerKind};
use notification_cell::models::{NotificationCategory, NotificationKind, PatientSnapshot};
use notification_cell::services::store::NotificationStore;
use patient_cell::models::validate_nif;
use patient_cell::services::roster::PatientRoster;

use crate::models::{
    bookable_times, Appointment, AppointmentStatus, CreateAppointmentRequest, PatientRef,
    PublicBookingRequest, ScheduleError, SlotAvailability,
};
use crate::services::registry::SlotRegistry;
use crate::services::waitlist::Waitlist;

const BULK_CONFIRM_PACING: Duration = Duration::from_secs(2);

/// Single entry point tying patient resolution, slot conflict checking,
/// registry mutation and notification emission into one user-facing action,
/// for both the staff console and the public booking flow.
///
/// Either the whole action commits or nothing does: a conflict or a
/// validation failure leaves the registry byte-for-byte unchanged. The
/// outbound confirmation is the one exception by design - it runs after the
/// local commit and its failure never rolls anything back.
#[derive(Clone)]
pub struct BookingService {
    registry: SlotRegistry,
    waitlist: Waitlist,
    doctors: DoctorRoster,
    patients: PatientRoster,
    notifications: NotificationStore,
    delivery: Arc<dyn BookingDelivery>,
    bulk_confirm_running: Arc<AtomicBool>,
    bulk_confirm_pacing: Duration,
}

impl BookingService {
    pub fn new(
        registry: SlotRegistry,
        waitlist: Waitlist,
        doctors: DoctorRoster,
        patients: PatientRoster,
        notifications: NotificationStore,
        delivery: Arc<dyn BookingDelivery>,
    ) -> Self {
        Self {
            registry,
            waitlist,
            doctors,
            patients,
            notifications,
            delivery,
            bulk_confirm_running: Arc::new(AtomicBool::new(false)),
            bulk_confirm_pacing: BULK_CONFIRM_PACING,
        }
    }

    /// Override the deliberate bulk-confirmation pacing; tests run it at zero.
    pub fn with_bulk_confirm_pacing(mut self, pacing: Duration) -> Self {
        self.bulk_confirm_pacing = pacing;
        self
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn waitlist(&self) -> &Waitlist {
        &self.waitlist
    }

    /// Staff booking. Practitioner resolution: explicit choice, else the
    /// selected filter, else the first practitioner in registration order.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, ScheduleError> {
        let doctor = self
            .doctors
            .resolve_for_booking(request.doctor_id)
            .await
            .ok_or_else(|| {
                ScheduleError::Validation("No practitioner available to take the booking".to_string())
            })?;

        let value: f64 = request.items.iter().map(|item| item.price).sum();
        let procedure = request
            .items
            .first()
            .map(|item| item.description.clone())
            .filter(|description| !description.is_empty())
            .unwrap_or_else(|| "Consultation".to_string());

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient: PatientRef {
                id: request.patient_id,
                name: request.patient_name.clone(),
            },
            doctor_id: doctor.id,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            procedure,
            value,
        };

        match self.registry.book(appointment).await {
            Ok(booked) => {
                // Snapshot only when the patient already exists in the roster.
                let snapshot = match request.patient_id {
                    Some(id) => self.patients.get(id).await.map(|p| p.snapshot()),
                    None => None,
                };
                self.notifications
                    .record(
                        format!("Slot reserved for {}.", request.patient_name),
                        NotificationKind::Success,
                        snapshot,
                        NotificationCategory::Appointment,
                    )
                    .await;
                info!("Appointment {} booked with {}", booked.id, doctor.name);
                Ok(booked)
            }
            Err(err @ ScheduleError::SlotConflict { .. }) => {
                self.notifications
                    .record(
                        format!("Warning: slot unavailable for {}.", doctor.name),
                        NotificationKind::Warning,
                        None,
                        NotificationCategory::Appointment,
                    )
                    .await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Public self-service booking. The tax-identifier gate rejects before
    /// any state is touched and without emitting a notification - the form
    /// shows the error inline. On success the confirmation goes out through
    /// the messaging collaborator, fire-and-forget.
    pub async fn create_public_booking(
        &self,
        request: PublicBookingRequest,
    ) -> Result<Appointment, ScheduleError> {
        if !validate_nif(&request.nif) {
            return Err(ScheduleError::Validation(
                "NIF must contain exactly 9 digits".to_string(),
            ));
        }

        let doctor = self
            .doctors
            .get(request.doctor_id)
            .await
            .ok_or(ScheduleError::NotFound)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient: PatientRef {
                id: None,
                name: request.name.clone(),
            },
            doctor_id: doctor.id,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            procedure: "Online booking".to_string(),
            value: 0.0,
        };

        let booked = match self.registry.book(appointment).await {
            Ok(booked) => booked,
            Err(err @ ScheduleError::SlotConflict { .. }) => {
                self.notifications
                    .record(
                        format!("Warning: slot unavailable for {}.", doctor.name),
                        NotificationKind::Warning,
                        None,
                        NotificationCategory::Appointment,
                    )
                    .await;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        self.notifications
            .record(
                format!("New online booking: {} with {}.", request.name, doctor.name),
                NotificationKind::Success,
                Some(PatientSnapshot {
                    name: request.name.clone(),
                    nif: Some(request.nif.clone()),
                    email: Some(request.email.clone()),
                    phone: Some(request.phone.clone()),
                }),
                NotificationCategory::Appointment,
            )
            .await;

        // Local state is committed; the outbound confirmation must not block
        // or roll it back.
        let delivery = Arc::clone(&self.delivery);
        let payload = BookingPayload {
            patient: request.name,
            date: request.date.to_string(),
            time: request.time.format("%H:%M").to_string(),
            phone: request.phone,
        };
        tokio::spawn(async move {
            if let Err(err) = delivery.trigger_automatic(TriggerKind::Booking, payload).await {
                warn!("Official channel unavailable, manual fallback applies: {}", err);
            }
        });

        Ok(booked)
    }

    /// Status change from the agenda row. Unknown ids stay a silent no-op;
    /// confirmations and cancellations land in the feed.
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Option<Appointment>, ScheduleError> {
        let appointment = match self.registry.set_status(id, new_status).await {
            Ok(appointment) => appointment,
            Err(ScheduleError::NotFound) => return Ok(None),
            Err(err) => return Err(err),
        };

        match new_status {
            AppointmentStatus::Confirmed => {
                self.notifications
                    .record(
                        format!("Appointment for {} confirmed.", appointment.patient.name),
                        NotificationKind::Success,
                        None,
                        NotificationCategory::Appointment,
                    )
                    .await;
            }
            AppointmentStatus::Canceled => {
                self.notifications
                    .record(
                        format!(
                            "Appointment for {} canceled. Slot now available.",
                            appointment.patient.name
                        ),
                        NotificationKind::Warning,
                        None,
                        NotificationCategory::Appointment,
                    )
                    .await;
            }
            _ => {}
        }

        Ok(Some(appointment))
    }

    /// Offer a freed slot to the head of the waitlist. The candidate is only
    /// dequeued once the backfill committed.
    pub async fn fill_slot_from_waitlist(&self, id: Uuid) -> Result<Appointment, ScheduleError> {
        let Some(candidate) = self.waitlist.peek().await else {
            self.notifications
                .record(
                    "The waitlist is empty.",
                    NotificationKind::Info,
                    None,
                    NotificationCategory::Appointment,
                )
                .await;
            return Err(ScheduleError::EmptyWaitlist);
        };

        let filled = self.registry.backfill(id, &candidate).await?;
        self.waitlist.pop().await;

        self.notifications
            .record(
                format!(
                    "Slot filled! {} booked for {}.",
                    candidate.name,
                    filled.time.format("%H:%M")
                ),
                NotificationKind::Success,
                None,
                NotificationCategory::Appointment,
            )
            .await;

        Ok(filled)
    }

    /// Bulk-confirm every pending appointment. Modeled as an in-flight
    /// operation: a second trigger while one runs is rejected, and the
    /// configured pacing keeps the UX honest about "work in progress" even
    /// though the mutation itself is instantaneous.
    pub async fn confirm_all_pending(&self) -> Result<usize, ScheduleError> {
        if self.bulk_confirm_running.swap(true, Ordering::SeqCst) {
            return Err(ScheduleError::ConfirmationInFlight);
        }

        self.notifications
            .record(
                "Dispatching smart reminders to every pending appointment...",
                NotificationKind::Info,
                None,
                NotificationCategory::Appointment,
            )
            .await;

        sleep(self.bulk_confirm_pacing).await;
        let count = self.registry.confirm_all_pending().await;

        self.notifications
            .record(
                format!("{count} appointments confirmed automatically."),
                NotificationKind::Success,
                None,
                NotificationCategory::Appointment,
            )
            .await;

        self.bulk_confirm_running.store(false, Ordering::SeqCst);
        info!("Bulk confirmation applied to {} appointments", count);
        Ok(count)
    }

    /// Free/taken map of the public bookable grid for one practitioner-day.
    pub async fn availability(
        &self,
        doctor_id: Uuid,
        date: chrono::NaiveDate,
    ) -> Vec<SlotAvailability> {
        let mut slots = Vec::new();
        for time in bookable_times() {
            slots.push(SlotAvailability {
                time,
                taken: self.registry.is_slot_taken(date, time, doctor_id).await,
            });
        }
        slots
    }
}
