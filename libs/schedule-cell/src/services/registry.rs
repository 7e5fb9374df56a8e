// libs/schedule-cell/src/services/registry.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentStatus, PatientRef, ScheduleError, ScheduleStats, WaitlistEntry,
    WAITLIST_BACKFILL_PROCEDURE,
};

/// Owns every appointment and enforces the slot-uniqueness invariant: no two
/// non-canceled appointments may share a (date, time, practitioner) tuple.
/// Canceled slots free their key immediately for every booking path;
/// waitlist backfill is just one way to refill them.
///
/// The list is kept ordered by (date, time) ascending, so day views read off
/// directly. Conflict check and insert happen under one write lock - the
/// single place that would need a real compare-and-set if this ever served
/// more than one terminal.
#[derive(Clone)]
pub struct SlotRegistry {
    appointments: Arc<RwLock<Vec<Appointment>>>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self {
            appointments: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn is_slot_taken(&self, date: NaiveDate, time: NaiveTime, doctor_id: Uuid) -> bool {
        self.appointments
            .read()
            .await
            .iter()
            .any(|a| occupies(a, date, time, doctor_id))
    }

    /// Insert a new appointment after the conflict check. On conflict nothing
    /// changes - the caller surfaces the warning and keeps the registry as-is.
    pub async fn book(&self, appointment: Appointment) -> Result<Appointment, ScheduleError> {
        let mut appointments = self.appointments.write().await;

        let taken = appointments
            .iter()
            .any(|a| occupies(a, appointment.date, appointment.time, appointment.doctor_id));
        if taken {
            warn!(
                "Slot conflict: {} {} practitioner {}",
                appointment.date, appointment.time, appointment.doctor_id
            );
            return Err(ScheduleError::SlotConflict {
                doctor_id: appointment.doctor_id,
                date: appointment.date,
                time: appointment.time,
            });
        }

        debug!(
            "Booking {} at {} {} for practitioner {}",
            appointment.patient.name, appointment.date, appointment.time, appointment.doctor_id
        );
        appointments.push(appointment.clone());
        appointments.sort_by_key(|a| (a.date, a.time));
        Ok(appointment)
    }

    /// Pure status mutation guarded by the transition table. Re-applying the
    /// current status is an accepted no-op; leaving CANCELED is reserved for
    /// waitlist backfill.
    pub async fn set_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, ScheduleError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ScheduleError::NotFound)?;

        if appointment.status != new_status
            && !valid_transitions(appointment.status).contains(&new_status)
        {
            warn!(
                "Invalid status transition attempted: {} -> {}",
                appointment.status, new_status
            );
            return Err(ScheduleError::InvalidTransition {
                from: appointment.status,
                to: new_status,
            });
        }

        appointment.status = new_status;
        Ok(appointment.clone())
    }

    /// Rewrite a canceled slot for the next waitlist candidate: their name
    /// goes in, the slot is confirmed, and the estimate is reset.
    pub async fn backfill(
        &self,
        id: Uuid,
        candidate: &WaitlistEntry,
    ) -> Result<Appointment, ScheduleError> {
        let mut appointments = self.appointments.write().await;
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ScheduleError::NotFound)?;

        if appointment.status != AppointmentStatus::Canceled {
            return Err(ScheduleError::InvalidTransition {
                from: appointment.status,
                to: AppointmentStatus::Confirmed,
            });
        }

        appointment.patient = PatientRef {
            id: None,
            name: candidate.name.clone(),
        };
        appointment.status = AppointmentStatus::Confirmed;
        appointment.procedure = WAITLIST_BACKFILL_PROCEDURE.to_string();
        appointment.value = 0.0;

        Ok(appointment.clone())
    }

    /// Transition every PENDING appointment to CONFIRMED, returning how many
    /// were affected.
    pub async fn confirm_all_pending(&self) -> usize {
        let mut appointments = self.appointments.write().await;
        let mut count = 0;
        for appointment in appointments.iter_mut() {
            if appointment.status == AppointmentStatus::Pending {
                appointment.status = AppointmentStatus::Confirmed;
                count += 1;
            }
        }
        count
    }

    pub async fn get(&self, id: Uuid) -> Option<Appointment> {
        self.appointments.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// Day view, already ordered by time ascending.
    pub async fn schedule(&self, date: Option<NaiveDate>, doctor_id: Option<Uuid>) -> Vec<Appointment> {
        self.appointments
            .read()
            .await
            .iter()
            .filter(|a| date.map_or(true, |d| a.date == d))
            .filter(|a| doctor_id.map_or(true, |id| a.doctor_id == id))
            .cloned()
            .collect()
    }

    pub async fn stats(&self) -> ScheduleStats {
        let appointments = self.appointments.read().await;
        let mut stats = ScheduleStats {
            total: appointments.len(),
            pending: 0,
            confirmed: 0,
            canceled: 0,
            projected_revenue: 0.0,
        };
        for appointment in appointments.iter() {
            match appointment.status {
                AppointmentStatus::Pending => stats.pending += 1,
                AppointmentStatus::Confirmed => stats.confirmed += 1,
                AppointmentStatus::Canceled => stats.canceled += 1,
                AppointmentStatus::Waitlist => {}
            }
            if appointment.status != AppointmentStatus::Canceled {
                stats.projected_revenue += appointment.value;
            }
        }
        stats
    }
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn occupies(appointment: &Appointment, date: NaiveDate, time: NaiveTime, doctor_id: Uuid) -> bool {
    appointment.status != AppointmentStatus::Canceled
        && appointment.date == date
        && appointment.time == time
        && appointment.doctor_id == doctor_id
}

fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
    match current {
        AppointmentStatus::Pending => &[AppointmentStatus::Confirmed, AppointmentStatus::Canceled],
        AppointmentStatus::Confirmed => &[AppointmentStatus::Canceled],
        // Out of CANCELED only through backfill, which rewrites the slot.
        AppointmentStatus::Canceled => &[],
        AppointmentStatus::Waitlist => &[],
    }
}
