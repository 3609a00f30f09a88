use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::validate::validate_appointment;
use super::{ScheduleError, Scheduler, WalCommand};

impl Scheduler {
    /// Book a new appointment. The full validation pipeline and the commit
    /// run under one write lock.
    pub async fn book_appointment(&self, appt: Appointment) -> Result<(), ScheduleError> {
        if let Some(ref notes) = appt.notes
            && notes.len() > MAX_NOTES_LEN {
                return Err(ScheduleError::LimitExceeded("notes too long"));
            }

        let mut state = self.state.write().await;
        if state.appointments.len() >= MAX_APPOINTMENTS {
            return Err(ScheduleError::LimitExceeded("too many appointments"));
        }
        if state.appointment(&appt.id).is_some() {
            return Err(ScheduleError::AlreadyExists(appt.id));
        }

        validate_appointment(&state, appt.start, appt.duration_min, None)?;

        let event = Event::AppointmentBooked {
            id: appt.id,
            start: appt.start,
            duration_min: appt.duration_min,
            status: appt.status,
            worker_id: appt.worker_id,
            client_id: appt.client_id,
            service_id: appt.service_id,
            notes: appt.notes.clone(),
        };
        self.persist_and_apply(&mut state, &event).await
    }

    /// Reschedule and/or change status. Re-validation (excluding the
    /// appointment itself) happens only when the timing actually changes —
    /// a pure status flip never re-runs the pipeline.
    pub async fn update_appointment(
        &self,
        id: Ulid,
        start: Option<Ms>,
        duration_min: Option<u32>,
        status: Option<AppointmentStatus>,
    ) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;
        let (current_start, current_duration) = {
            let appt = state.appointment(&id).ok_or(ScheduleError::NotFound(id))?;
            (appt.start, appt.duration_min)
        };

        if start.is_some() || duration_min.is_some() {
            let new_start = start.unwrap_or(current_start);
            let new_duration = duration_min.unwrap_or(current_duration);
            validate_appointment(&state, new_start, new_duration, Some(id))?;
            let event = Event::AppointmentRescheduled {
                id,
                start: new_start,
                duration_min: new_duration,
            };
            self.persist_and_apply(&mut state, &event).await?;
        }

        if let Some(status) = status {
            let event = Event::AppointmentStatusChanged { id, status };
            self.persist_and_apply(&mut state, &event).await?;
        }

        Ok(())
    }

    /// Hard delete. Cancellation is a status change, not a removal.
    pub async fn remove_appointment(&self, id: Ulid) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;
        if state.appointment(&id).is_none() {
            return Err(ScheduleError::NotFound(id));
        }
        let event = Event::AppointmentRemoved { id };
        self.persist_and_apply(&mut state, &event).await
    }

    pub async fn block_slot(
        &self,
        id: Ulid,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    ) -> Result<(), ScheduleError> {
        if start >= end {
            return Err(ScheduleError::InvalidInput("blocked slot start must precede its end"));
        }
        if let Some(ref reason) = reason
            && reason.len() > MAX_REASON_LEN {
                return Err(ScheduleError::LimitExceeded("reason too long"));
            }

        let mut state = self.state.write().await;
        if state.blocked.len() >= MAX_BLOCKED_SLOTS {
            return Err(ScheduleError::LimitExceeded("too many blocked slots"));
        }
        if state.blocked_slot(&id).is_some() {
            return Err(ScheduleError::AlreadyExists(id));
        }

        let event = Event::SlotBlocked {
            id,
            date,
            start,
            end,
            reason,
        };
        self.persist_and_apply(&mut state, &event).await
    }

    pub async fn unblock_slot(&self, id: Ulid) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;
        if state.blocked_slot(&id).is_none() {
            return Err(ScheduleError::NotFound(id));
        }
        let event = Event::SlotUnblocked { id };
        self.persist_and_apply(&mut state, &event).await
    }

    /// Update operating parameters. Unset fields keep their current value;
    /// defaults (09:00, 21:00, 10 min) come from `ScheduleConfig::default`
    /// when nothing was ever configured.
    pub async fn update_config(
        &self,
        open: Option<TimeOfDay>,
        close: Option<TimeOfDay>,
        buffer_min: Option<u32>,
    ) -> Result<(), ScheduleError> {
        let mut state = self.state.write().await;
        let current = state.config;
        let open = open.unwrap_or(current.open);
        let close = close.unwrap_or(current.close);
        let buffer_min = buffer_min.unwrap_or(current.buffer_min);

        if open > close {
            return Err(ScheduleError::InvalidInput("open time must not be later than close time"));
        }
        if buffer_min > MAX_BUFFER_MIN {
            return Err(ScheduleError::LimitExceeded("buffer too long"));
        }

        let event = Event::ConfigUpdated {
            open,
            close,
            buffer_min,
        };
        self.persist_and_apply(&mut state, &event).await
    }

    /// Rewrite the WAL with only the events needed to recreate current state.
    pub async fn compact_wal(&self) -> Result<(), ScheduleError> {
        let events = {
            let state = self.state.read().await;
            let mut events = Vec::with_capacity(1 + state.blocked.len() + state.appointments.len());
            events.push(Event::ConfigUpdated {
                open: state.config.open,
                close: state.config.close,
                buffer_min: state.config.buffer_min,
            });
            for slot in &state.blocked {
                events.push(Event::SlotBlocked {
                    id: slot.id,
                    date: slot.date,
                    start: slot.start,
                    end: slot.end,
                    reason: slot.reason.clone(),
                });
            }
            for appt in &state.appointments {
                events.push(Event::AppointmentBooked {
                    id: appt.id,
                    start: appt.start,
                    duration_min: appt.duration_min,
                    status: appt.status,
                    worker_id: appt.worker_id,
                    client_id: appt.client_id,
                    service_id: appt.service_id,
                    notes: appt.notes.clone(),
                });
            }
            events
        };

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.wal_tx
            .send(WalCommand::Compact {
                events,
                response: tx,
            })
            .await
            .map_err(|_| ScheduleError::WalError("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| ScheduleError::WalError("WAL writer dropped response".into()))?
            .map_err(|e| ScheduleError::WalError(e.to_string()))
    }
}
