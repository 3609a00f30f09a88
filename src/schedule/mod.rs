mod error;
mod mutations;
mod openings;
mod queries;
#[cfg(test)]
mod tests;
mod validate;

pub use error::ScheduleError;
pub use openings::{merge_overlapping, subtract_intervals};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc, oneshot};

use crate::model::*;
use crate::observability;
use crate::wal::Wal;

// ── Group-commit WAL channel ─────────────────────────────

pub(super) enum WalCommand {
    Append {
        event: Event,
        response: oneshot::Sender<io::Result<()>>,
    },
    Compact {
        events: Vec<Event>,
        response: oneshot::Sender<io::Result<()>>,
    },
    AppendsSinceCompact {
        response: oneshot::Sender<u64>,
    },
}

/// Background task that owns the WAL and batches appends for group commit:
/// block until an Append arrives, drain everything already queued, then
/// flush the whole batch with a single fsync and answer every sender.
async fn wal_writer_loop(mut wal: Wal, mut rx: mpsc::Receiver<WalCommand>) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WalCommand::Append { event, response } => {
                let mut batch = vec![(event, response)];
                let mut deferred = None;
                while let Ok(next) = rx.try_recv() {
                    match next {
                        WalCommand::Append { event, response } => batch.push((event, response)),
                        other => {
                            // Flush first so the control command sees every
                            // append that preceded it.
                            deferred = Some(other);
                            break;
                        }
                    }
                }
                flush_and_respond(&mut wal, batch);
                if let Some(cmd) = deferred {
                    handle_control(&mut wal, cmd);
                }
            }
            other => handle_control(&mut wal, other),
        }
    }
}

fn flush_and_respond(wal: &mut Wal, batch: Vec<(Event, oneshot::Sender<io::Result<()>>)>) {
    metrics::histogram!(observability::WAL_FLUSH_BATCH_SIZE).record(batch.len() as f64);
    let started = std::time::Instant::now();

    let mut result = Ok(());
    for (event, _) in &batch {
        if let Err(e) = wal.append_buffered(event) {
            result = Err(e);
            break;
        }
    }
    // Flush even after an append error so partially buffered bytes don't
    // bleed into the next batch (these callers are told the batch failed).
    let flushed = wal.flush_sync();
    if result.is_ok() {
        result = flushed;
    }
    metrics::histogram!(observability::WAL_FLUSH_DURATION_SECONDS)
        .record(started.elapsed().as_secs_f64());

    for (_, tx) in batch {
        let each = match &result {
            Ok(()) => Ok(()),
            Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
        };
        let _ = tx.send(each);
    }
}

fn handle_control(wal: &mut Wal, cmd: WalCommand) {
    match cmd {
        WalCommand::Compact { events, response } => {
            let result = Wal::write_compact_file(wal.path(), &events)
                .and_then(|()| wal.swap_compact_file());
            let _ = response.send(result);
        }
        WalCommand::AppendsSinceCompact { response } => {
            let _ = response.send(wal.appends_since_compact());
        }
        WalCommand::Append { .. } => unreachable!("appends are batched by the caller"),
    }
}

// ── Scheduler ────────────────────────────────────────────

/// The scheduling engine: the single shared timeline behind one lock, backed
/// by the WAL. Every mutation validates and commits under the write lock, so
/// concurrent requests for the same interval serialize instead of racing the
/// overlap check.
pub struct Scheduler {
    pub(super) state: Arc<RwLock<ScheduleState>>,
    pub(super) wal_tx: mpsc::Sender<WalCommand>,
}

/// Apply an event to the state (no locking — caller holds the lock).
fn apply_event(state: &mut ScheduleState, event: &Event) {
    match event {
        Event::AppointmentBooked {
            id,
            start,
            duration_min,
            status,
            worker_id,
            client_id,
            service_id,
            notes,
        } => {
            state.insert_appointment(Appointment {
                id: *id,
                start: *start,
                duration_min: *duration_min,
                status: *status,
                worker_id: *worker_id,
                client_id: *client_id,
                service_id: *service_id,
                notes: notes.clone(),
            });
        }
        Event::AppointmentRescheduled {
            id,
            start,
            duration_min,
        } => {
            // Remove and reinsert so the start ordering holds.
            if let Some(mut appt) = state.remove_appointment(id) {
                appt.start = *start;
                appt.duration_min = *duration_min;
                state.insert_appointment(appt);
            }
        }
        Event::AppointmentStatusChanged { id, status } => {
            if let Some(appt) = state.appointment_mut(id) {
                appt.status = *status;
            }
        }
        Event::AppointmentRemoved { id } => {
            state.remove_appointment(id);
        }
        Event::SlotBlocked {
            id,
            date,
            start,
            end,
            reason,
        } => {
            state.insert_blocked(BlockedSlot {
                id: *id,
                date: *date,
                start: *start,
                end: *end,
                reason: reason.clone(),
            });
        }
        Event::SlotUnblocked { id } => {
            state.remove_blocked(id);
        }
        Event::ConfigUpdated {
            open,
            close,
            buffer_min,
        } => {
            state.config = ScheduleConfig {
                open: *open,
                close: *close,
                buffer_min: *buffer_min,
            };
        }
    }
}

impl Scheduler {
    /// Open the schedule at `wal_path`, replaying its event history.
    pub fn open(wal_path: PathBuf) -> io::Result<Self> {
        let events = Wal::replay(&wal_path)?;
        let wal = Wal::open(&wal_path)?;
        let (wal_tx, wal_rx) = mpsc::channel(4096);
        tokio::spawn(wal_writer_loop(wal, wal_rx));

        let mut state = ScheduleState::new();
        for event in &events {
            apply_event(&mut state, event);
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            wal_tx,
        })
    }

    /// Write an event to the WAL via the background group-commit writer.
    async fn wal_append(&self, event: &Event) -> Result<(), ScheduleError> {
        let (tx, rx) = oneshot::channel();
        self.wal_tx
            .send(WalCommand::Append {
                event: event.clone(),
                response: tx,
            })
            .await
            .map_err(|_| ScheduleError::WalError("WAL writer shut down".into()))?;
        rx.await
            .map_err(|_| ScheduleError::WalError("WAL writer dropped response".into()))?
            .map_err(|e| ScheduleError::WalError(e.to_string()))
    }

    /// WAL-append + apply in one call. The event is applied only after the
    /// WAL accepted it, so in-memory state never runs ahead of disk.
    pub(super) async fn persist_and_apply(
        &self,
        state: &mut ScheduleState,
        event: &Event,
    ) -> Result<(), ScheduleError> {
        self.wal_append(event).await?;
        apply_event(state, event);
        Ok(())
    }

    pub async fn wal_appends_since_compact(&self) -> u64 {
        let (tx, rx) = oneshot::channel();
        if self
            .wal_tx
            .send(WalCommand::AppendsSinceCompact { response: tx })
            .await
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}
