use ulid::Ulid;

use crate::model::TimeOfDay;

#[derive(Debug)]
pub enum ScheduleError {
    /// Starts outside operating hours, or runs past closing time.
    OutOfBusinessHours { open: TimeOfDay, close: TimeOfDay },
    /// Ends on a different local calendar day than it starts.
    SpansMultipleDays,
    /// Too close to another active appointment on the shared timeline.
    SchedulingConflict { buffer_min: u32 },
    /// Intersects an administrator-defined blocked window.
    BlockedSlotConflict {
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    },
    NotFound(Ulid),
    AlreadyExists(Ulid),
    InvalidInput(&'static str),
    LimitExceeded(&'static str),
    WalError(String),
}

impl std::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleError::OutOfBusinessHours { open, close } => {
                write!(f, "appointment must fall within business hours ({open} - {close})")
            }
            ScheduleError::SpansMultipleDays => {
                write!(f, "appointment must not end on the following day")
            }
            ScheduleError::SchedulingConflict { buffer_min } => {
                write!(f, "scheduling conflict: {buffer_min} min must separate appointments")
            }
            ScheduleError::BlockedSlotConflict { start, end, reason } => {
                write!(
                    f,
                    "conflicts with blocked slot {start} - {end} ({})",
                    reason.as_deref().unwrap_or("Bloqueado")
                )
            }
            ScheduleError::NotFound(id) => write!(f, "not found: {id}"),
            ScheduleError::AlreadyExists(id) => write!(f, "already exists: {id}"),
            ScheduleError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ScheduleError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            ScheduleError::WalError(e) => write!(f, "WAL error: {e}"),
        }
    }
}

impl std::error::Error for ScheduleError {}
