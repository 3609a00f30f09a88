use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unix milliseconds — the only absolute-time type.
pub type Ms = i64;

pub const MINUTE_MS: Ms = 60_000;

/// Half-open interval `[start, end)`. Values are unix milliseconds in most of
/// the crate; the openings computation reuses it for minute-of-day spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: Ms,
    pub end: Ms,
}

impl Span {
    pub fn new(start: Ms, end: Ms) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn width(&self) -> Ms {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Wall-clock time of day in the business timezone, held as minutes since
/// local midnight. Ordering on the minute count gives exactly the lexical
/// "HH:mm" ordering of the zero-padded string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const DAY_MINUTES: u16 = 24 * 60;

    pub const fn from_minutes(minutes: u16) -> Self {
        debug_assert!(minutes < Self::DAY_MINUTES);
        Self(minutes)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = ParseTimeOfDayError;

    /// Accepts `HH:mm` (and the single-digit-hour form `H:mm`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseTimeOfDayError(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(bad)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(bad());
        }
        let hours: u16 = h.parse().map_err(|_| bad())?;
        let minutes: u16 = m.parse().map_err(|_| bad())?;
        if hours > 23 || minutes > 59 {
            return Err(bad());
        }
        Ok(Self(hours * 60 + minutes))
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeOfDayError(String);

impl std::fmt::Display for ParseTimeOfDayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bad time of day {:?}: expected HH:mm", self.0)
    }
}

impl std::error::Error for ParseTimeOfDayError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl std::str::FromStr for AppointmentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(String);

impl std::fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bad appointment status {:?}", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

/// A scheduled visit. `start` is an absolute instant; everything wall-clock
/// about it is derived in the business timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Ulid,
    pub start: Ms,
    pub duration_min: u32,
    pub status: AppointmentStatus,
    pub worker_id: Ulid,
    pub client_id: Ulid,
    pub service_id: Ulid,
    pub notes: Option<String>,
}

impl Appointment {
    pub fn end(&self) -> Ms {
        self.start + Ms::from(self.duration_min) * MINUTE_MS
    }

    pub fn is_active(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

/// Administrator-defined exclusion window on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSlot {
    pub id: Ulid,
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub reason: Option<String>,
}

/// Operating parameters for the single shared timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    /// Minimum idle minutes required between two appointments.
    pub buffer_min: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            open: TimeOfDay::from_minutes(9 * 60),
            close: TimeOfDay::from_minutes(21 * 60),
            buffer_min: 10,
        }
    }
}

/// The whole schedule: one shared timeline for every worker. The overlap
/// check deliberately never filters by worker — the business books against a
/// single capacity, and two workers can not be booked into the same buffered
/// interval.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Sorted by `start`.
    pub appointments: Vec<Appointment>,
    /// Sorted by `(date, start)`.
    pub blocked: Vec<BlockedSlot>,
    pub config: ScheduleConfig,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleState {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            blocked: Vec::new(),
            config: ScheduleConfig::default(),
        }
    }

    pub fn appointment(&self, id: &Ulid) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == *id)
    }

    pub fn appointment_mut(&mut self, id: &Ulid) -> Option<&mut Appointment> {
        self.appointments.iter_mut().find(|a| a.id == *id)
    }

    /// Insert maintaining sort order by start.
    pub fn insert_appointment(&mut self, appointment: Appointment) {
        let pos = self
            .appointments
            .binary_search_by_key(&appointment.start, |a| a.start)
            .unwrap_or_else(|e| e);
        self.appointments.insert(pos, appointment);
    }

    pub fn remove_appointment(&mut self, id: &Ulid) -> Option<Appointment> {
        let pos = self.appointments.iter().position(|a| a.id == *id)?;
        Some(self.appointments.remove(pos))
    }

    /// Appointments whose start instant falls inside `window`.
    /// Uses binary search over the sorted list to bound the scan.
    pub fn starts_within(&self, window: &Span) -> impl Iterator<Item = &Appointment> {
        let lo = self
            .appointments
            .partition_point(|a| a.start < window.start);
        let hi = self.appointments.partition_point(|a| a.start < window.end);
        self.appointments[lo..hi].iter()
    }

    pub fn blocked_slot(&self, id: &Ulid) -> Option<&BlockedSlot> {
        self.blocked.iter().find(|s| s.id == *id)
    }

    pub fn insert_blocked(&mut self, slot: BlockedSlot) {
        let pos = self
            .blocked
            .binary_search_by(|s| (s.date, s.start).cmp(&(slot.date, slot.start)))
            .unwrap_or_else(|e| e);
        self.blocked.insert(pos, slot);
    }

    pub fn remove_blocked(&mut self, id: &Ulid) -> Option<BlockedSlot> {
        let pos = self.blocked.iter().position(|s| s.id == *id)?;
        Some(self.blocked.remove(pos))
    }

    pub fn blocked_on(&self, date: NaiveDate) -> impl Iterator<Item = &BlockedSlot> {
        self.blocked.iter().filter(move |s| s.date == date)
    }
}

/// Bookable gap in one day's schedule, in business-timezone wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opening {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// Flat event records. This is the WAL record format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    AppointmentBooked {
        id: Ulid,
        start: Ms,
        duration_min: u32,
        status: AppointmentStatus,
        worker_id: Ulid,
        client_id: Ulid,
        service_id: Ulid,
        notes: Option<String>,
    },
    AppointmentRescheduled {
        id: Ulid,
        start: Ms,
        duration_min: u32,
    },
    AppointmentStatusChanged {
        id: Ulid,
        status: AppointmentStatus,
    },
    AppointmentRemoved {
        id: Ulid,
    },
    SlotBlocked {
        id: Ulid,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        reason: Option<String>,
    },
    SlotUnblocked {
        id: Ulid,
    },
    ConfigUpdated {
        open: TimeOfDay,
        close: TimeOfDay,
        buffer_min: u32,
    },
}
