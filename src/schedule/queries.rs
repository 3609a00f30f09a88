use chrono::NaiveDate;

use crate::limits::*;
use crate::model::*;

use super::openings::day_openings;
use super::{ScheduleError, Scheduler};

impl Scheduler {
    /// Appointments whose start falls inside `[start, end)`, ordered by
    /// start. Cancelled appointments are included — they are still rows,
    /// they just no longer block the timeline.
    pub async fn appointments_in_range(
        &self,
        start: Ms,
        end: Ms,
    ) -> Result<Vec<Appointment>, ScheduleError> {
        if end <= start {
            return Err(ScheduleError::InvalidInput("range end must follow range start"));
        }
        if end - start > MAX_QUERY_WINDOW_MS {
            return Err(ScheduleError::LimitExceeded("query window too wide"));
        }
        let state = self.state.read().await;
        Ok(state.starts_within(&Span::new(start, end)).cloned().collect())
    }

    pub async fn blocked_slots_on(&self, date: NaiveDate) -> Vec<BlockedSlot> {
        let state = self.state.read().await;
        state.blocked_on(date).cloned().collect()
    }

    pub async fn config(&self) -> ScheduleConfig {
        self.state.read().await.config
    }

    /// The day's bookable gaps, optionally only those at least
    /// `min_len_min` minutes wide.
    pub async fn free_windows(
        &self,
        date: NaiveDate,
        min_len_min: Option<u32>,
    ) -> Vec<Opening> {
        let state = self.state.read().await;
        day_openings(&state, date, min_len_min)
    }
}
