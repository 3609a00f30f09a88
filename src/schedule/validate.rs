use ulid::Ulid;

use crate::clock::{self, LocalTiming};
use crate::limits::*;
use crate::model::*;

use super::ScheduleError;

const DAY_MS: Ms = 24 * 60 * MINUTE_MS;

// ── Validation Pipeline ──────────────────────────────────────────
//
// Every appointment create/update runs this gauntlet over a state snapshot:
// normalize → business hours → overlap → blocked slots, stopping at the
// first failure. The caller holds the state lock across validation and
// commit, so two concurrent requests can never both pass the overlap check.

pub(crate) fn validate_appointment(
    state: &ScheduleState,
    start: Ms,
    duration_min: u32,
    exclude: Option<Ulid>,
) -> Result<(), ScheduleError> {
    check_bounds(start, duration_min)?;
    let timing = clock::local_timing(start, duration_min);
    check_business_hours(&timing, duration_min, &state.config)?;
    check_overlap(state, start, duration_min, state.config.buffer_min, exclude)?;
    check_blocked(state, &timing, duration_min)
}

pub(crate) fn check_bounds(start: Ms, duration_min: u32) -> Result<(), ScheduleError> {
    if !(MIN_VALID_TIMESTAMP_MS..=MAX_VALID_TIMESTAMP_MS).contains(&start) {
        return Err(ScheduleError::LimitExceeded("start timestamp out of range"));
    }
    if duration_min == 0 {
        return Err(ScheduleError::InvalidInput("duration must be at least one minute"));
    }
    if duration_min > MAX_DURATION_MIN {
        return Err(ScheduleError::LimitExceeded("duration too long"));
    }
    Ok(())
}

fn check_business_hours(
    timing: &LocalTiming,
    duration_min: u32,
    config: &ScheduleConfig,
) -> Result<(), ScheduleError> {
    let open = config.open.minutes();
    let close = config.close.minutes();
    let out_of_hours = || ScheduleError::OutOfBusinessHours {
        open: config.open,
        close: config.close,
    };

    if timing.start_minute < open || timing.start_minute > close {
        return Err(out_of_hours());
    }
    // Judge the end as start + elapsed minutes, NOT as the wrapped
    // end-of-day clock reading: an overnight span must not masquerade as an
    // early-morning time that happens to sit inside hours.
    if u32::from(timing.start_minute) + duration_min > u32::from(close) {
        return Err(out_of_hours());
    }
    check_single_day(timing)
}

pub(crate) fn check_single_day(timing: &LocalTiming) -> Result<(), ScheduleError> {
    if timing.start_date != timing.end_date {
        return Err(ScheduleError::SpansMultipleDays);
    }
    Ok(())
}

/// Buffered candidate `[start - buffer, end + buffer]` vs the unbuffered
/// interval of every active appointment. Boundary equality is safe: an
/// appointment ending exactly where the buffer window begins is no conflict.
fn check_overlap(
    state: &ScheduleState,
    start: Ms,
    duration_min: u32,
    buffer_min: u32,
    exclude: Option<Ulid>,
) -> Result<(), ScheduleError> {
    let end = start + Ms::from(duration_min) * MINUTE_MS;
    let buffer = Ms::from(buffer_min) * MINUTE_MS;

    // Pre-filter by appointment start, widened a full day past the buffered
    // window on each side so a long-running appointment that begins well
    // before the window still surfaces when its end reaches in.
    let prefilter = Span::new(start - buffer - DAY_MS, end + buffer + DAY_MS);
    for appt in state.starts_within(&prefilter) {
        if !appt.is_active() || exclude == Some(appt.id) {
            continue;
        }
        let safe_before = appt.end() + buffer <= start;
        let safe_after = appt.start >= end + buffer;
        if !safe_before && !safe_after {
            return Err(ScheduleError::SchedulingConflict { buffer_min });
        }
    }
    Ok(())
}

/// Half-open minute-of-day overlap against blocked windows on the start's
/// local calendar day. Touching boundaries are not a conflict.
fn check_blocked(
    state: &ScheduleState,
    timing: &LocalTiming,
    duration_min: u32,
) -> Result<(), ScheduleError> {
    let appt_start = u32::from(timing.start_minute);
    let appt_end = appt_start + duration_min;
    for slot in state.blocked_on(timing.start_date) {
        let slot_start = u32::from(slot.start.minutes());
        let slot_end = u32::from(slot.end.minutes());
        if slot_start.max(appt_start) < slot_end.min(appt_end) {
            return Err(ScheduleError::BlockedSlotConflict {
                start: slot.start,
                end: slot.end,
                reason: slot.reason.clone(),
            });
        }
    }
    Ok(())
}
