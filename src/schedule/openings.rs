use chrono::NaiveDate;

use crate::clock;
use crate::model::*;

// ── Openings Algorithm ───────────────────────────────────────────
//
// A day's bookable gaps: the operating window minus every active
// appointment's buffered interval minus every blocked window, all in
// minute-of-day space.

/// Merge sorted spans into disjoint spans (adjacent spans coalesce).
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Subtract `to_remove` (sorted by start) from `base` (sorted, disjoint).
pub fn subtract_intervals(base: &[Span], to_remove: &[Span]) -> Vec<Span> {
    let mut result = Vec::new();
    let mut ri = 0;

    for &b in base {
        let mut cursor = b.start;

        while ri < to_remove.len() && to_remove[ri].end <= cursor {
            ri += 1;
        }

        let mut j = ri;
        while j < to_remove.len() && to_remove[j].start < b.end {
            let r = &to_remove[j];
            if r.start > cursor {
                result.push(Span::new(cursor, r.start));
            }
            cursor = cursor.max(r.end);
            j += 1;
        }

        if cursor < b.end {
            result.push(Span::new(cursor, b.end));
        }
    }

    result
}

pub(crate) fn day_openings(
    state: &ScheduleState,
    date: NaiveDate,
    min_len_min: Option<u32>,
) -> Vec<Opening> {
    let config = &state.config;
    let open = Ms::from(config.open.minutes());
    let close = Ms::from(config.close.minutes());
    if open >= close {
        return Vec::new();
    }
    let base = [Span::new(open, close)];
    let buffer = Ms::from(config.buffer_min);

    let mut busy: Vec<Span> = Vec::new();
    // Appointments never span days, so the ones starting on `date` are the
    // only ones that can occupy it.
    for appt in state.starts_within(&clock::day_bounds(date)) {
        if !appt.is_active() {
            continue;
        }
        let timing = clock::local_timing(appt.start, appt.duration_min);
        let start = Ms::from(timing.start_minute) - buffer;
        let end = Ms::from(timing.start_minute) + Ms::from(appt.duration_min) + buffer;
        busy.push(Span::new(
            start.max(0),
            end.min(Ms::from(TimeOfDay::DAY_MINUTES)),
        ));
    }
    for slot in state.blocked_on(date) {
        busy.push(Span::new(
            Ms::from(slot.start.minutes()),
            Ms::from(slot.end.minutes()),
        ));
    }
    busy.sort_by_key(|s| s.start);
    let busy = merge_overlapping(&busy);

    let mut free = subtract_intervals(&base, &busy);
    if let Some(min_len) = min_len_min {
        free.retain(|s| s.width() >= Ms::from(min_len));
    }

    free.into_iter()
        .map(|s| Opening {
            start: TimeOfDay::from_minutes(s.start as u16),
            end: TimeOfDay::from_minutes(s.end as u16),
        })
        .collect()
}
