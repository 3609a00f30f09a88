//! Hard bounds on every externally supplied quantity.

use crate::model::Ms;

pub const MIN_VALID_TIMESTAMP_MS: Ms = 0;
/// 2100-01-01T00:00:00Z
pub const MAX_VALID_TIMESTAMP_MS: Ms = 4_102_444_800_000;

/// One full day; longer appointments can never satisfy the same-day rule.
pub const MAX_DURATION_MIN: u32 = 1_440;

pub const MAX_BUFFER_MIN: u32 = 240;

pub const MAX_APPOINTMENTS: usize = 100_000;
pub const MAX_BLOCKED_SLOTS: usize = 10_000;

pub const MAX_NOTES_LEN: usize = 500;
pub const MAX_REASON_LEN: usize = 120;

/// Widest appointment range query (~one quarter).
pub const MAX_QUERY_WINDOW_MS: Ms = 92 * 24 * 3_600_000;
