use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, TimeZone};
use ulid::Ulid;

use super::*;
use crate::clock::BUSINESS_TZ;
use crate::model::*;

fn test_wal_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("citas_test_schedule");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    let _ = std::fs::remove_file(&path);
    path
}

/// Epoch millis of a Lima wall-clock instant on the test day.
fn lima(h: u32, min: u32) -> Ms {
    BUSINESS_TZ
        .with_ymd_and_hms(2025, 7, 2, h, min, 0)
        .unwrap()
        .timestamp_millis()
}

fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 2).unwrap()
}

fn appointment(start: Ms, duration_min: u32) -> Appointment {
    Appointment {
        id: Ulid::new(),
        start,
        duration_min,
        status: AppointmentStatus::Pending,
        worker_id: Ulid::new(),
        client_id: Ulid::new(),
        service_id: Ulid::new(),
        notes: None,
    }
}

#[tokio::test]
async fn book_and_query_roundtrip() {
    let scheduler = Scheduler::open(test_wal_path("book_query.wal")).unwrap();

    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    scheduler.book_appointment(appt).await.unwrap();

    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(12, 0))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(found[0].duration_min, 60);
}

#[tokio::test]
async fn duplicate_id_rejected() {
    let scheduler = Scheduler::open(test_wal_path("dup_id.wal")).unwrap();

    let appt = appointment(lima(10, 0), 60);
    let mut second = appointment(lima(15, 0), 60);
    second.id = appt.id;

    scheduler.book_appointment(appt).await.unwrap();
    let result = scheduler.book_appointment(second).await;
    assert!(matches!(result, Err(ScheduleError::AlreadyExists(_))));
}

#[tokio::test]
async fn buffer_enforced_at_engine_level() {
    let scheduler = Scheduler::open(test_wal_path("buffer.wal")).unwrap();
    scheduler
        .book_appointment(appointment(lima(10, 0), 60))
        .await
        .unwrap();

    // 5 min short of the 10-min default buffer
    let result = scheduler.book_appointment(appointment(lima(11, 5), 55)).await;
    assert!(matches!(
        result,
        Err(ScheduleError::SchedulingConflict { buffer_min: 10 })
    ));

    // Exactly at the boundary is fine
    scheduler
        .book_appointment(appointment(lima(11, 10), 50))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_appointment_frees_its_slot() {
    let scheduler = Scheduler::open(test_wal_path("cancelled.wal")).unwrap();

    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    scheduler.book_appointment(appt).await.unwrap();

    scheduler
        .update_appointment(id, None, None, Some(AppointmentStatus::Cancelled))
        .await
        .unwrap();

    // Overlapping the cancelled interval is allowed now
    scheduler
        .book_appointment(appointment(lima(10, 15), 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn reschedule_excludes_itself() {
    let scheduler = Scheduler::open(test_wal_path("self_exclude.wal")).unwrap();

    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    scheduler.book_appointment(appt).await.unwrap();

    // New time conflicts only with the appointment's own old interval
    scheduler
        .update_appointment(id, Some(lima(10, 30)), None, None)
        .await
        .unwrap();

    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(12, 0))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].start, lima(10, 30));
}

#[tokio::test]
async fn status_change_skips_revalidation() {
    let scheduler = Scheduler::open(test_wal_path("status_only.wal")).unwrap();

    let a = appointment(lima(10, 0), 60);
    let a_id = a.id;
    scheduler.book_appointment(a).await.unwrap();
    scheduler
        .book_appointment(appointment(lima(11, 10), 50))
        .await
        .unwrap();

    // Widening the buffer makes the existing pair violate the new spacing,
    // but a pure status flip must not re-run the pipeline.
    scheduler.update_config(None, None, Some(30)).await.unwrap();
    scheduler
        .update_appointment(a_id, None, None, Some(AppointmentStatus::Confirmed))
        .await
        .unwrap();

    // Touching the timing of the same appointment does re-validate.
    let result = scheduler
        .update_appointment(a_id, Some(lima(10, 5)), None, None)
        .await;
    assert!(matches!(
        result,
        Err(ScheduleError::SchedulingConflict { buffer_min: 30 })
    ));
}

#[tokio::test]
async fn update_unknown_appointment_fails() {
    let scheduler = Scheduler::open(test_wal_path("update_missing.wal")).unwrap();
    let result = scheduler
        .update_appointment(Ulid::new(), Some(lima(10, 0)), None, None)
        .await;
    assert!(matches!(result, Err(ScheduleError::NotFound(_))));
}

#[tokio::test]
async fn remove_appointment_clears_row() {
    let scheduler = Scheduler::open(test_wal_path("remove.wal")).unwrap();

    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    scheduler.book_appointment(appt).await.unwrap();
    scheduler.remove_appointment(id).await.unwrap();

    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(12, 0))
        .await
        .unwrap();
    assert!(found.is_empty());

    let result = scheduler.remove_appointment(id).await;
    assert!(matches!(result, Err(ScheduleError::NotFound(_))));
}

#[tokio::test]
async fn blocked_slot_rejects_and_reason_travels() {
    let scheduler = Scheduler::open(test_wal_path("blocked.wal")).unwrap();

    scheduler
        .block_slot(
            Ulid::new(),
            test_day(),
            "14:00".parse().unwrap(),
            "15:00".parse().unwrap(),
            Some("Mantenimiento".into()),
        )
        .await
        .unwrap();

    let result = scheduler.book_appointment(appointment(lima(14, 30), 15)).await;
    match result {
        Err(ScheduleError::BlockedSlotConflict { reason, .. }) => {
            assert_eq!(reason.as_deref(), Some("Mantenimiento"));
        }
        other => panic!("expected BlockedSlotConflict, got {other:?}"),
    }

    // Touching the window is fine
    scheduler
        .book_appointment(appointment(lima(13, 0), 60))
        .await
        .unwrap();
}

#[tokio::test]
async fn unblocking_reopens_the_window() {
    let scheduler = Scheduler::open(test_wal_path("unblock.wal")).unwrap();

    let slot_id = Ulid::new();
    scheduler
        .block_slot(
            slot_id,
            test_day(),
            "14:00".parse().unwrap(),
            "15:00".parse().unwrap(),
            None,
        )
        .await
        .unwrap();
    assert!(scheduler
        .book_appointment(appointment(lima(14, 0), 30))
        .await
        .is_err());

    scheduler.unblock_slot(slot_id).await.unwrap();
    scheduler
        .book_appointment(appointment(lima(14, 0), 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn block_slot_input_checks() {
    let scheduler = Scheduler::open(test_wal_path("block_input.wal")).unwrap();

    let result = scheduler
        .block_slot(
            Ulid::new(),
            test_day(),
            "15:00".parse().unwrap(),
            "14:00".parse().unwrap(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ScheduleError::InvalidInput(_))));

    let result = scheduler.unblock_slot(Ulid::new()).await;
    assert!(matches!(result, Err(ScheduleError::NotFound(_))));
}

#[tokio::test]
async fn config_defaults_until_updated() {
    let scheduler = Scheduler::open(test_wal_path("config_default.wal")).unwrap();

    let config = scheduler.config().await;
    assert_eq!(config.open.to_string(), "09:00");
    assert_eq!(config.close.to_string(), "21:00");
    assert_eq!(config.buffer_min, 10);

    scheduler
        .update_config(Some("10:00".parse().unwrap()), None, Some(15))
        .await
        .unwrap();
    let config = scheduler.config().await;
    assert_eq!(config.open.to_string(), "10:00");
    assert_eq!(config.close.to_string(), "21:00");
    assert_eq!(config.buffer_min, 15);

    // New hours apply to validation immediately
    let result = scheduler.book_appointment(appointment(lima(9, 30), 30)).await;
    assert!(matches!(
        result,
        Err(ScheduleError::OutOfBusinessHours { .. })
    ));
}

#[tokio::test]
async fn config_ordering_enforced() {
    let scheduler = Scheduler::open(test_wal_path("config_order.wal")).unwrap();

    let result = scheduler
        .update_config(Some("22:00".parse().unwrap()), None, None)
        .await;
    assert!(matches!(result, Err(ScheduleError::InvalidInput(_))));

    let result = scheduler
        .update_config(None, None, Some(crate::limits::MAX_BUFFER_MIN + 1))
        .await;
    assert!(matches!(result, Err(ScheduleError::LimitExceeded(_))));
}

#[tokio::test]
async fn state_survives_restart() {
    let path = test_wal_path("restart.wal");

    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    {
        let scheduler = Scheduler::open(path.clone()).unwrap();
        scheduler.book_appointment(appt).await.unwrap();
        scheduler
            .update_config(None, None, Some(20))
            .await
            .unwrap();
    }

    let scheduler = Scheduler::open(path).unwrap();
    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(12, 0))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);
    assert_eq!(scheduler.config().await.buffer_min, 20);
}

#[tokio::test]
async fn compaction_preserves_state() {
    let path = test_wal_path("compact.wal");

    let scheduler = Scheduler::open(path.clone()).unwrap();
    let appt = appointment(lima(10, 0), 60);
    let id = appt.id;
    scheduler.book_appointment(appt).await.unwrap();
    scheduler
        .book_appointment(appointment(lima(12, 0), 60))
        .await
        .unwrap();
    scheduler
        .update_appointment(id, Some(lima(10, 30)), None, Some(AppointmentStatus::Confirmed))
        .await
        .unwrap();
    scheduler
        .block_slot(
            Ulid::new(),
            test_day(),
            "18:00".parse().unwrap(),
            "19:00".parse().unwrap(),
            None,
        )
        .await
        .unwrap();

    assert!(scheduler.wal_appends_since_compact().await > 0);
    scheduler.compact_wal().await.unwrap();
    assert_eq!(scheduler.wal_appends_since_compact().await, 0);

    // Replay of the compacted WAL reproduces the same schedule
    let reopened = Scheduler::open(path).unwrap();
    let found = reopened
        .appointments_in_range(lima(9, 0), lima(14, 0))
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].start, lima(10, 30));
    assert_eq!(found[0].status, AppointmentStatus::Confirmed);
    assert_eq!(reopened.blocked_slots_on(test_day()).await.len(), 1);
}

#[tokio::test]
async fn concurrent_double_booking_single_winner() {
    let scheduler = Arc::new(Scheduler::open(test_wal_path("race.wal")).unwrap());

    let s1 = scheduler.clone();
    let s2 = scheduler.clone();
    let first = tokio::spawn(async move { s1.book_appointment(appointment(lima(10, 0), 60)).await });
    let second =
        tokio::spawn(async move { s2.book_appointment(appointment(lima(10, 30), 60)).await });

    let (a, b) = (first.await.unwrap(), second.await.unwrap());
    let winners = usize::from(a.is_ok()) + usize::from(b.is_ok());
    assert_eq!(winners, 1, "exactly one overlapping booking may win");

    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(13, 0))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn openings_reflect_bookings_blocks_and_buffer() {
    let scheduler = Scheduler::open(test_wal_path("openings.wal")).unwrap();

    scheduler
        .book_appointment(appointment(lima(10, 0), 60))
        .await
        .unwrap();
    scheduler
        .block_slot(
            Ulid::new(),
            test_day(),
            "14:00".parse().unwrap(),
            "15:00".parse().unwrap(),
            None,
        )
        .await
        .unwrap();

    let windows = scheduler.free_windows(test_day(), None).await;
    let rendered: Vec<String> = windows
        .iter()
        .map(|w| format!("{} - {}", w.start, w.end))
        .collect();
    assert_eq!(
        rendered,
        vec!["09:00 - 09:50", "11:10 - 14:00", "15:00 - 21:00"]
    );

    // Minimum-length filter trims the short gaps
    let windows = scheduler.free_windows(test_day(), Some(200)).await;
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start.to_string(), "15:00");

    // Cancelled appointments free their window again
    let found = scheduler
        .appointments_in_range(lima(9, 0), lima(12, 0))
        .await
        .unwrap();
    scheduler
        .update_appointment(found[0].id, None, None, Some(AppointmentStatus::Cancelled))
        .await
        .unwrap();
    let windows = scheduler.free_windows(test_day(), None).await;
    let rendered: Vec<String> = windows
        .iter()
        .map(|w| format!("{} - {}", w.start, w.end))
        .collect();
    assert_eq!(rendered, vec!["09:00 - 14:00", "15:00 - 21:00"]);
}

#[tokio::test]
async fn openings_empty_day_is_whole_operating_window() {
    let scheduler = Scheduler::open(test_wal_path("openings_empty.wal")).unwrap();
    let windows = scheduler.free_windows(test_day(), None).await;
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].start.to_string(), "09:00");
    assert_eq!(windows[0].end.to_string(), "21:00");
}
