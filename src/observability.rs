use std::net::SocketAddr;

use crate::sql::Command;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: total queries executed. Labels: command, status.
pub const QUERIES_TOTAL: &str = "citas_queries_total";

/// Histogram: query latency in seconds. Labels: command.
pub const QUERY_DURATION_SECONDS: &str = "citas_query_duration_seconds";

// ── USE metrics (resource utilization) ──────────────────────────

/// Gauge: active TCP connections.
pub const CONNECTIONS_ACTIVE: &str = "citas_connections_active";

/// Counter: total connections accepted.
pub const CONNECTIONS_TOTAL: &str = "citas_connections_total";

/// Counter: connections rejected due to limit.
pub const CONNECTIONS_REJECTED_TOTAL: &str = "citas_connections_rejected_total";

/// Histogram: WAL group-commit flush duration in seconds.
pub const WAL_FLUSH_DURATION_SECONDS: &str = "citas_wal_flush_duration_seconds";

/// Histogram: WAL group-commit batch size (events per flush).
pub const WAL_FLUSH_BATCH_SIZE: &str = "citas_wal_flush_batch_size";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}

/// Map a Command variant to a short label for metrics.
pub fn command_label(cmd: &Command) -> &'static str {
    match cmd {
        Command::InsertAppointment { .. } => "insert_appointment",
        Command::UpdateAppointment { .. } => "update_appointment",
        Command::DeleteAppointment { .. } => "delete_appointment",
        Command::InsertBlockedSlot { .. } => "insert_blocked_slot",
        Command::DeleteBlockedSlot { .. } => "delete_blocked_slot",
        Command::UpdateConfig { .. } => "update_config",
        Command::SelectAppointments { .. } => "select_appointments",
        Command::SelectBlockedSlots { .. } => "select_blocked_slots",
        Command::SelectConfig => "select_config",
        Command::SelectOpenings { .. } => "select_openings",
    }
}
