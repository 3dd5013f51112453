use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: bookings committed through insert.
pub const BOOKINGS_INSERTED_TOTAL: &str = "roomtab_bookings_inserted_total";

/// Counter: bookings removed.
pub const BOOKINGS_REMOVED_TOTAL: &str = "roomtab_bookings_removed_total";

/// Counter: insert/update attempts rejected by the conflict check.
pub const CONFLICTS_TOTAL: &str = "roomtab_conflicts_total";

/// Histogram: full-table persist duration in seconds.
pub const PERSIST_DURATION_SECONDS: &str = "roomtab_persist_duration_seconds";

// ── USE metrics (resource/health) ───────────────────────────────

/// Counter: persisted rows excluded at load time for parse failures.
pub const LOAD_ROWS_REJECTED_TOTAL: &str = "roomtab_load_rows_rejected_total";

/// Counter: confirmation notifications that failed to deliver.
pub const NOTIFY_FAILURES_TOTAL: &str = "roomtab_notify_failures_total";

/// Install the default fmt subscriber. Idempotent; hosts that configure
/// their own subscriber skip this.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt().try_init();
}

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
