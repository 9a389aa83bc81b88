use std::net::SocketAddr;

// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: successful Book operations.
pub const BOOKINGS_TOTAL: &str = "cabana_bookings_total";

/// Counter: successful Release operations.
pub const RELEASES_TOTAL: &str = "cabana_releases_total";

/// Counter: Book attempts rejected because the slot was full.
pub const BOOKING_CONFLICTS_TOTAL: &str = "cabana_booking_conflicts_total";

// ── Bootstrap metrics ───────────────────────────────────────────

/// Counter: catalog items written by inventory seeding.
pub const ITEMS_SEEDED_TOTAL: &str = "cabana_items_seeded_total";

/// Counter: slots created by availability generation.
pub const SLOTS_GENERATED_TOTAL: &str = "cabana_slots_generated_total";

// ── Storage metrics ─────────────────────────────────────────────

/// Histogram: WAL group-commit flush duration in seconds.
pub const WAL_FLUSH_DURATION_SECONDS: &str = "cabana_wal_flush_duration_seconds";

/// Histogram: WAL group-commit batch size (events per flush).
pub const WAL_FLUSH_BATCH_SIZE: &str = "cabana_wal_flush_batch_size";

/// Counter: WAL appends that failed and were retried.
pub const WAL_RETRIES_TOTAL: &str = "cabana_wal_retries_total";

/// Install the Prometheus metrics exporter on the given port. No-op if `port`
/// is None.
pub fn init(port: Option<u16>) {
    let Some(port) = port else { return };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .expect("failed to install Prometheus metrics exporter");
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
}
