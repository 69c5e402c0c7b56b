//! Progress reporting for long table exports.
//!
//! Progress is observability, not correctness: the exporter ticks a sink
//! every [`PROGRESS_INTERVAL`] rows and at table boundaries, and a harness
//! may plug in [`NullProgress`] to silence it entirely.

/// Rows written between `rows_written` ticks.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Sink for table-export progress events.
pub trait ProgressSink {
    /// Called when a table's export begins.
    fn table_started(&self, table: &str);

    /// Called every [`PROGRESS_INTERVAL`] data rows.
    fn rows_written(&self, table: &str, rows: u64);

    /// Called once the table's sheet is fully populated.
    fn table_finished(&self, table: &str, rows: u64);
}

/// Progress sink that reports through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceProgress;

impl ProgressSink for TraceProgress {
    fn table_started(&self, table: &str) {
        tracing::info!("Exporting table '{}'", table);
    }

    fn rows_written(&self, table: &str, rows: u64) {
        tracing::debug!("Table '{}': {} rows written", table, rows);
    }

    fn table_finished(&self, table: &str, rows: u64) {
        tracing::info!("Table '{}' exported ({} rows)", table, rows);
    }
}

/// No-op progress sink for test harnesses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn table_started(&self, _table: &str) {}

    fn rows_written(&self, _table: &str, _rows: u64) {}

    fn table_finished(&self, _table: &str, _rows: u64) {}
}
