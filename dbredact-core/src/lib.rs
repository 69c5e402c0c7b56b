//! Core export pipeline for dbredact.
//!
//! dbredact exports relational database tables to one `.xlsx` workbook,
//! one sheet per table, with a styled header row and configured columns
//! redacted. The whole system is a single linear pipeline:
//!
//! 1. [`config`] parses the JSON export specification.
//! 2. [`workbook`] opens the database connection and an in-memory workbook.
//! 3. [`export`] streams each table's rows into its own sheet, applying the
//!    shared [`styles`] and signalling [`progress`].
//! 4. The workbook is serialized to `{output_dir}/{name}.xlsx` only after
//!    every table has succeeded.
//!
//! Every failure is fatal and identified by its stage in [`error`]; there
//! are no retries and no partial output files.

pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod progress;
pub mod styles;
pub mod workbook;

// Re-export commonly used types
pub use config::{ExportSpec, TableSpec};
pub use error::{ExportError, Result, redact_database_url};
pub use export::REDACTED_MARKER;
pub use logging::init_logging;
pub use progress::{NullProgress, ProgressSink, TraceProgress};
pub use styles::SheetStyles;
pub use workbook::{ExportReport, TableReport, run_export};
