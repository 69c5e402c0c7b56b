//! Workbook writer: orchestrates the whole export and produces the file.
//!
//! The workbook is assembled entirely in memory and serialized only after
//! every table has been exported, so a failed run never leaves a
//! half-written output file behind.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_xlsxwriter::Workbook;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ExportSpec;
use crate::error::{ExportError, Result, redact_database_url};
use crate::export::export_table;
use crate::progress::ProgressSink;
use crate::styles::SheetStyles;

/// Fixed extension of the output workbook file.
pub const OUTPUT_EXTENSION: &str = "xlsx";

/// Summary of a completed export run.
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Path the workbook was written to
    pub output_path: PathBuf,
    /// Per-table results, in configuration order
    pub tables: Vec<TableReport>,
}

/// Row count for one exported table.
#[derive(Debug, Clone)]
pub struct TableReport {
    /// Table (and sheet) name
    pub name: String,
    /// Data rows written, excluding the header row
    pub rows: u64,
}

impl ExportReport {
    /// Total data rows written across all sheets.
    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

/// Computes the output path as `{output_dir}/{name}.xlsx`.
#[must_use]
pub fn output_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}.{OUTPUT_EXTENSION}"))
}

/// Runs the whole export: connect, export every table, serialize the file.
///
/// Tables are exported sequentially in configuration order; the first
/// failure aborts the run before anything is written to disk. The database
/// connection is released on every exit path.
///
/// # Errors
/// Returns `ExportError::Connection` if the database is unreachable,
/// `ExportError::Query`/`ExportError::Workbook` from the per-table export,
/// and `ExportError::Write` if the final serialization fails.
pub async fn run_export(
    spec: &ExportSpec,
    output_dir: &Path,
    progress: &dyn ProgressSink,
) -> Result<ExportReport> {
    validate_connection_string(&spec.jdbc_url)?;

    tracing::info!("Connecting to {}", redact_database_url(&spec.jdbc_url));
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&spec.jdbc_url)
        .await
        .map_err(|e| ExportError::connection_failed(redact_database_url(&spec.jdbc_url), e))?;

    let result = export_all(&pool, spec, progress).await;
    pool.close().await;
    let (mut workbook, tables) = result?;

    let path = output_path(output_dir, &spec.name);
    tracing::info!("Writing {}", path.display());
    workbook
        .save(&path)
        .map_err(|e| ExportError::write_failed(path.clone(), e))?;

    Ok(ExportReport {
        output_path: path,
        tables,
    })
}

/// Exports every configured table into a fresh in-memory workbook.
async fn export_all(
    pool: &PgPool,
    spec: &ExportSpec,
    progress: &dyn ProgressSink,
) -> Result<(Workbook, Vec<TableReport>)> {
    let mut workbook = Workbook::new();
    let styles = SheetStyles::new();

    let mut tables = Vec::with_capacity(spec.tables.len());
    for table in &spec.tables {
        let rows = export_table(pool, table, &mut workbook, &styles, progress).await?;
        tables.push(TableReport {
            name: table.name.clone(),
            rows,
        });
    }

    Ok((workbook, tables))
}

/// Validates the connection string's shape and scheme before connecting.
fn validate_connection_string(connection_string: &str) -> Result<()> {
    let url = url::Url::parse(connection_string)
        .map_err(|e| ExportError::connection_failed("invalid connection string format", e))?;

    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(ExportError::config(
            "connection string must use postgres:// or postgresql:// scheme",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let path = output_path(Path::new("/tmp/out"), "demo");
        assert_eq!(path, PathBuf::from("/tmp/out/demo.xlsx"));
    }

    #[test]
    fn test_validate_connection_string_schemes() {
        assert!(validate_connection_string("postgres://localhost/db").is_ok());
        assert!(validate_connection_string("postgresql://user@localhost:5432/db").is_ok());
        assert!(validate_connection_string("mysql://localhost/db").is_err());
        assert!(validate_connection_string("not a url").is_err());
    }

    #[test]
    fn test_empty_workbook_still_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(dir.path(), "empty");

        let mut workbook = Workbook::new();
        workbook.save(&path).unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_database_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = ExportSpec {
            name: "demo".to_string(),
            // Port 1 is never a live postgres; connect fails eagerly.
            jdbc_url: "postgres://localhost:1/db".to_string(),
            tables: vec![],
        };

        let result = run_export(&spec, dir.path(), &crate::progress::NullProgress).await;

        assert!(matches!(result, Err(ExportError::Connection { .. })));
        assert!(!output_path(dir.path(), "demo").exists());
    }

    #[test]
    fn test_report_total_rows() {
        let report = ExportReport {
            output_path: PathBuf::from("demo.xlsx"),
            tables: vec![
                TableReport {
                    name: "users".to_string(),
                    rows: 2,
                },
                TableReport {
                    name: "orders".to_string(),
                    rows: 3,
                },
            ],
        };

        assert_eq!(report.total_rows(), 5);
    }
}
