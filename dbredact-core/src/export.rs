//! Table exporter: materializes one database table as one spreadsheet sheet.
//!
//! Row 0 of a sheet is the styled header row; every subsequent row is one
//! result row at its 1-based result ordinal. Columns named in the table's
//! redact set get the literal [`REDACTED_MARKER`] instead of their value and
//! are styled distinctly. Any query failure fails the whole run; nothing is
//! retried or skipped.

use futures::TryStreamExt;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::config::TableSpec;
use crate::error::{ExportError, Result};
use crate::progress::{PROGRESS_INTERVAL, ProgressSink};
use crate::styles::SheetStyles;

/// Literal text written into every redacted cell.
pub const REDACTED_MARKER: &str = "** Redacted **";

/// Exports one table into a new sheet of `workbook`.
///
/// Returns the number of data rows written.
///
/// # Errors
/// Returns `ExportError::Query` if the table cannot be queried (missing
/// table, lost connection, mid-stream read failure) and
/// `ExportError::Workbook` if the engine rejects the sheet or a cell write.
pub async fn export_table(
    pool: &PgPool,
    table: &TableSpec,
    workbook: &mut Workbook,
    styles: &SheetStyles,
    progress: &dyn ProgressSink,
) -> Result<u64> {
    progress.table_started(&table.name);

    let columns = fetch_columns(pool, &table.name).await?;

    let worksheet = workbook
        .add_worksheet()
        .set_name(&table.name)
        .map_err(|e| ExportError::workbook_failed(format!("creating sheet '{}'", table.name), e))?;

    write_header_row(worksheet, &columns, styles)?;

    // row_to_json gives every column pre-coerced to its driver-native JSON
    // form, so no per-type decoding is needed here.
    let query = table_query(&table.name);
    tracing::debug!("Querying table '{}': {}", table.name, query);

    let mut rows = sqlx::query_scalar::<_, JsonValue>(&query).fetch(pool);

    // The exporter owns the row counter: header is row 0 and data rows are
    // the 1-based result ordinals, independent of driver row numbering.
    let mut row_index: u32 = 0;
    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| ExportError::query_failed(&table.name, "reading result rows", e))?
    {
        row_index = row_index.saturating_add(1);
        write_value_row(worksheet, row_index, &columns, &row, table, styles)?;

        if u64::from(row_index) % PROGRESS_INTERVAL == 0 {
            progress.rows_written(&table.name, u64::from(row_index));
        }
    }

    progress.table_finished(&table.name, u64::from(row_index));
    Ok(u64::from(row_index))
}

/// Resolves the ordered column list for a table.
///
/// An empty result means the table is not visible to this connection, which
/// fails the run before its sheet is created.
async fn fetch_columns(pool: &PgPool, table: &str) -> Result<Vec<String>> {
    let (schema, name) = split_table_name(table);

    let columns = sqlx::query_scalar::<_, String>(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_schema = $1 AND table_name = $2 \
         ORDER BY ordinal_position",
    )
    .bind(schema)
    .bind(name)
    .fetch_all(pool)
    .await
    .map_err(|e| ExportError::query_failed(table, "listing columns", e))?;

    if columns.is_empty() {
        return Err(ExportError::query_rejected(
            table,
            "table does not exist or has no visible columns",
        ));
    }

    Ok(columns)
}

/// Splits an optionally schema-qualified table name into (schema, table).
fn split_table_name(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((schema, table)) => (schema, table),
        None => ("public", name),
    }
}

/// Builds the data query for a table.
///
/// Schema and table are quoted so the query resolves exactly the relation
/// the column lookup bound, mixed-case names included. The name itself
/// comes from the specification verbatim (trusted input).
fn table_query(table: &str) -> String {
    let (schema, name) = split_table_name(table);
    format!(r#"SELECT row_to_json(t.*) FROM "{schema}"."{name}" t"#)
}

fn write_header_row(
    worksheet: &mut Worksheet,
    columns: &[String],
    styles: &SheetStyles,
) -> Result<()> {
    for (index, name) in columns.iter().enumerate() {
        worksheet
            .write_with_format(0, column_index(index)?, name.as_str(), &styles.header)
            .map_err(|e| ExportError::workbook_failed(format!("writing header cell '{name}'"), e))?;
    }
    Ok(())
}

fn write_value_row(
    worksheet: &mut Worksheet,
    row: u32,
    columns: &[String],
    values: &JsonValue,
    table: &TableSpec,
    styles: &SheetStyles,
) -> Result<()> {
    for (index, column) in columns.iter().enumerate() {
        let col = column_index(index)?;

        if table.is_redacted(column) {
            // The underlying value is never read for redacted columns.
            worksheet
                .write_with_format(row, col, REDACTED_MARKER, &styles.redacted)
                .map_err(|e| {
                    ExportError::workbook_failed(format!("writing redacted cell '{column}'"), e)
                })?;
        } else {
            worksheet
                .write(row, col, render_cell(values.get(column)))
                .map_err(|e| ExportError::workbook_failed(format!("writing cell '{column}'"), e))?;
        }
    }
    Ok(())
}

/// Renders one column value as cell text.
///
/// SQL NULL becomes an empty cell; strings are written as-is; every other
/// value keeps its driver-native JSON rendering.
fn render_cell(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn column_index(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| {
        ExportError::workbook_failed(
            format!("column index {index} exceeds sheet limits"),
            XlsxError::RowColumnLimitError,
        )
    })
}
