//! Shared cell styles for the output workbook.
//!
//! The two styles used across all sheets are built once per run and passed
//! by reference to every cell write. The xlsx engine deduplicates formats
//! at save time, so reusing these two handles keeps the workbook's distinct
//! style count constant no matter how many cells are written.

use rust_xlsxwriter::{Color, Format};

/// Solid fill behind every header cell.
const HEADER_FILL: Color = Color::RGB(0x0099_CCFF);

/// Solid fill behind every redacted cell.
const REDACTED_FILL: Color = Color::RGB(0x00C0_C0C0);

/// The two cell styles shared by every sheet in the workbook.
#[derive(Debug, Clone)]
pub struct SheetStyles {
    /// Bold on pale blue; applied to every header cell
    pub header: Format,
    /// Red text on grey; applied to every redacted cell
    pub redacted: Format,
}

impl SheetStyles {
    /// Builds the style handles for one export run.
    #[must_use]
    pub fn new() -> Self {
        let header = Format::new().set_bold().set_background_color(HEADER_FILL);

        let redacted = Format::new()
            .set_font_color(Color::Red)
            .set_background_color(REDACTED_FILL);

        Self { header, redacted }
    }
}

impl Default for SheetStyles {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_styles_apply_to_cells() {
        let styles = SheetStyles::new();
        let mut worksheet = rust_xlsxwriter::Worksheet::new();

        worksheet
            .write_with_format(0, 0, "id", &styles.header)
            .unwrap();
        worksheet
            .write_with_format(1, 0, "** Redacted **", &styles.redacted)
            .unwrap();
    }

    #[test]
    fn test_default_constructs() {
        let _ = SheetStyles::default();
    }
}
