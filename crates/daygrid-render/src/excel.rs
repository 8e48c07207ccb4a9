//! Excel timeline renderer
//!
//! Writes a finished [`Grid`] as a single-sheet XLSX workbook:
//! - merged month headers with day-number and weekday rows below
//! - one row per task with its name and a merged, colored bar
//! - thin borders across the populated grid, shaded weekend headers
//!
//! ## Example Output Structure
//!
//! ```text
//! |                |  |  | 2025 / 5月                  | 2025 / 6月 ...
//! |                |  |  | 1  | 2  | 3  | 4  | 5  | ... | 1  | 2  | ...
//! |                |  |  | 木 | 金 | 土 | 日 | 月 | ... | 日 | 月 | ...
//! | Design Review  |  |  | ██████████████████████ |    |    |    | ...
//! ```
//!
//! Cell styles are translated to `rust_xlsxwriter` formats once per distinct
//! style; merged ranges take the anchor cell's value and format.

use daygrid_core::{
    Align, Border, CellStyle, CellValue, ColNum, Grid, RenderError, Renderer, RowNum,
};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use std::path::Path;

use crate::write_output;

/// Excel timeline renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Font applied to every cell (workbook default when `None`)
    pub font_name: Option<String>,
    /// Font size in points (workbook default when `None`)
    pub font_size: Option<f64>,
    /// Show the sheet's own gridlines behind the drawn borders
    pub show_gridlines: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            font_name: None,
            font_size: None,
            show_gridlines: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font family, e.g. "Meiryo" for Japanese labels
    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set the font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Hide the sheet gridlines so only drawn borders show
    pub fn hide_gridlines(mut self) -> Self {
        self.show_gridlines = false;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, grid: &Grid) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&grid.sheet_name).map_err(xlsx_error)?;

        self.write_sheet(sheet, grid)?;

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Render and write the workbook to `path`
    ///
    /// A target that is open in another program surfaces as
    /// [`RenderError::Locked`].
    pub fn save(&self, grid: &Grid, path: &Path) -> Result<(), RenderError> {
        let bytes = self.render(grid)?;
        write_output(path, &bytes)
    }

    fn write_sheet(&self, sheet: &mut Worksheet, grid: &Grid) -> Result<(), RenderError> {
        let mut formats = FormatCache::new(self);

        // Plain cells first; merged ranges are written from their anchor below
        for ((row, col), cell) in grid.cells() {
            if grid.merge_at(row, col).is_some() {
                continue;
            }
            let format = formats.get(cell.style);
            write_value(sheet, row, col, &cell.value, format)?;
        }

        for merge in grid.merges() {
            let (value, style) = grid
                .cell(merge.first_row, merge.first_col)
                .map(|c| (c.value.clone(), c.style))
                .unwrap_or_default();
            let format = formats.get(style);

            if merge.first_row == merge.last_row && merge.first_col == merge.last_col {
                write_value(sheet, merge.first_row, merge.first_col, &value, format)?;
                continue;
            }

            let text = value.as_text().unwrap_or("");
            sheet
                .merge_range(
                    merge.first_row,
                    merge.first_col,
                    merge.last_row,
                    merge.last_col,
                    text,
                    format,
                )
                .map_err(xlsx_error)?;
            if let CellValue::Number(n) = value {
                sheet
                    .write_number_with_format(merge.first_row, merge.first_col, n, format)
                    .map_err(xlsx_error)?;
            }
        }

        for (col, width) in grid.column_widths() {
            sheet.set_column_width(col, width).ok();
        }

        if let Some((row, col)) = grid.freeze() {
            sheet.set_freeze_panes(row, col).map_err(xlsx_error)?;
        }

        if !self.show_gridlines {
            sheet.set_screen_gridlines(false);
        }

        Ok(())
    }
}

/// Formats keyed by cell style, built on first use
struct FormatCache<'a> {
    renderer: &'a ExcelRenderer,
    formats: HashMap<CellStyle, Format>,
}

impl<'a> FormatCache<'a> {
    fn new(renderer: &'a ExcelRenderer) -> Self {
        Self {
            renderer,
            formats: HashMap::new(),
        }
    }

    fn get(&mut self, style: CellStyle) -> &Format {
        let renderer = self.renderer;
        self.formats
            .entry(style)
            .or_insert_with(|| create_format(renderer, style))
    }
}

/// Translate a cell style into an xlsx format
fn create_format(renderer: &ExcelRenderer, style: CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(fill) = style.fill {
        format = format.set_background_color(Color::RGB(fill.to_u32()));
    }
    if style.border == Border::Thin {
        format = format.set_border(FormatBorder::Thin);
    }
    match style.align {
        Align::General => {}
        Align::Left => {
            format = format
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter);
        }
        Align::Center => {
            format = format
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter);
        }
    }
    if style.bold {
        format = format.set_bold();
    }
    if let Some(name) = &renderer.font_name {
        format = format.set_font_name(name);
    }
    if let Some(size) = renderer.font_size {
        format = format.set_font_size(size);
    }

    format
}

fn write_value(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    value: &CellValue,
    format: &Format,
) -> Result<(), RenderError> {
    match value {
        CellValue::Empty => sheet.write_blank(row, col, format),
        CellValue::Text(s) => sheet.write_string_with_format(row, col, s, format),
        CellValue::Number(n) => sheet.write_number_with_format(row, col, *n, format),
    }
    .map_err(xlsx_error)?;
    Ok(())
}

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

/// Renderer implementation producing workbook bytes
impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, grid: &Grid) -> Result<Vec<u8>, RenderError> {
        if grid.is_empty() {
            return Err(RenderError::InvalidData("No cells to render".into()));
        }
        self.render_to_bytes(grid)
    }
}
