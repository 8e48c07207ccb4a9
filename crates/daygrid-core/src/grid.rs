//! Styled cell grid
//!
//! The [`Grid`] is the in-memory sheet the layout pipeline writes into and
//! the renderers read from. Coordinates are 0-based `(row, col)` pairs, the
//! same addressing `rust_xlsxwriter` uses.

use std::collections::BTreeMap;

use crate::Rgb;

/// Row index (0-based)
pub type RowNum = u32;

/// Column index (0-based)
pub type ColNum = u16;

/// Highest column index an xlsx sheet accepts (XFD)
pub const MAX_COL: ColNum = 16_383;

/// Highest row index an xlsx sheet accepts
pub const MAX_ROW: RowNum = 1_048_575;

/// Cell content
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

/// Border style applied to all four sides of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Border {
    #[default]
    None,
    Thin,
}

/// Horizontal alignment (vertical is always centered when not `General`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    General,
    Left,
    Center,
}

/// Visual style of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub fill: Option<Rgb>,
    pub border: Border,
    pub align: Align,
    pub bold: bool,
}

impl CellStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, color: Rgb) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn thin_border(mut self) -> Self {
        self.border = Border::Thin;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One grid cell
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
    /// Set when the cell belongs to a task bar
    pub filled: bool,
}

/// Rectangular merged range, inclusive on both ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MergeRange {
    pub first_row: RowNum,
    pub first_col: ColNum,
    pub last_row: RowNum,
    pub last_col: ColNum,
}

impl MergeRange {
    /// Single-row range
    pub fn row(row: RowNum, first_col: ColNum, last_col: ColNum) -> Self {
        Self {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
        }
    }

    pub fn contains(&self, row: RowNum, col: ColNum) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn is_anchor(&self, row: RowNum, col: ColNum) -> bool {
        row == self.first_row && col == self.first_col
    }

    /// Number of cells covered
    pub fn width(&self) -> u32 {
        (self.last_col - self.first_col) as u32 + 1
    }
}

/// Layout bounds recorded by the builder
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridBounds {
    /// Number of leading header rows
    pub header_rows: RowNum,
    /// Number of leading metadata columns
    pub metadata_cols: ColNum,
    /// Last task row (inclusive); equals `header_rows - 1` when there are no task rows
    pub last_row: RowNum,
    /// Last date column (inclusive)
    pub last_col: ColNum,
}

impl GridBounds {
    /// Rows holding tasks
    pub fn task_rows(&self) -> std::ops::RangeInclusive<RowNum> {
        self.header_rows..=self.last_row
    }

    /// Columns mapped to calendar days
    pub fn date_cols(&self) -> std::ops::RangeInclusive<ColNum> {
        self.metadata_cols..=self.last_col
    }
}

/// A single sheet of styled cells
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    pub sheet_name: String,
    pub bounds: GridBounds,
    cells: BTreeMap<(RowNum, ColNum), Cell>,
    merges: Vec<MergeRange>,
    column_widths: BTreeMap<ColNum, f64>,
    freeze: Option<(RowNum, ColNum)>,
}

impl Grid {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    /// Read a cell
    pub fn cell(&self, row: RowNum, col: ColNum) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get a cell for writing, creating it if absent
    pub fn cell_mut(&mut self, row: RowNum, col: ColNum) -> &mut Cell {
        self.cells.entry((row, col)).or_default()
    }

    /// Write a value and style in one go
    pub fn put(&mut self, row: RowNum, col: ColNum, value: impl Into<CellValue>, style: CellStyle) {
        let cell = self.cell_mut(row, col);
        cell.value = value.into();
        cell.style = style;
    }

    /// All populated cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = ((RowNum, ColNum), &Cell)> {
        self.cells.iter().map(|(k, v)| (*k, v))
    }

    /// Cells of one row in column order
    pub fn row_cells(&self, row: RowNum) -> impl Iterator<Item = (ColNum, &Cell)> {
        self.cells
            .range((row, 0)..=(row, ColNum::MAX))
            .map(|(&(_, c), cell)| (c, cell))
    }

    /// Register a merged range; merges are kept sorted by position
    pub fn merge(&mut self, range: MergeRange) {
        if let Err(pos) = self.merges.binary_search(&range) {
            self.merges.insert(pos, range);
        }
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    /// Merge covering a cell, if any
    pub fn merge_at(&self, row: RowNum, col: ColNum) -> Option<&MergeRange> {
        self.merges.iter().find(|m| m.contains(row, col))
    }

    /// Remove every cell and merge on `row` from column `from` onward
    pub fn clear_row(&mut self, row: RowNum, from: ColNum) {
        self.cells.retain(|&(r, c), _| r != row || c < from);
        self.merges
            .retain(|m| !(m.first_row <= row && row <= m.last_row && m.last_col >= from));
    }

    pub fn set_column_width(&mut self, col: ColNum, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: ColNum) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    pub fn column_widths(&self) -> impl Iterator<Item = (ColNum, f64)> + '_ {
        self.column_widths.iter().map(|(c, w)| (*c, *w))
    }

    /// Freeze panes above `row` and left of `col`
    pub fn set_freeze(&mut self, row: RowNum, col: ColNum) {
        self.freeze = Some((row, col));
    }

    pub fn freeze(&self) -> Option<(RowNum, ColNum)> {
        self.freeze
    }

    /// Number of populated cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
