//! Terminal preview of a timeline grid
//!
//! One character per day column. Header rows show merged labels laid across
//! their range, single digits for day numbers and the first character of
//! other labels. Task rows show the name column followed by the bar.

use daygrid_core::{CellValue, ColNum, Grid, RenderError, Renderer, RowNum};
use std::collections::BTreeSet;

/// Plain text renderer for console output
#[derive(Clone, Debug)]
pub struct TextRenderer {
    /// Width of the name column in characters
    pub name_width: usize,
    /// Show at most this many day columns
    pub max_days: Option<usize>,
    pub bar_char: char,
    /// Character for empty weekend cells
    pub weekend_char: char,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            name_width: 24,
            max_days: None,
            bar_char: '█',
            weekend_char: '·',
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_width(mut self, width: usize) -> Self {
        self.name_width = width;
        self
    }

    pub fn max_days(mut self, days: usize) -> Self {
        self.max_days = Some(days);
        self
    }

    fn visible_cols(&self, grid: &Grid) -> Vec<ColNum> {
        let cols = grid.bounds.date_cols();
        match self.max_days {
            Some(n) => cols.take(n).collect(),
            None => cols.collect(),
        }
    }

    fn header_line(&self, grid: &Grid, row: RowNum, cols: &[ColNum]) -> String {
        let mut line: Vec<char> = vec![' '; cols.len()];
        for (i, &col) in cols.iter().enumerate() {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            match (&cell.value, grid.merge_at(row, col)) {
                (CellValue::Text(label), Some(merge)) if merge.is_anchor(row, col) => {
                    let room = (merge.width() as usize).min(cols.len() - i);
                    for (j, ch) in label.chars().take(room).enumerate() {
                        line[i + j] = ch;
                    }
                }
                (CellValue::Text(label), None) => {
                    if let Some(ch) = label.chars().next() {
                        line[i] = ch;
                    }
                }
                (CellValue::Number(n), _) => {
                    let digit = (*n as i64).rem_euclid(10) as u32;
                    line[i] = char::from_digit(digit, 10).unwrap_or('?');
                }
                _ => {}
            }
        }
        line.into_iter().collect()
    }

    fn task_line(&self, grid: &Grid, row: RowNum, cols: &[ColNum]) -> String {
        let bar: BTreeSet<ColNum> = grid
            .row_cells(row)
            .filter(|(_, cell)| cell.filled)
            .map(|(col, _)| col)
            .collect();
        cols.iter()
            .map(|col| {
                if bar.contains(col) {
                    self.bar_char
                } else if is_weekend_col(grid, *col) {
                    self.weekend_char
                } else {
                    ' '
                }
            })
            .collect()
    }

    fn name_cell(&self, grid: &Grid, row: RowNum) -> String {
        let name = grid
            .cell(row, 0)
            .and_then(|c| c.value.as_text())
            .unwrap_or("");
        let name = truncate(name, self.name_width);
        format!("{:<width$}", name, width = self.name_width)
    }
}

/// Weekend columns carry a fill on their day-number header
fn is_weekend_col(grid: &Grid, col: ColNum) -> bool {
    let day_row = grid.bounds.header_rows.saturating_sub(2);
    grid.cell(day_row, col)
        .is_some_and(|c| c.style.fill.is_some())
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, grid: &Grid) -> Result<String, RenderError> {
        if grid.is_empty() {
            return Err(RenderError::InvalidData("No cells to render".into()));
        }

        let cols = self.visible_cols(grid);
        let blank = " ".repeat(self.name_width);
        let mut out = String::new();

        for row in 0..grid.bounds.header_rows {
            let line = self.header_line(grid, row, &cols);
            out.push_str(&format!("{blank} |{}\n", line.trim_end()));
        }
        for row in grid.bounds.task_rows() {
            let line = self.task_line(grid, row, &cols);
            out.push_str(&format!("{} |{}\n", self.name_cell(grid, row), line));
        }

        Ok(out)
    }
}
