//! Grid lines, column widths and panes

use daygrid_core::{Border, DayKind, Grid, GridBounds, RowNum, TimelineConfig, HEADER_ROWS};
use tracing::debug;

use crate::header::weekend_fill;
use crate::index::DateColumnIndex;

/// Last task row: the larger of the task count and the deepest row offset
pub(crate) fn last_task_row(config: &TimelineConfig) -> RowNum {
    let deepest = config.tasks.iter().map(|t| t.row_offset).max().unwrap_or(0);
    let rows = deepest.max(config.tasks.len() as u32);
    HEADER_ROWS + rows - 1
}

/// Border the task area, size columns and freeze the headers
///
/// Cells flagged as part of a bar keep their style; every other cell in
/// the task rows gets a thin border.
pub(crate) fn finish_grid(config: &TimelineConfig, index: &DateColumnIndex, grid: &mut Grid) {
    let metadata_cols = config.task_col_count;
    let last_col = index.last_col().unwrap_or(metadata_cols);
    let bounds = GridBounds {
        header_rows: HEADER_ROWS,
        metadata_cols,
        last_row: last_task_row(config),
        last_col,
    };
    debug!(?bounds, "applying grid borders");

    for row in bounds.task_rows() {
        for col in 0..metadata_cols {
            grid.cell_mut(row, col).style.border = Border::Thin;
        }
        for col in bounds.date_cols() {
            let shade = if config.layout.shade_weekend_rows {
                index.date_at(col).and_then(|d| weekend_fill(DayKind::of(d)))
            } else {
                None
            };
            let cell = grid.cell_mut(row, col);
            if cell.filled {
                continue;
            }
            cell.style.border = Border::Thin;
            if shade.is_some() {
                cell.style.fill = shade;
            }
        }
    }

    for col in 0..metadata_cols {
        grid.set_column_width(col, config.layout.metadata_width(col));
    }
    for col in bounds.date_cols() {
        grid.set_column_width(col, config.layout.day_width);
    }

    if config.layout.freeze_panes {
        grid.set_freeze(HEADER_ROWS, metadata_cols);
    }
    grid.bounds = bounds;
}

#[cfg(test)]
mod tests {
    use super::*;
    use daygrid_core::TaskSpec;

    #[test]
    fn last_row_uses_deepest_offset() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks = vec![TaskSpec::new("a", 1), TaskSpec::new("b", 9)];
        assert_eq!(last_task_row(&config), 11);
    }

    #[test]
    fn last_row_uses_task_count() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks = vec![
            TaskSpec::new("a", 1),
            TaskSpec::new("b", 1),
            TaskSpec::new("c", 1),
        ];
        assert_eq!(last_task_row(&config), 5);
    }

    #[test]
    fn no_tasks_means_no_task_rows() {
        let config = TimelineConfig::new(2025, 5, 1);
        assert_eq!(last_task_row(&config), HEADER_ROWS - 1);
    }
}
