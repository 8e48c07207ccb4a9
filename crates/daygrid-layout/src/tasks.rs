//! Task name rows and colored bars

use chrono::NaiveDate;
use daygrid_core::{
    Align, CellStyle, CellValue, CollisionPolicy, ColNum, DateField, DiagnosticCode,
    DiagnosticEmitter, Grid, MergeRange, RowNum, TaskError, TaskSpec, TimelineConfig, DATE_FORMAT,
    HEADER_ROWS,
};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::index::DateColumnIndex;

/// Column holding task names
pub const NAME_COL: ColNum = 0;

/// What happened to one task
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Name written and bar drawn over `first_col..=last_col`
    Placed {
        row: RowNum,
        first_col: ColNum,
        last_col: ColNum,
    },
    /// Name written, bar skipped
    NameOnly { row: RowNum, code: DiagnosticCode },
    /// Skipped because an earlier task (by index) holds the row
    Rejected { row: RowNum, holder: usize },
    /// Removed because a later task (by index) took over the row
    Replaced { row: RowNum, by: usize },
}

impl TaskOutcome {
    pub fn row(&self) -> RowNum {
        match self {
            TaskOutcome::Placed { row, .. }
            | TaskOutcome::NameOnly { row, .. }
            | TaskOutcome::Rejected { row, .. }
            | TaskOutcome::Replaced { row, .. } => *row,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, TaskOutcome::Placed { .. })
    }
}

/// Grid row of a task
pub fn task_row(task: &TaskSpec) -> RowNum {
    HEADER_ROWS + task.row_offset.saturating_sub(1)
}

/// Parse one end of a task's range
pub fn parse_task_date(value: &str, field: DateField) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|source| TaskError::DateParse {
        field,
        value: value.to_string(),
        source,
    })
}

/// Resolve a task's dates to an inclusive column range
pub fn resolve_columns(
    task: &TaskSpec,
    index: &DateColumnIndex,
) -> Result<(ColNum, ColNum), TaskError> {
    let start = parse_task_date(&task.start, DateField::Start)?;
    let end = parse_task_date(&task.end, DateField::End)?;

    let lookup = |date: NaiveDate, field: DateField| {
        index.get(date).ok_or_else(|| TaskError::OutOfRange {
            field,
            date,
            first: index.first_date().unwrap_or(date),
            last: index.last_date().unwrap_or(date),
        })
    };
    let first_col = lookup(start, DateField::Start)?;
    let last_col = lookup(end, DateField::End)?;

    if first_col > last_col {
        return Err(TaskError::InvertedRange { start, end });
    }
    Ok((first_col, last_col))
}

/// Fill `first_col..=last_col` on `row` with the task's bar
fn draw_bar(grid: &mut Grid, task: &TaskSpec, row: RowNum, first_col: ColNum, last_col: ColNum) {
    let style = CellStyle::new()
        .fill(task.color)
        .thin_border()
        .align(Align::Center);

    for col in first_col..=last_col {
        let cell = grid.cell_mut(row, col);
        cell.value = CellValue::Empty;
        cell.style = style;
        cell.filled = true;
    }
    if let Some(label) = &task.label {
        grid.cell_mut(row, first_col).value = CellValue::Text(label.clone());
    }
    if last_col > first_col {
        grid.merge(MergeRange::row(row, first_col, last_col));
    }
}

/// Write every task's name and, where its dates resolve, its bar
///
/// Each task looks its columns up in `index` on its own; the only state
/// shared between tasks is which task holds which row.
pub(crate) fn place_tasks(
    config: &TimelineConfig,
    index: &DateColumnIndex,
    grid: &mut Grid,
    emitter: &mut dyn DiagnosticEmitter,
) -> Vec<TaskOutcome> {
    let name_style = CellStyle::new().align(Align::Left).thin_border();
    let mut outcomes: Vec<TaskOutcome> = Vec::with_capacity(config.tasks.len());
    let mut row_holders: HashMap<RowNum, usize> = HashMap::new();

    for (i, task) in config.tasks.iter().enumerate() {
        let row = task_row(task);

        if let Some(&holder) = row_holders.get(&row) {
            let err = TaskError::RowCollision {
                row_offset: task.row_offset,
                holder: config.tasks[holder].name.clone(),
            };
            warn!(task = %task.name, row, "{}", err);
            emitter.emit(err.to_diagnostic(&task.name));

            match config.collision {
                CollisionPolicy::Reject => {
                    outcomes.push(TaskOutcome::Rejected { row, holder });
                    continue;
                }
                CollisionPolicy::Replace => {
                    grid.clear_row(row, NAME_COL);
                    outcomes[holder] = TaskOutcome::Replaced { row, by: i };
                }
            }
        }
        row_holders.insert(row, i);

        grid.put(row, NAME_COL, task.name.as_str(), name_style);

        let outcome = match resolve_columns(task, index) {
            Ok((first_col, last_col)) => {
                debug!(
                    task = %task.name,
                    row,
                    first_col,
                    last_col,
                    "placing bar"
                );
                draw_bar(grid, task, row, first_col, last_col);
                TaskOutcome::Placed {
                    row,
                    first_col,
                    last_col,
                }
            }
            Err(err) => {
                warn!(task = %task.name, "{}; skipping bar", err);
                emitter.emit(err.to_diagnostic(&task.name));
                TaskOutcome::NameOnly {
                    row,
                    code: err.code(),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use daygrid_core::{CollectingEmitter, Rgb};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn may_index() -> DateColumnIndex {
        let mut index = DateColumnIndex::default();
        for (i, day) in (1..=31).enumerate() {
            index.insert(date(2025, 5, day), 3 + i as ColNum);
        }
        index
    }

    #[test]
    fn task_row_is_below_headers() {
        assert_eq!(task_row(&TaskSpec::new("a", 1)), 3);
        assert_eq!(task_row(&TaskSpec::new("b", 7)), 9);
    }

    #[test]
    fn parse_accepts_iso_dates() {
        assert_eq!(
            parse_task_date("2025-05-01", DateField::Start).unwrap(),
            date(2025, 5, 1)
        );
        assert_eq!(
            parse_task_date(" 2025-05-01 ", DateField::Start).unwrap(),
            date(2025, 5, 1)
        );
    }

    #[test]
    fn parse_rejects_impossible_dates() {
        for bad in ["2025-13-40", "2025-02-30", "05/01/2025", "", "soon"] {
            let err = parse_task_date(bad, DateField::End).unwrap_err();
            assert!(
                matches!(err, TaskError::DateParse { field: DateField::End, .. }),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn resolve_inside_span() {
        let task = TaskSpec::new("a", 1).dates("2025-05-01", "2025-05-10");
        assert_eq!(resolve_columns(&task, &may_index()).unwrap(), (3, 12));
    }

    #[test]
    fn resolve_single_day() {
        let task = TaskSpec::new("a", 1).dates("2025-05-31", "2025-05-31");
        assert_eq!(resolve_columns(&task, &may_index()).unwrap(), (33, 33));
    }

    #[test]
    fn resolve_out_of_span() {
        let task = TaskSpec::new("a", 1).dates("2025-04-20", "2025-05-10");
        let err = resolve_columns(&task, &may_index()).unwrap_err();
        assert!(matches!(
            err,
            TaskError::OutOfRange { field: DateField::Start, .. }
        ));

        let task = TaskSpec::new("a", 1).dates("2025-05-20", "2025-06-02");
        let err = resolve_columns(&task, &may_index()).unwrap_err();
        assert!(matches!(err, TaskError::OutOfRange { field: DateField::End, .. }));
    }

    #[test]
    fn resolve_inverted() {
        let task = TaskSpec::new("a", 1).dates("2025-05-10", "2025-05-01");
        let err = resolve_columns(&task, &may_index()).unwrap_err();
        assert!(matches!(err, TaskError::InvertedRange { .. }));
    }

    #[test]
    fn single_day_bar_has_no_merge() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks.push(
            TaskSpec::new("Milestone", 1)
                .dates("2025-05-15", "2025-05-15")
                .color(Rgb::from_u32(0xFF0000))
                .label("!"),
        );
        let mut grid = Grid::new("t");
        let mut emitter = CollectingEmitter::default();
        let outcomes = place_tasks(&config, &may_index(), &mut grid, &mut emitter);

        assert_eq!(
            outcomes,
            vec![TaskOutcome::Placed {
                row: 3,
                first_col: 17,
                last_col: 17
            }]
        );
        assert!(grid.merges().is_empty());
        let cell = grid.cell(3, 17).unwrap();
        assert!(cell.filled);
        assert_eq!(cell.value.as_text(), Some("!"));
        assert!(emitter.diagnostics.is_empty());
    }

    #[test]
    fn collision_reject_keeps_first() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks = vec![
            TaskSpec::new("First", 2).dates("2025-05-01", "2025-05-05"),
            TaskSpec::new("Second", 2).dates("2025-05-10", "2025-05-12"),
        ];
        let mut grid = Grid::new("t");
        let mut emitter = CollectingEmitter::default();
        let outcomes = place_tasks(&config, &may_index(), &mut grid, &mut emitter);

        assert!(outcomes[0].is_placed());
        assert_eq!(outcomes[1], TaskOutcome::Rejected { row: 4, holder: 0 });
        assert_eq!(grid.cell(4, NAME_COL).unwrap().value.as_text(), Some("First"));
        assert!(grid.cell(4, 12).is_none());
        assert_eq!(emitter.diagnostics.len(), 1);
        assert_eq!(emitter.diagnostics[0].code, DiagnosticCode::W004RowCollision);
    }

    #[test]
    fn collision_replace_keeps_last() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.collision = CollisionPolicy::Replace;
        config.tasks = vec![
            TaskSpec::new("First", 2).dates("2025-05-01", "2025-05-05"),
            TaskSpec::new("Second", 2).dates("2025-05-10", "2025-05-12"),
        ];
        let mut grid = Grid::new("t");
        let mut emitter = CollectingEmitter::default();
        let outcomes = place_tasks(&config, &may_index(), &mut grid, &mut emitter);

        assert_eq!(outcomes[0], TaskOutcome::Replaced { row: 4, by: 1 });
        assert!(outcomes[1].is_placed());
        assert_eq!(grid.cell(4, NAME_COL).unwrap().value.as_text(), Some("Second"));
        // First task's bar (cols 3..=7) is gone
        assert!(grid.cell(4, 3).is_none());
        assert!(grid.cell(4, 12).unwrap().filled);
        assert_eq!(grid.merges(), &[MergeRange::row(4, 12, 14)]);
    }
}
