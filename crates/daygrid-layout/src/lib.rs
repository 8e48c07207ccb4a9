//! # daygrid-layout
//!
//! Builds the timeline grid from a [`TimelineConfig`].
//!
//! The pipeline runs once, front to back:
//!
//! 1. **Headers**: month labels, day numbers and weekday abbreviations. This
//!    step returns the [`DateColumnIndex`].
//! 2. **Tasks**: one name row per task and, where the dates resolve through
//!    the index, a colored bar.
//! 3. **Finish**: grid borders on cells outside bars, column widths, panes.
//!
//! Problems with individual tasks are reported as diagnostics and never stop
//! the build; only an invalid configuration does.
//!
//! ## Example
//!
//! ```rust
//! use daygrid_core::{TaskSpec, TimelineConfig};
//! use daygrid_layout::build_timeline;
//!
//! let mut config = TimelineConfig::new(2025, 5, 2);
//! config.tasks.push(TaskSpec::new("Design", 1).dates("2025-05-01", "2025-05-10"));
//!
//! let timeline = build_timeline(&config).unwrap();
//! assert_eq!(timeline.placed_count(), 1);
//! ```

pub mod finish;
pub mod header;
pub mod index;
pub mod tasks;

pub use header::{weekend_fill, DAY_ROW, MONTH_ROW, SATURDAY_FILL, SUNDAY_FILL, WEEKDAY_ROW};
pub use index::DateColumnIndex;
pub use tasks::{parse_task_date, resolve_columns, task_row, TaskOutcome, NAME_COL};

use daygrid_core::{
    CollectingEmitter, ConfigError, Diagnostic, DiagnosticCode, Grid, TimelineConfig,
};
use tracing::info;

/// Result of a build
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    pub grid: Grid,
    pub index: DateColumnIndex,
    /// One entry per configured task, in declaration order
    pub outcomes: Vec<TaskOutcome>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Timeline {
    /// Number of tasks whose bar was drawn
    pub fn placed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_placed()).count()
    }

    /// Diagnostics at warning severity
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Run the full layout pipeline
pub fn build_timeline(config: &TimelineConfig) -> Result<Timeline, ConfigError> {
    config.validate()?;

    let mut grid = Grid::new(config.sheet_name.clone());
    let mut emitter = CollectingEmitter::default();

    info!(
        start_year = config.start_year,
        start_month = config.start_month,
        num_months = config.num_months,
        "generating headers"
    );
    let index = header::build_headers(config, &mut grid);
    info!(days = index.len(), "date to column mapping complete");

    info!(tasks = config.tasks.len(), "adding tasks");
    let outcomes = tasks::place_tasks(config, &index, &mut grid, &mut emitter);

    finish::finish_grid(config, &index, &mut grid);

    let placed = outcomes.iter().filter(|o| o.is_placed()).count();
    emitter.diagnostics.push(Diagnostic::new(
        DiagnosticCode::I001TimelineSummary,
        format!(
            "placed {} of {} task bars over {} days",
            placed,
            outcomes.len(),
            index.len()
        ),
    ));

    Ok(Timeline {
        grid,
        index,
        outcomes,
        diagnostics: emitter.diagnostics,
    })
}
