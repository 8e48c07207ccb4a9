//! # daygrid-core
//!
//! Core domain model for the daygrid timeline generator.
//!
//! This crate provides:
//! - Domain types: `TimelineConfig`, `TaskSpec`, `Rgb`, `Locale`
//! - Calendar arithmetic over a month span (`calendar`)
//! - The styled cell `Grid` shared by layout and renderers (`grid`)
//! - Diagnostics for non-fatal conditions (`diagnostics`)
//! - Error types and the `Renderer` trait
//!
//! ## Example
//!
//! ```rust
//! use daygrid_core::{Rgb, TaskSpec, TimelineConfig};
//!
//! let mut config = TimelineConfig::new(2025, 5, 3);
//! config.tasks.push(
//!     TaskSpec::new("Design", 1)
//!         .dates("2025-05-01", "2025-05-10")
//!         .color(Rgb::new(0xAD, 0xD8, 0xE6)),
//! );
//! assert!(config.validate().is_ok());
//! ```

pub mod calendar;
pub mod diagnostics;
pub mod grid;

pub use calendar::{days_in_month, is_leap_year, month_label, weekday_label, DayKind, Month, MonthSpan};
pub use diagnostics::{CollectingEmitter, Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity};
pub use grid::{Align, Border, Cell, CellStyle, CellValue, ColNum, Grid, GridBounds, MergeRange, RowNum};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Rows reserved for month / day / weekday headers
pub const HEADER_ROWS: RowNum = 3;

/// Date format accepted for task start and end
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Colors
// ============================================================================

/// 24-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(u32);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Build from a packed `0xRRGGBB` value (upper byte ignored)
    pub const fn from_u32(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// Parse a 6-hex-digit color, with or without a leading `#`
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))
    }

    /// Uppercase hex without `#`, e.g. `FFC0CB`
    pub fn to_hex(self) -> String {
        format!("{:06X}", self.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_hex()
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Language of month and weekday labels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

/// What happens when two tasks claim the same row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep the first task on the row, skip later ones
    #[default]
    Reject,
    /// Clear the row and let the later task take it
    Replace,
}

/// A task as declared in configuration
///
/// Dates are kept in their external `YYYY-MM-DD` form so that a malformed
/// date only affects this task's bar.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    /// 1-based row below the header rows
    pub row_offset: u32,
    pub start: String,
    pub end: String,
    #[serde(default = "default_bar_color")]
    pub color: Rgb,
    /// Text shown centered in the bar's anchor cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Light blue
fn default_bar_color() -> Rgb {
    Rgb::new(0xAD, 0xD8, 0xE6)
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, row_offset: u32) -> Self {
        Self {
            name: name.into(),
            row_offset,
            start: String::new(),
            end: String::new(),
            color: default_bar_color(),
            label: None,
        }
    }

    /// Set start and end dates
    pub fn dates(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = start.into();
        self.end = end.into();
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Column sizing and sheet cosmetics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Widths of the metadata columns, left to right
    pub metadata_widths: Vec<f64>,
    /// Width of every date column
    pub day_width: f64,
    /// Freeze the header rows and metadata columns
    pub freeze_panes: bool,
    /// Shade weekend columns in task rows, not just in the header
    pub shade_weekend_rows: bool,
}

impl LayoutOptions {
    /// Width used for metadata columns past `metadata_widths`
    pub const FALLBACK_METADATA_WIDTH: f64 = 15.0;

    pub fn metadata_width(&self, col: ColNum) -> f64 {
        self.metadata_widths
            .get(col as usize)
            .copied()
            .unwrap_or(Self::FALLBACK_METADATA_WIDTH)
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            metadata_widths: vec![25.0, 15.0, 15.0],
            day_width: 3.5,
            freeze_panes: true,
            shade_weekend_rows: false,
        }
    }
}

/// Complete input for one build
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub start_year: i32,
    /// First month, 1-12
    pub start_month: u32,
    pub num_months: u32,
    pub output: PathBuf,
    pub sheet_name: String,
    /// Columns reserved for task metadata before the first date column
    pub task_col_count: ColNum,
    pub locale: Locale,
    pub collision: CollisionPolicy,
    pub layout: LayoutOptions,
    pub tasks: Vec<TaskSpec>,
}

impl TimelineConfig {
    /// Empty config covering `num_months` months from `start_year`/`start_month`
    pub fn new(start_year: i32, start_month: u32, num_months: u32) -> Self {
        Self {
            start_year,
            start_month,
            num_months,
            output: PathBuf::from("project_schedule.xlsx"),
            sheet_name: "Schedule".into(),
            task_col_count: 3,
            locale: Locale::default(),
            collision: CollisionPolicy::default(),
            layout: LayoutOptions::default(),
            tasks: Vec::new(),
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// The month span this config covers
    pub fn span(&self) -> MonthSpan {
        MonthSpan::new(self.start_year, self.start_month, self.num_months)
    }

    /// First date column
    pub fn first_date_col(&self) -> ColNum {
        self.task_col_count
    }

    /// Check structural constraints before building
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(ConfigError::InvalidMonth(self.start_month));
        }
        if self.num_months == 0 {
            return Err(ConfigError::EmptySpan);
        }
        if self.task_col_count == 0 {
            return Err(ConfigError::NoMetadataColumns);
        }

        let span = self.span();
        if span.first_day().is_none() || span.last_day().is_none() {
            return Err(ConfigError::YearOutOfRange(self.start_year));
        }

        let last_col = self.task_col_count as u64 + span.total_days() - 1;
        if last_col > grid::MAX_COL as u64 {
            return Err(ConfigError::SpanTooWide {
                days: span.total_days(),
                max: grid::MAX_COL as u64 + 1 - self.task_col_count as u64,
            });
        }

        let max_offset = grid::MAX_ROW - HEADER_ROWS + 1;
        if let Some(task) = self
            .tasks
            .iter()
            .find(|t| t.row_offset == 0 || t.row_offset > max_offset)
        {
            return Err(ConfigError::InvalidRowOffset {
                task: task.name.clone(),
                offset: task.row_offset,
                max: max_offset,
            });
        }

        Ok(())
    }
}

impl Default for TimelineConfig {
    /// Sample plan starting May 2025 over 24 months
    fn default() -> Self {
        let yellow = Rgb::from_u32(0xFFFF00);
        let pink = Rgb::from_u32(0xFFC0CB);
        let light_blue = Rgb::from_u32(0xADD8E6);
        let dark_orange = Rgb::from_u32(0xFF8C00);
        let light_green = Rgb::from_u32(0x90EE90);

        let mut config = Self::new(2025, 5, 24);
        config.tasks = vec![
            TaskSpec::new("基本計画 (Basic Planning)", 1)
                .dates("2025-04-03", "2025-04-15")
                .color(yellow),
            TaskSpec::new("基本設計 (Basic Design)", 2)
                .dates("2025-04-16", "2025-05-10")
                .color(pink),
            TaskSpec::new("- プラン提案 (Plan Proposal)", 3)
                .dates("2025-04-16", "2025-04-30")
                .color(light_blue),
            TaskSpec::new("- デザイン検討 (Design Review)", 4)
                .dates("2025-05-01", "2025-05-10")
                .color(light_blue),
            TaskSpec::new("実施設計 (Detailed Design)", 5)
                .dates("2025-05-11", "2025-06-20")
                .color(dark_orange),
            TaskSpec::new("- 詳細図面作成 (Detail Drawings)", 6)
                .dates("2025-05-11", "2025-06-10")
                .color(light_green),
            TaskSpec::new("- 仕様確認 (Spec Check)", 7)
                .dates("2025-06-11", "2025-06-20")
                .color(light_green),
        ];
        config
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a finished grid to the output format
    fn render(&self, grid: &Grid) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Which end of a task's range a date belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Start => f.write_str("start"),
            DateField::End => f.write_str("end"),
        }
    }
}

/// Per-task condition that prevents drawing its bar
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("could not parse {field} date '{value}'")]
    DateParse {
        field: DateField,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("{field} date {date} is outside the generated span {first} .. {last}")]
    OutOfRange {
        field: DateField,
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("row {row_offset} is already used by '{holder}'")]
    RowCollision { row_offset: u32, holder: String },
}

impl TaskError {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            TaskError::DateParse { .. } => DiagnosticCode::W001UnparsableDate,
            TaskError::OutOfRange { .. } => DiagnosticCode::W002DateOutOfSpan,
            TaskError::InvertedRange { .. } => DiagnosticCode::W003InvertedRange,
            TaskError::RowCollision { .. } => DiagnosticCode::W004RowCollision,
        }
    }

    /// Diagnostic for the task named `task`
    pub fn to_diagnostic(&self, task: &str) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), format!("task '{}': {}", task, self))
            .with_task(task);
        match self {
            TaskError::DateParse { source, .. } => diagnostic
                .with_note(source.to_string())
                .with_hint("dates must be written as YYYY-MM-DD"),
            TaskError::OutOfRange { .. } => diagnostic
                .with_hint("widen the span with start_month/num_months or fix the date"),
            TaskError::InvertedRange { .. } => diagnostic.with_hint("swap start and end"),
            TaskError::RowCollision { .. } => {
                diagnostic.with_hint("give each task its own row_offset")
            }
        }
    }
}

/// Invalid configuration; nothing is built
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start_month must be 1-12, got {0}")]
    InvalidMonth(u32),

    #[error("num_months must be at least 1")]
    EmptySpan,

    #[error("task_col_count must be at least 1")]
    NoMetadataColumns,

    #[error("start_year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),

    #[error("span of {days} days does not fit in a sheet (at most {max} date columns)")]
    SpanTooWide { days: u64, max: u64 },

    #[error("task '{task}' has row_offset {offset}; offsets run from 1 to {max}")]
    InvalidRowOffset { task: String, offset: u32, max: u32 },

    #[error("invalid color '{0}': expected 6 hex digits like FFC0CB")]
    InvalidColor(String),

    #[error("cannot read config '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(String),
}

/// Rendering or persisting failed
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("permission denied writing '{}': make sure the file is not open in another program", path.display())]
    Locked { path: PathBuf },

    #[error("failed to write '{}'", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RenderError {
    /// True when the target file is locked or not writable
    pub fn is_locked(&self) -> bool {
        matches!(self, RenderError::Locked { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rgb_parses_hex() {
        assert_eq!(Rgb::from_hex("FFC0CB").unwrap(), Rgb::new(0xFF, 0xC0, 0xCB));
        assert_eq!(Rgb::from_hex("#90ee90").unwrap(), Rgb::from_u32(0x90EE90));
        assert_eq!(Rgb::from_u32(0xADD8E6).to_hex(), "ADD8E6");
        assert_eq!(Rgb::from_u32(0x00FF00).to_string(), "#00FF00");
    }

    #[test]
    fn rgb_rejects_bad_input() {
        for bad in ["", "FFF", "GGGGGG", "FFC0CB0", "+FFFFF", "##FFC0CB", "#"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ConfigError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = TimelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tasks.len(), 7);
        assert_eq!(config.span().total_days(), 730);
        assert_eq!(config.first_date_col(), 3);
    }

    #[test]
    fn validate_rejects_bad_month() {
        let config = TimelineConfig::new(2025, 13, 1);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMonth(13))));
        let config = TimelineConfig::new(2025, 0, 1);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidMonth(0))));
    }

    #[test]
    fn validate_rejects_empty_span() {
        let config = TimelineConfig::new(2025, 5, 0);
        assert!(matches!(config.validate(), Err(ConfigError::EmptySpan)));
    }

    #[test]
    fn validate_rejects_zero_metadata_columns() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.task_col_count = 0;
        assert!(matches!(config.validate(), Err(ConfigError::NoMetadataColumns)));
    }

    #[test]
    fn validate_rejects_out_of_sheet_row_offsets() {
        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks.push(TaskSpec::new("Oops", 0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRowOffset { task, offset: 0, .. }) if task == "Oops"
        ));

        let mut config = TimelineConfig::new(2025, 5, 1);
        config.tasks.push(TaskSpec::new("Deep", u32::MAX));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRowOffset { .. })
        ));
    }

    #[test]
    fn validate_rejects_span_wider_than_sheet() {
        // 50 years of days does not fit in 16384 columns
        let config = TimelineConfig::new(2000, 1, 600);
        assert!(matches!(config.validate(), Err(ConfigError::SpanTooWide { .. })));
    }

    #[test]
    fn config_from_toml() {
        let text = r##"
start_year = 2025
start_month = 11
num_months = 4
output = "plan.xlsx"
locale = "en"
collision = "replace"

[layout]
day_width = 4.0

[[tasks]]
name = "Design"
row_offset = 1
start = "2025-11-03"
end = "2025-11-14"
color = "#ADD8E6"
label = "D"
"##;
        let config = TimelineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.start_month, 11);
        assert_eq!(config.output, PathBuf::from("plan.xlsx"));
        assert_eq!(config.sheet_name, "Schedule");
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.collision, CollisionPolicy::Replace);
        assert_eq!(config.layout.day_width, 4.0);
        assert_eq!(config.layout.metadata_widths, vec![25.0, 15.0, 15.0]);
        assert_eq!(config.tasks.len(), 1);
        assert_eq!(config.tasks[0].color, Rgb::from_u32(0xADD8E6));
        assert_eq!(config.tasks[0].label.as_deref(), Some("D"));
    }

    #[test]
    fn config_with_bad_color_fails_to_parse() {
        let text = r#"
[[tasks]]
name = "Design"
row_offset = 1
start = "2025-11-03"
end = "2025-11-14"
color = "blue"
"#;
        assert!(matches!(
            TimelineConfig::from_toml_str(text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn config_toml_round_trip_keeps_tasks() {
        let config = TimelineConfig::default();
        let text = config.to_toml_string().unwrap();
        let back = TimelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            TimelineConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn metadata_width_falls_back() {
        let layout = LayoutOptions::default();
        assert_eq!(layout.metadata_width(0), 25.0);
        assert_eq!(layout.metadata_width(2), 15.0);
        assert_eq!(layout.metadata_width(7), LayoutOptions::FALLBACK_METADATA_WIDTH);
    }

    #[test]
    fn task_error_diagnostics() {
        let err = TaskError::InvertedRange {
            start: NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        };
        let d = err.to_diagnostic("Design");
        assert_eq!(d.code, DiagnosticCode::W003InvertedRange);
        assert_eq!(d.task.as_deref(), Some("Design"));
        assert!(d.message.contains("2025-05-10"));
    }

    #[test]
    fn locked_error_message_is_specific() {
        let err = RenderError::Locked {
            path: PathBuf::from("plan.xlsx"),
        };
        assert!(err.is_locked());
        assert!(err.to_string().contains("not open in another program"));
    }
}
