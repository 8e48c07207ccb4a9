//! Month, day and weekday header rows

use daygrid_core::{
    month_label, weekday_label, Align, CellStyle, ColNum, DayKind, Grid, MergeRange, Rgb, RowNum,
    TimelineConfig,
};
use tracing::debug;

use crate::index::DateColumnIndex;

/// Row holding the merged month labels
pub const MONTH_ROW: RowNum = 0;
/// Row holding day-of-month numbers
pub const DAY_ROW: RowNum = 1;
/// Row holding weekday abbreviations
pub const WEEKDAY_ROW: RowNum = 2;

/// Header fill for Saturdays
pub const SATURDAY_FILL: Rgb = Rgb::from_u32(0xE0E0E0);
/// Header fill for Sundays
pub const SUNDAY_FILL: Rgb = Rgb::from_u32(0xD0D0D0);

/// Shading for a day, `None` on weekdays
pub fn weekend_fill(kind: DayKind) -> Option<Rgb> {
    match kind {
        DayKind::Weekday => None,
        DayKind::Saturday => Some(SATURDAY_FILL),
        DayKind::Sunday => Some(SUNDAY_FILL),
    }
}

/// Write the three header rows and return the date index they define
///
/// Months are laid out left to right starting at the first date column,
/// each one immediately after the previous month's last day.
pub(crate) fn build_headers(config: &TimelineConfig, grid: &mut Grid) -> DateColumnIndex {
    let month_style = CellStyle::new().bold().align(Align::Center).thin_border();
    let day_style = CellStyle::new().align(Align::Center).thin_border();

    let mut index = DateColumnIndex::default();
    let mut col: ColNum = config.first_date_col();

    for month in config.span().months() {
        let first_col = col;
        let last_col = first_col + month.days() as ColNum - 1;

        grid.put(
            MONTH_ROW,
            first_col,
            month_label(month.year, month.month, config.locale),
            month_style,
        );
        if last_col > first_col {
            grid.merge(MergeRange::row(MONTH_ROW, first_col, last_col));
        }

        for (offset, date) in month.dates().enumerate() {
            let day_col = first_col + offset as ColNum;
            let mut style = day_style;
            style.fill = weekend_fill(DayKind::of(date));

            grid.put(DAY_ROW, day_col, offset as u32 + 1, style);
            grid.put(
                WEEKDAY_ROW,
                day_col,
                weekday_label(date, config.locale),
                style,
            );
            index.insert(date, day_col);
        }

        debug!(
            year = month.year,
            month = month.month,
            first_col,
            last_col,
            "month header"
        );
        col = last_col + 1;
    }

    index
}
