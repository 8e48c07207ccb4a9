//! Calendar arithmetic for the month span
//!
//! Everything here works on the proleptic Gregorian calendar that `chrono`
//! uses. A [`MonthSpan`] describes the contiguous run of months the grid
//! covers and iterates them with year rollover.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::Locale;

/// Check whether `year` is a Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
///
/// Returns 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Weekday abbreviation for a date, Monday first
pub fn weekday_label(date: NaiveDate, locale: Locale) -> &'static str {
    const JA: [&str; 7] = ["月", "火", "水", "木", "金", "土", "日"];
    const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    let idx = date.weekday().num_days_from_monday() as usize;
    match locale {
        Locale::Ja => JA[idx],
        Locale::En => EN[idx],
    }
}

/// Month header label, e.g. `2025 / 5月` or `2025 / May`
pub fn month_label(year: i32, month: u32, locale: Locale) -> String {
    const EN: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    match locale {
        Locale::Ja => format!("{} / {}月", year, month),
        Locale::En => {
            let name = EN.get(month.wrapping_sub(1) as usize).copied().unwrap_or("?");
            format!("{} / {}", year, name)
        }
    }
}

/// Weekend classification used for shading
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Saturday,
    Sunday,
}

impl DayKind {
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat => DayKind::Saturday,
            Weekday::Sun => DayKind::Sunday,
            _ => DayKind::Weekday,
        }
    }
}

/// One month inside a span
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    /// Number of days in this month
    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// First day of the month
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// All dates of the month in order
    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        (1..=self.days()).filter_map(move |d| NaiveDate::from_ymd_opt(self.year, self.month, d))
    }
}

/// Contiguous run of `num_months` months starting at `start_year`/`start_month`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthSpan {
    pub start_year: i32,
    pub start_month: u32,
    pub num_months: u32,
}

impl MonthSpan {
    pub fn new(start_year: i32, start_month: u32, num_months: u32) -> Self {
        Self {
            start_year,
            start_month,
            num_months,
        }
    }

    /// The `i`-th month of the span, rolling the year over after December
    pub fn month_at(&self, i: u32) -> Month {
        let offset = self.start_month as i64 - 1 + i as i64;
        Month {
            year: self.start_year.saturating_add(offset.div_euclid(12) as i32),
            month: offset.rem_euclid(12) as u32 + 1,
        }
    }

    /// Iterate the months of the span in order
    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        (0..self.num_months).map(move |i| self.month_at(i))
    }

    /// Total number of days covered
    pub fn total_days(&self) -> u64 {
        self.months().map(|m| m.days() as u64).sum()
    }

    /// First day of the span
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.month_at(0).first_day()
    }

    /// Last day of the span
    pub fn last_day(&self) -> Option<NaiveDate> {
        if self.num_months == 0 {
            return None;
        }
        let last = self.month_at(self.num_months - 1);
        NaiveDate::from_ymd_opt(last.year, last.month, last.days())
    }
}
