//! Date → column lookup

use chrono::NaiveDate;
use daygrid_core::ColNum;
use std::collections::BTreeMap;

/// Maps every date of the generated span to its grid column
///
/// Built by the header step and read-only afterwards. Columns increase by
/// exactly one from each date to the next, across month boundaries too.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateColumnIndex {
    columns: BTreeMap<NaiveDate, ColNum>,
}

impl DateColumnIndex {
    /// Record the column of `date`; only the header builder calls this
    pub(crate) fn insert(&mut self, date: NaiveDate, col: ColNum) {
        debug_assert!(
            self.columns
                .last_key_value()
                .map_or(true, |(d, c)| *d < date && *c + 1 == col),
            "dates must be inserted in order with contiguous columns"
        );
        self.columns.insert(date, col);
    }

    /// Column of `date`, or `None` when it lies outside the span
    pub fn get(&self, date: NaiveDate) -> Option<ColNum> {
        self.columns.get(&date).copied()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.columns.contains_key(&date)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.columns.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.columns.keys().next_back().copied()
    }

    pub fn first_col(&self) -> Option<ColNum> {
        self.columns.values().next().copied()
    }

    pub fn last_col(&self) -> Option<ColNum> {
        self.columns.values().next_back().copied()
    }

    /// Date shown in `col`, if it is a date column
    pub fn date_at(&self, col: ColNum) -> Option<NaiveDate> {
        let first_col = self.first_col()?;
        let first_date = self.first_date()?;
        if col < first_col || col > self.last_col()? {
            return None;
        }
        first_date.checked_add_days(chrono::Days::new((col - first_col) as u64))
    }

    /// All `(date, column)` pairs in date order
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, ColNum)> + '_ {
        self.columns.iter().map(|(d, c)| (*d, *c))
    }
}
