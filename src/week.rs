//! ISO week resolution for the board header.
//!
//! The board renders one working week at a time; the UI asks for the days
//! of a given ISO year/week pair and lays the columns out from the answer.

use chrono::{Days, NaiveDate, Weekday};

/// The Monday-through-Friday dates of the given ISO week, or `None` when
/// the year/week pair does not name a real ISO week (week 0, week 54, ...).
pub fn working_days(year: i32, week: u32) -> Option<Vec<NaiveDate>> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;

    (0..5)
        .map(|offset| monday.checked_add_days(Days::new(offset)))
        .collect()
}
