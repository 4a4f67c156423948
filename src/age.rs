//! Chronological age in completed months, and age-band selection.

use chrono::{Datelike, NaiveDate};

use crate::context::LookupContext;
use crate::domain::RawToStandardTable;

/// Whole completed months from `dob` to `test_date`.
///
/// A month only counts once the test day-of-month reaches the birth
/// day-of-month, so 2020-02-29 → 2021-02-28 is 11 months. Negative when the
/// test date precedes the birth date.
pub fn calc_age_months(dob: NaiveDate, test_date: NaiveDate) -> i32 {
    let years = test_date.year() - dob.year();
    let months = test_date.month() as i32 - dob.month() as i32;
    let mut total = years * 12 + months;
    if test_date.day() < dob.day() {
        total -= 1;
    }
    total
}

/// The B-series table whose band contains `age_months`.
pub fn find_age_band(age_months: i32, ctx: &LookupContext) -> Option<&RawToStandardTable> {
    ctx.b_table_for_age(age_months)
}

/// Parse a calendar date.
///
/// ISO (`YYYY-MM-DD`) is preferred; `DD/MM/YYYY`, `DD-MM-YYYY` and `YYYY/MM/DD`
/// are accepted too.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    let s = s.trim();
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}
