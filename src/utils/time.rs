//! Calendar utilities for dataset windows and report staleness
//!
//! All arithmetic is on calendar dates (no time-of-day) so results never
//! depend on the clock or timezone of the machine running the pipeline.

use chrono::{Datelike, Days, NaiveDate};

/// Date `months` calendar months before `date`
///
/// The day of month is kept and any overflow past the target month's length
/// rolls into the following month, so Aug 31 minus six months is Mar 2
/// (Mar 1 in a leap year), never a clamped Feb 28.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use tls_stats::utils::time::months_before;
///
/// let d = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
/// assert_eq!(months_before(d, 6), NaiveDate::from_ymd_opt(2024, 3, 2));
/// ```
pub fn months_before(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) - i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day0())))
}

/// One calendar year before `date`; Feb 29 maps to Mar 1
pub fn one_year_before(date: NaiveDate) -> Option<NaiveDate> {
    months_before(date, 12)
}

/// True when `date` is on or before `today - months`
///
/// Report dates carry no time of day, so a report generated exactly `months`
/// ago is already past the cutoff. A date that cannot be shifted (out of
/// chrono's range) is treated as not older.
pub fn is_older_than_months(date: NaiveDate, today: NaiveDate, months: u32) -> bool {
    months_before(today, months)
        .map(|cutoff| date <= cutoff)
        .unwrap_or(false)
}

/// Earliest and latest date in `dates`, or `None` when empty
pub fn date_range<I>(dates: I) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().fold(None, |range, date| match range {
        None => Some((date, date)),
        Some((start, end)) => Some((start.min(date), end.max(date))),
    })
}
