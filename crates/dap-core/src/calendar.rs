//! Calendar helpers for the AZG rest-day rules (spec §4.5, last row).
//!
//! Timestamps throughout the crate are `chrono::DateTime<Utc>` rather than
//! the teacher's integer `Tick` — rest-day/Sunday-rest accounting is
//! calendar arithmetic (timetable years, moveable feasts) that an integer
//! tick counter cannot express, so this is the one place the crate reaches
//! past the teacher's own stack (see SPEC_FULL.md §4).

use chrono::{Datelike, NaiveDate, Weekday};

/// Compute the `[start, end]` bounds (inclusive) of the timetable year that
/// begins in calendar year `year`.
///
/// `start` is the first Sunday on or after 10 December `year`; `end` is the
/// day before the following timetable year's start (spec §4.5).
pub fn timetable_year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    let start = first_sunday_on_or_after(NaiveDate::from_ymd_opt(year, 12, 10).expect("valid date"));
    let (next_start, _) = {
        let next = first_sunday_on_or_after(
            NaiveDate::from_ymd_opt(year + 1, 12, 10).expect("valid date"),
        );
        (next, ())
    };
    let end = next_start.pred_opt().expect("date before next start exists");
    (start, end)
}

/// Which timetable year (by its starting calendar year) contains `date`.
pub fn timetable_year_for(date: NaiveDate) -> i32 {
    // The timetable year starting in `date.year()` begins in December of
    // that year; a date in January..November belongs to the year that
    // started in the *previous* December.
    let candidate_start_year = if date.month() >= 12 { date.year() } else { date.year() - 1 };
    let (start, end) = timetable_year_bounds(candidate_start_year);
    if date >= start && date <= end {
        candidate_start_year
    } else if date < start {
        candidate_start_year - 1
    } else {
        candidate_start_year + 1
    }
}

fn first_sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    let days_until_sunday = (7 - date.weekday().num_days_from_sunday()) % 7;
    date + chrono::Duration::days(days_until_sunday as i64)
}

/// Extract a four-digit calendar year from a `variantId` that may encode a
/// timetable-year label via prefix `PROD-<YYYY/YY>` or `SIM-<YYYY/YY>-…`
/// (spec §6). Returns `None` if no four-digit year prefix is found.
pub fn parse_variant_year(variant_id: &str) -> Option<i32> {
    for segment in variant_id.split(['-', '_']) {
        let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            if let Ok(year) = digits.parse::<i32>() {
                return Some(year);
            }
        }
    }
    None
}

/// Gregorian Easter Sunday for `year` (Meeus/Jones/Butcher algorithm).
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).expect("valid Easter date")
}

/// Ascension Day: 39 days after Easter Sunday (Thursday, 40 days inclusive).
pub fn ascension_day(year: i32) -> NaiveDate {
    easter_sunday(year) + chrono::Duration::days(39)
}

/// `true` if `date` counts as a "Sunday-like" rest day: an actual Sunday,
/// New Year's Day, Christmas Day, Ascension Day, or one of the caller's
/// `extras` (spec §4.5: "Sundays, New Year, Christmas, Ascension + configured
/// extras").
pub fn is_sunday_like(date: NaiveDate, extras: &[NaiveDate]) -> bool {
    if date.weekday() == Weekday::Sun {
        return true;
    }
    if date.month() == 1 && date.day() == 1 {
        return true;
    }
    if date.month() == 12 && date.day() == 25 {
        return true;
    }
    if date == ascension_day(date.year()) {
        return true;
    }
    extras.contains(&date)
}
