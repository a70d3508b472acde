//! Timezone-aware calendar helpers
//!
//! Day keys and today/week/month boundaries are always computed in an explicit
//! IANA timezone (normally the one from [`Settings`](crate::config::Settings)),
//! never in the host's local zone.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;

/// Timezone used when settings carry none (or an unknown one)
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// Get the current instant
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format an instant as a `YYYY-MM-DD` day key in `tz`
pub fn day_key(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// Format an instant as `HH:MM` wall-clock time in `tz`
pub fn format_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// Format an instant as `YYYY-MM-DD HH:MM:SS` in `tz`
pub fn format_date_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Resolve a wall-clock time in `tz` to an instant
///
/// Ambiguous times (clocks turned back) resolve to the earlier instant. Times
/// that do not exist (clocks turned forward) are read with the offset in force
/// before the transition, which pushes them forward by the size of the gap.
pub fn resolve_local(tz: Tz, local: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let day_before = local - Duration::days(1);
            let offset = tz.offset_from_utc_datetime(&day_before).fix();
            let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
            Utc.from_utc_datetime(&utc)
        }
    }
}

/// Parse a user- or storage-supplied timestamp
///
/// Accepted forms, in order:
/// - RFC 3339 (`2024-01-01T08:00:00Z`, `2024-01-01T08:00:00+08:00`)
/// - wall-clock date-time without offset (`2024-01-01T08:00`, `2024-01-01 08:00:00`),
///   read in `tz`
/// - plain date (`2024-01-01`), read as midnight in `tz`
///
/// # Returns
/// `None` when the value matches none of the forms
pub fn parse_instant(value: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(value, format) {
            return Some(resolve_local(tz, local));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| start_of_day(date, tz))
}

/// First instant of a calendar day in `tz`
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of a calendar day in `tz`
pub fn end_of_day(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    start_of_day(next, tz) - Duration::milliseconds(1)
}

fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn start_of_today(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    start_of_day(local_date(now, tz), tz)
}

pub fn end_of_today(now: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    end_of_day(local_date(now, tz), tz)
}

/// Monday of the week containing `instant`
fn week_start_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    let date = local_date(instant, tz);
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Monday 00:00 of the week containing `instant`
pub fn start_of_week(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    start_of_day(week_start_date(instant, tz), tz)
}

/// Sunday 23:59:59.999 of the week containing `instant`
pub fn end_of_week(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let monday = week_start_date(instant, tz);
    let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
    end_of_day(sunday, tz)
}

fn month_start_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    let date = local_date(instant, tz);
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_month(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    start_of_day(month_start_date(instant, tz), tz)
}

pub fn end_of_month(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let first = month_start_date(instant, tz);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    end_of_day(last, tz)
}

/// Shift an instant by whole hours, saturating at the representable range
pub fn add_hours(instant: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    Duration::try_hours(hours)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(if hours < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

/// All calendar dates from `start` to `end`, both inclusive
///
/// Returns an empty list when `start` is after `end`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_day_key_uses_timezone() {
        // 2024-01-01 20:00 UTC is already Jan 2 in Shanghai
        let instant = utc(2024, 1, 1, 20, 0);
        assert_eq!(day_key(instant, chrono_tz::UTC), "2024-01-01");
        assert_eq!(day_key(instant, DEFAULT_TIMEZONE), "2024-01-02");
    }

    #[test]
    fn test_parse_instant_forms() {
        let tz = chrono_tz::UTC;
        assert_eq!(
            parse_instant("2024-01-01T08:00:00Z", tz),
            Some(utc(2024, 1, 1, 8, 0))
        );
        assert_eq!(
            parse_instant("2024-01-01T08:00:00+08:00", tz),
            Some(utc(2024, 1, 1, 0, 0))
        );
        assert_eq!(parse_instant("2024-01-01T08:30", tz), Some(utc(2024, 1, 1, 8, 30)));
        assert_eq!(parse_instant("2024-01-01", tz), Some(utc(2024, 1, 1, 0, 0)));
        assert_eq!(parse_instant("not a date", tz), None);
        assert_eq!(parse_instant("", tz), None);
    }

    #[test]
    fn test_parse_instant_naive_reads_in_zone() {
        let parsed = parse_instant("2024-01-01 08:00", DEFAULT_TIMEZONE).unwrap();
        assert_eq!(parsed, utc(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_week_bounds_start_monday() {
        // 2024-01-03 is a Wednesday
        let tz = chrono_tz::UTC;
        let now = utc(2024, 1, 3, 15, 0);
        assert_eq!(start_of_week(now, tz), utc(2024, 1, 1, 0, 0));
        let end = end_of_week(now, tz);
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_week_bounds_on_sunday() {
        let tz = chrono_tz::UTC;
        let sunday = utc(2024, 1, 7, 10, 0);
        assert_eq!(start_of_week(sunday, tz), utc(2024, 1, 1, 0, 0));
    }

    #[test]
    fn test_month_bounds_leap_february() {
        let tz = chrono_tz::UTC;
        let now = utc(2024, 2, 10, 12, 0);
        assert_eq!(start_of_month(now, tz), utc(2024, 2, 1, 0, 0));
        assert_eq!(
            end_of_month(now, tz).date_naive(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_today_bounds_in_shanghai() {
        let now = utc(2024, 1, 1, 20, 0);
        assert_eq!(start_of_today(now, DEFAULT_TIMEZONE), utc(2024, 1, 1, 16, 0));
        assert_eq!(
            end_of_today(now, DEFAULT_TIMEZONE),
            utc(2024, 1, 2, 16, 0) - Duration::milliseconds(1)
        );
    }

    #[test]
    fn test_resolve_local_inside_gap_moves_forward() {
        // Europe/Berlin skips 02:00-03:00 on 2024-03-31
        let tz = chrono_tz::Europe::Berlin;
        let local = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let resolved = resolve_local(tz, local);
        assert_eq!(resolved, utc(2024, 3, 31, 1, 30));
        assert_eq!(resolved.with_timezone(&tz).hour(), 3);
    }

    #[test]
    fn test_add_hours_saturates() {
        let now = utc(2024, 1, 1, 0, 0);
        assert_eq!(add_hours(now, 24), utc(2024, 1, 2, 0, 0));
        assert_eq!(add_hours(now, 10_000_000_000_000), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_hours(now, i64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_hours(now, i64::MIN), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_date_range_inclusive() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days: Vec<String> = date_range(start, end).iter().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert!(date_range(end, start).is_empty());
    }
}
