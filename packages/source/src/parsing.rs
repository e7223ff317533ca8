//! Field parsing for Darwin Core rows.
//!
//! `eventDate` follows ISO 8601 as profiled by Darwin Core: a date, a
//! date-time, a reduced-precision date (`YYYY-MM`, `YYYY`), or an interval
//! of any of those separated by `/`. Slash-separated calendar dates
//! (`YYYY/MM/DD`) are accepted as well.

use biodiversity_map_occurrence_models::Coordinates;
use chrono::NaiveDate;

/// Parses a Darwin Core `eventDate` into a calendar date.
///
/// Intervals resolve to their start. A `/` only marks an interval when the
/// start is a full date or the end parses on its own, so `2019/03` is
/// rejected rather than read as the year 2019. Date-times resolve to the
/// date as written; the time of day and any UTC offset are not
/// interpreted. Reduced-precision dates resolve to the first day of the
/// period.
#[must_use]
pub fn parse_event_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(date_part(s), "%Y/%m/%d") {
        return Some(date);
    }

    match s.split_once('/') {
        None => parse_instant(s),
        Some((start, end)) => {
            let date = parse_instant(start)?;
            (is_full_date(start) || parse_instant(end).is_some()).then_some(date)
        }
    }
}

/// The date portion of a date or date-time.
fn date_part(s: &str) -> &str {
    let s = s.trim();
    s.split_once(['T', ' ']).map_or(s, |(date, _)| date)
}

fn parse_instant(s: &str) -> Option<NaiveDate> {
    parse_calendar_date(date_part(s))
}

fn is_full_date(s: &str) -> bool {
    NaiveDate::parse_from_str(date_part(s), "%Y-%m-%d").is_ok()
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }

    let mut parts = s.split('-');
    let year = parts.next().filter(|y| is_year(y))?.parse::<i32>().ok()?;
    match (parts.next(), parts.next()) {
        (None, None) => NaiveDate::from_ymd_opt(year, 1, 1),
        (Some(month), None) if (1..=2).contains(&month.len()) => {
            NaiveDate::from_ymd_opt(year, month.parse().ok()?, 1)
        }
        _ => None,
    }
}

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parses WGS84 coordinates from optional longitude/latitude strings.
///
/// Returns `None` if either value is missing, not a number, or outside the
/// geographic range (|lon| <= 180, |lat| <= 90).
#[must_use]
pub fn parse_coordinates(longitude: Option<&str>, latitude: Option<&str>) -> Option<Coordinates> {
    let longitude = longitude?.trim().parse::<f64>().ok()?;
    let latitude = latitude?.trim().parse::<f64>().ok()?;

    if !longitude.is_finite() || !latitude.is_finite() {
        return None;
    }
    if longitude.abs() > 180.0 || latitude.abs() > 90.0 {
        return None;
    }

    Some(Coordinates {
        longitude,
        latitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_event_date("2019-03-15"), Some(ymd(2019, 3, 15)));
    }

    #[test]
    fn parses_date_time_variants() {
        assert_eq!(
            parse_event_date("2019-03-15T10:22:00"),
            Some(ymd(2019, 3, 15))
        );
        assert_eq!(
            parse_event_date("2019-03-15T10:22:00.000-06:00"),
            Some(ymd(2019, 3, 15))
        );
        assert_eq!(
            parse_event_date("2019-03-15 10:22:00"),
            Some(ymd(2019, 3, 15))
        );
        assert_eq!(parse_event_date("2019-03-15T10:22Z"), Some(ymd(2019, 3, 15)));
    }

    #[test]
    fn interval_resolves_to_start() {
        assert_eq!(
            parse_event_date("2019-03-15/2019-03-20"),
            Some(ymd(2019, 3, 15))
        );
        assert_eq!(parse_event_date("2018-11/2019-02"), Some(ymd(2018, 11, 1)));
        assert_eq!(parse_event_date("2019-03-15/20"), Some(ymd(2019, 3, 15)));
        assert_eq!(parse_event_date("2019/2020"), Some(ymd(2019, 1, 1)));
    }

    #[test]
    fn slash_separated_date_keeps_month_and_day() {
        assert_eq!(parse_event_date("2019/03/15"), Some(ymd(2019, 3, 15)));
        assert_eq!(parse_event_date("2019/3/5"), Some(ymd(2019, 3, 5)));
        assert_eq!(
            parse_event_date("2019/03/15 10:22:00"),
            Some(ymd(2019, 3, 15))
        );
    }

    #[test]
    fn slash_without_a_valid_interval_is_rejected() {
        assert!(parse_event_date("2019/03").is_none());
        assert!(parse_event_date("2019/13/01").is_none());
        assert!(parse_event_date("15/03/2019").is_none());
        assert!(parse_event_date("2019/").is_none());
    }

    #[test]
    fn parses_reduced_precision() {
        assert_eq!(parse_event_date("2019-07"), Some(ymd(2019, 7, 1)));
        assert_eq!(parse_event_date("2019"), Some(ymd(2019, 1, 1)));
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_event_date("  2020-01-02 "), Some(ymd(2020, 1, 2)));
    }

    #[test]
    fn rejects_invalid_dates() {
        assert!(parse_event_date("").is_none());
        assert!(parse_event_date("not-a-date").is_none());
        assert!(parse_event_date("2019-13").is_none());
        assert!(parse_event_date("2019-02-30").is_none());
        assert!(parse_event_date("2019-03-15-01").is_none());
    }

    #[test]
    fn parses_coordinates() {
        let c = parse_coordinates(Some("-84.0907"), Some(" 9.9281")).unwrap();
        assert!((c.longitude - -84.0907).abs() < f64::EPSILON);
        assert!((c.latitude - 9.9281).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_missing_coordinates() {
        assert!(parse_coordinates(None, Some("9.9")).is_none());
        assert!(parse_coordinates(Some("-84.1"), None).is_none());
    }

    #[test]
    fn rejects_unparseable_coordinates() {
        assert!(parse_coordinates(Some("abc"), Some("9.9")).is_none());
        assert!(parse_coordinates(Some("NaN"), Some("9.9")).is_none());
    }

    #[test]
    fn rejects_projected_coordinates() {
        assert!(parse_coordinates(Some("490000.0"), Some("1100000.0")).is_none());
    }
}
