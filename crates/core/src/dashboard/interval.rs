use chrono::{Duration, NaiveDate, Utc};

pub const DEFAULT_INTERVAL_IN_DAYS: u32 = 90;

const DATE_FMT: &str = "%Y-%m-%d";

/// Parses an absolute interval of the form `YYYY-MM-DD_YYYY-MM-DD`.
/// Anything else counts as "absolute window absent" and callers fall back
/// to the relative window.
pub fn parse_absolute(interval_in_dates: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (from, to) = interval_in_dates.trim().split_once('_')?;
    let from = NaiveDate::parse_from_str(from, DATE_FMT).ok()?;
    let to = NaiveDate::parse_from_str(to, DATE_FMT).ok()?;
    Some((from, to))
}

pub fn encode_absolute(from: NaiveDate, to: NaiveDate) -> String {
    format!("{}_{}", from.format(DATE_FMT), to.format(DATE_FMT))
}

/// End date of a well-formed absolute interval, as sent to the stats
/// endpoint's `date` parameter.
pub fn absolute_end_date(interval_in_dates: &str) -> Option<String> {
    parse_absolute(interval_in_dates).map(|(_, to)| to.format(DATE_FMT).to_string())
}

/// "Today minus `days`" as `YYYY-MM-DD`; `past_date(0)` is today.
pub fn past_date(days: u32) -> String {
    past_date_from(Utc::now().date_naive(), days)
}

pub fn past_date_from(today: NaiveDate, days: u32) -> String {
    (today - Duration::days(i64::from(days)))
        .format(DATE_FMT)
        .to_string()
}
