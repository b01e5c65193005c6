//! Timestamp parsing for `X-Amz-Date`, `x-amz-date`, and `Date`.

use {
    chrono::{DateTime, NaiveDate, Utc},
    lazy_static::lazy_static,
    regex::Regex,
    std::str::FromStr,
};

lazy_static! {
    /// ISO 8601 basic format timestamp in UTC, e.g. `20150830T123600Z`.
    static ref ISO_8601_BASIC_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})
        (?P<month>0[1-9]|1[0-2])
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3])
        (?P<minute>[0-5][0-9])
        (?P<second>[0-5][0-9])
        Z$").unwrap();
}

pub(crate) trait ParseISO8601<T> {
    /// Parse an ISO 8601 basic format UTC timestamp, returning `None` if it is malformed.
    fn parse_from_iso8601(s: &str) -> Option<T>;
}

impl ParseISO8601<DateTime<Utc>> for DateTime<Utc> {
    fn parse_from_iso8601(s: &str) -> Option<DateTime<Utc>> {
        let cap = ISO_8601_BASIC_REGEX.captures(s)?;
        let field = |name: &str| cap.name(name).and_then(|m| u32::from_str(m.as_str()).ok());

        let year = i32::from_str(cap.name("year")?.as_str()).ok()?;
        let naive = NaiveDate::from_ymd_opt(year, field("month")?, field("day")?)?.and_hms_opt(
            field("hour")?,
            field("minute")?,
            field("second")?,
        )?;

        Some(DateTime::from_naive_utc_and_offset(naive, Utc))
    }
}

/// Parse the value of a `Date` header: ISO 8601 basic format, falling back to RFC 2822
/// (`Sun, 30 Aug 2015 12:36:00 GMT`).
pub(crate) fn parse_date_header(s: &str) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::parse_from_iso8601(s)
        .or_else(|| DateTime::parse_from_rfc2822(s).ok().map(|dt| dt.with_timezone(&Utc)))
}
