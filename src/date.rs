//! Date string normalization.
//!
//! Turns the date-ish strings found in pages and headers ("Posted on Jan 22,
//! 2024 | News", `2024-01-20T12:00:00+02:00`, RFC 2822 header values) into a
//! canonical UTC instant with millisecond precision, e.g.
//! `2024-01-20T10:00:00.000Z`.
//!
//! Normalization is idempotent: feeding an output back in returns it unchanged.

use crate::constants::{LOOSE_DATE_FORMATS, MAX_FUTURE_YEARS, MIN_PLAUSIBLE_YEAR, REGEXPS};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use tracing::trace;

/// Normalize a raw date string into an ISO-8601 UTC instant.
///
/// Accepts either a string or `None`. Returns `None` for blank input,
/// unparseable input, and for dates whose year falls outside
/// `[-10000, current year + 20]`.
///
/// ```rust
/// use pagedate::normalize_date;
///
/// assert_eq!(
///     normalize_date("Published on: 2024-01-20"),
///     Some("2024-01-20T00:00:00.000Z".to_string())
/// );
/// assert_eq!(normalize_date("Wed, 21 Oct 2015 07:28:00 GMT").as_deref(), Some("2015-10-21T07:28:00.000Z"));
/// assert_eq!(normalize_date(None::<&str>), None);
/// assert_eq!(normalize_date("5000-01-01"), None);
/// ```
pub fn normalize_date<'a>(input: impl Into<Option<&'a str>>) -> Option<String> {
    let cleaned = clean_date_string(input.into()?)?;
    let parsed = parse_date(&cleaned)?;

    if !is_plausible(&parsed) {
        trace!(input = %cleaned, year = parsed.year(), "date outside plausibility window");
        return None;
    }

    Some(format_iso_millis(&parsed))
}

/// Strip boilerplate around a date ("Last updated on:", "| Site", "by Admin",
/// "- 5 min read"). Returns `None` when nothing but whitespace was given.
fn clean_date_string(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let stripped = REGEXPS.date_prefix.replace(trimmed, "");
    let stripped = REGEXPS.date_prefix_simple.replace(&stripped, "");

    let kept = match REGEXPS.date_suffix.find(&stripped) {
        Some(m) => &stripped[..m.start()],
        None => &stripped[..],
    };

    Some(kept.trim().to_string())
}

/// Parse a cleaned date string.
///
/// Tries, in order: RFC 3339, ISO-8601 subsets (including bare years and
/// signed six-digit years), RFC 2822, English month-name layouts, and finally
/// the lenient `dateparser` crate. Values without a zone are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // An ISO-shaped string with out-of-range fields (2024-13-45) is invalid,
    // not something for the lenient parsers to reinterpret.
    if REGEXPS.iso_date.is_match(input) {
        return parse_iso(input);
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }

    // "Jan 20th, 2024" reads as "Jan 20, 2024".
    let input = REGEXPS.ordinal_suffix.replace_all(input, "${1}");
    let input: &str = &input;

    for format in LOOSE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    // Without a year, dateparser happily resolves "10:30" to today.
    if !REGEXPS.four_digit_year.is_match(input) {
        return None;
    }

    // Date-only forms default to midnight, never the current time of day.
    dateparser::parse_with(input, &Utc, NaiveTime::MIN).ok()
}

fn parse_iso(input: &str) -> Option<DateTime<Utc>> {
    let caps = REGEXPS.iso_date.captures(input)?;

    let year: i32 = caps[1].parse().ok()?;
    let field = |index: usize, default: u32| -> Option<u32> {
        caps.get(index)
            .map_or(Some(default), |m| m.as_str().parse().ok())
    };

    let date = NaiveDate::from_ymd_opt(year, field(2, 1)?, field(3, 1)?)?;
    let nanos = match caps.get(7) {
        Some(m) => fraction_to_nanos(m.as_str())?,
        None => 0,
    };
    let time = NaiveTime::from_hms_nano_opt(field(4, 0)?, field(5, 0)?, field(6, 0)?, nanos)?;

    let offset_seconds = match caps.get(8) {
        Some(m) => parse_offset(m.as_str())?,
        None => 0,
    };
    let offset = FixedOffset::east_opt(offset_seconds)?;

    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn fraction_to_nanos(fraction: &str) -> Option<u32> {
    format!("{:0<9}", fraction).parse().ok()
}

/// `Z`, `+02`, `+0200` or `-05:30` to seconds east of UTC.
fn parse_offset(zone: &str) -> Option<i32> {
    if zone.eq_ignore_ascii_case("z") {
        return Some(0);
    }

    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits: String = zone[1..].chars().filter(|c| c.is_ascii_digit()).collect();
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = match digits.get(2..) {
        Some(rest) if !rest.is_empty() => rest.parse().ok()?,
        _ => 0,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(sign * (hours * 3600 + minutes * 60))
}

fn is_plausible(dt: &DateTime<Utc>) -> bool {
    let max_year = Utc::now().year() + MAX_FUTURE_YEARS;
    (MIN_PLAUSIBLE_YEAR..=max_year).contains(&dt.year())
}

/// Format as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Years outside `0..=9999` use the signed six-digit form (`-000500`), which
/// [`parse_date`] reads back.
pub fn format_iso_millis(dt: &DateTime<Utc>) -> String {
    let year = dt.year();
    let year = if (0..=9999).contains(&year) {
        format!("{:04}", year)
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        format!("{}{:06}", sign, year.unsigned_abs())
    };

    format!("{}-{}", year, dt.format("%m-%dT%H:%M:%S%.3fZ"))
}
