//! Defaults, ordered priority lists and precompiled regular expressions.
//!
//! The priority lists are evaluated top-down and the first hit wins, so the
//! position of each entry is part of the extraction behavior.

use once_cell::sync::Lazy;
use regex::Regex;

/// User agent sent with every request unless the caller overrides it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default byte budget for partial fetches (32 KiB)
pub const DEFAULT_MAX_BYTES: usize = 32 * 1024;

/// Default partial fetch timeout in milliseconds
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Default header probe timeout in milliseconds
pub const DEFAULT_HEAD_TIMEOUT_MS: u64 = 5_000;

/// JSON-LD keys that carry a date, in priority order.
///
/// The same list drives the rescue pass for truncated blocks.
pub const JSON_LD_DATE_KEYS: [&str; 4] = ["datePublished", "dateModified", "pubDate", "publishedAt"];

/// Meta tag names (lowercased) that carry a date, in priority order.
///
/// Publish-time variants first, generic names next, modified-time last.
pub const META_DATE_NAMES: [&str; 12] = [
    "article:published_time",
    "og:published_time",
    "datepublished",
    "date",
    "pubdate",
    "publishdate",
    "dc.date.issued",
    "bt:pubdate",
    "sailthru.date",
    "article:modified_time",
    "og:updated_time",
    "modifieddate",
];

/// Lowest calendar year accepted by the normalizer
pub const MIN_PLAUSIBLE_YEAR: i32 = -10_000;

/// How many years past the current one the normalizer still accepts
pub const MAX_FUTURE_YEARS: i32 = 20;

/// Month-name layouts tried before the lenient fallback parser.
///
/// Date-only, interpreted as midnight UTC.
pub const LOOSE_DATE_FORMATS: [&str; 16] = [
    "%b %e, %Y", // Jan 5, 2024
    "%b %d, %Y", // Jan 05, 2024
    "%B %e, %Y", // January 5, 2024
    "%B %d, %Y", // January 05, 2024
    "%b %e %Y",  // Jan 5 2024
    "%B %e %Y",  // January 5 2024
    "%e %b %Y",  // 5 Jan 2024
    "%d %b %Y",  // 05 Jan 2024
    "%e %B %Y",  // 5 January 2024
    "%d %B %Y",  // 05 January 2024
    "%e %b, %Y", // 5 Jan, 2024
    "%e %B, %Y", // 5 January, 2024
    "%a, %b %e, %Y",
    "%A, %B %e, %Y",
    "%a, %e %b %Y",
    "%A, %e %B %Y", // Saturday, 20 January 2024
];

pub struct Regexps {
    pub meta_tag: Regex,
    pub attribute: Regex,
    pub json_ld_script: Regex,
    pub time_tag: Regex,
    pub markup: Regex,
    pub charset: Regex,
    pub rescue_keys: Vec<(&'static str, Regex)>,
    pub date_prefix: Regex,
    pub date_prefix_simple: Regex,
    pub date_suffix: Regex,
    pub iso_date: Regex,
    pub four_digit_year: Regex,
    pub ordinal_suffix: Regex,
}

pub static REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    meta_tag: Regex::new(r"(?i)<meta\s+([^>]+?)>").unwrap(),
    attribute: Regex::new(
        r#"(?i)([a-z0-9:._-]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^>\s]+)))?"#,
    )
    .unwrap(),
    json_ld_script: Regex::new(
        r#"(?is)<script\s+[^>]*?type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
    )
    .unwrap(),
    time_tag: Regex::new(r"(?is)<time(\s[^>]*)?>(.*?)</time>").unwrap(),
    markup: Regex::new(r"<[^>]*>").unwrap(),
    charset: Regex::new(r"(?i)charset=([\w-]+)").unwrap(),
    rescue_keys: JSON_LD_DATE_KEYS
        .iter()
        .map(|key| {
            let pattern = format!(r#"(?i)"{}"\s*:\s*"([^"]+)""#, regex::escape(key));
            (*key, Regex::new(&pattern).unwrap())
        })
        .collect(),
    date_prefix: Regex::new(
        r"(?i)^(?:last|first|posted|originally)\s*(?:published|updated|date|posted|modified)\s*(?:on|at)?[:\s]*",
    )
    .unwrap(),
    date_prefix_simple: Regex::new(r"(?i)^(?:published|updated|date|posted|modified)\s*(?:on|at)?[:\s]*")
        .unwrap(),
    date_suffix: Regex::new(r"(?i)[(|]|by\s+|[-–—]\s*\d+\s*min").unwrap(),
    iso_date: Regex::new(
        r"(?i)^([+-]\d{6}|\d{4})(?:-(\d{2})(?:-(\d{2}))?)?(?:[t ](\d{2}):(\d{2})(?::(\d{2})(?:[.,](\d{1,9}))?)?)?\s*(z|[+-]\d{2}(?::?\d{2})?)?$",
    )
    .unwrap(),
    four_digit_year: Regex::new(r"\b\d{4}\b").unwrap(),
    ordinal_suffix: Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap(),
});
