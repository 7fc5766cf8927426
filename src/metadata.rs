//! Metadata extraction over a parsed document and response headers.
//!
//! Dates are looked up in four tiers, most reliable first:
//!
//! 1. JSON-LD structured data (`datePublished`, `dateModified`, `pubDate`,
//!    `publishedAt`, searched depth-first through arrays and `@graph`)
//! 2. Meta tags (OpenGraph, article, Dublin Core and friends)
//! 3. `<time>` elements
//! 4. The `Last-Modified` response header
//!
//! Tiers 1, 2 and 4 contribute a single candidate each; the time tier tries
//! every element in order. The first candidate that normalizes wins.

use crate::constants::{JSON_LD_DATE_KEYS, META_DATE_NAMES};
use crate::date::normalize_date;
use crate::fetcher::FetchOutcome;
use crate::parser::{parse_html, JsonLdBlock, ParsedDocument};
use reqwest::header::{HeaderMap, LAST_MODIFIED};
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Kind of metadata to extract.
///
/// Only [`MetadataKind::Date`] is implemented; any other kind yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    /// Publication or modification date
    Date,
    /// A kind without an extractor yet
    Other(String),
}

impl FromStr for MetadataKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("date") {
            Ok(MetadataKind::Date)
        } else {
            Ok(MetadataKind::Other(s.to_string()))
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKind::Date => f.write_str("date"),
            MetadataKind::Other(name) => f.write_str(name),
        }
    }
}

/// Parse the fetched content and extract the requested metadata.
pub fn extract_metadata_from(outcome: &FetchOutcome, kind: &MetadataKind) -> Option<String> {
    let document = parse_html(&outcome.content);
    extract_metadata(&document, &outcome.headers, kind)
}

/// Extract the requested metadata from an already parsed document.
///
/// ```rust
/// use pagedate::{extract_metadata, parse_html, MetadataKind};
/// use reqwest::header::HeaderMap;
///
/// let document = parse_html(r#"<meta name="date" content="2024-01-05">"#);
/// let date = extract_metadata(&document, &HeaderMap::new(), &MetadataKind::Date);
/// assert_eq!(date.as_deref(), Some("2024-01-05T00:00:00.000Z"));
///
/// let other = extract_metadata(&document, &HeaderMap::new(), &"title".parse().unwrap());
/// assert_eq!(other, None);
/// ```
pub fn extract_metadata(
    document: &ParsedDocument,
    headers: &HeaderMap,
    kind: &MetadataKind,
) -> Option<String> {
    match kind {
        MetadataKind::Date => get_date_metadata(document, headers),
        MetadataKind::Other(name) => {
            debug!(kind = %name, "no extractor for metadata kind");
            None
        }
    }
}

fn get_date_metadata(document: &ParsedDocument, headers: &HeaderMap) -> Option<String> {
    if let Some(date) = normalize_date(find_date_in_json_ld(&document.json_ld)) {
        debug!(source = "json-ld", %date, "found date");
        return Some(date);
    }

    if let Some(date) = normalize_date(find_date_in_meta(&document.meta)) {
        debug!(source = "meta", %date, "found date");
        return Some(date);
    }

    for tag in &document.time_tags {
        let candidate = tag
            .datetime
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(tag.text.as_str());
        if let Some(date) = normalize_date(candidate) {
            debug!(source = "time", %date, "found date");
            return Some(date);
        }
    }

    // The generic Date header is when the response was sent, not when the
    // content was written, so only Last-Modified is considered.
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|value| value.to_str().ok());
    let date = normalize_date(last_modified);
    if let Some(date) = &date {
        debug!(source = "last-modified", %date, "found date");
    }
    date
}

/// First date string in the JSON-LD blocks, in depth-first order.
fn find_date_in_json_ld(blocks: &[JsonLdBlock]) -> Option<&str> {
    blocks.iter().find_map(|block| match block {
        JsonLdBlock::Parsed(value) => find_date_in_value(value),
        JsonLdBlock::Rescued(rescued) => JSON_LD_DATE_KEYS.iter().find_map(|key| rescued.get(key)),
    })
}

fn find_date_in_value(value: &Value) -> Option<&str> {
    match value {
        Value::Array(items) => items.iter().find_map(find_date_in_value),
        Value::Object(object) => {
            if let Some(date) = JSON_LD_DATE_KEYS
                .iter()
                .find_map(|key| non_empty_str(object.get(*key)))
            {
                return Some(date);
            }

            match object.get("@graph") {
                Some(graph @ Value::Array(_)) => find_date_in_value(graph),
                _ => None,
            }
        }
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn find_date_in_meta(meta: &HashMap<String, String>) -> Option<&str> {
    META_DATE_NAMES
        .iter()
        .find_map(|name| meta.get(*name).filter(|value| !value.is_empty()))
        .map(String::as_str)
}
