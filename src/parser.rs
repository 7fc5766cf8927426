//! Lenient structural parsing of raw, possibly truncated HTML.
//!
//! The parser does not build a DOM. It scans the text for the three
//! structures that carry dates (meta tags, JSON-LD script blocks and `<time>`
//! elements) and records what it finds without interpreting it. Anything it
//! cannot make sense of is skipped, so parsing never fails.
//!
//! ## Example
//!
//! ```rust
//! use pagedate::parse_html;
//!
//! let html = r#"
//!     <meta property="article:published_time" content="2024-01-20T08:00:00Z">
//!     <time datetime="2024-01-19">Yesterday</time>
//! "#;
//!
//! let document = parse_html(html);
//! assert_eq!(
//!     document.meta.get("article:published_time").map(String::as_str),
//!     Some("2024-01-20T08:00:00Z")
//! );
//! assert_eq!(document.time_tags[0].datetime.as_deref(), Some("2024-01-19"));
//! ```

use crate::constants::REGEXPS;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Meta attributes that name a tag, in the order they are consulted
const META_KEY_ATTRIBUTES: [&str; 3] = ["name", "property", "itemprop"];

/// Structures collected from a document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    /// Meta tag contents keyed by lowercased `name`/`property`/`itemprop`.
    /// A later tag with the same key replaces an earlier one.
    pub meta: HashMap<String, String>,

    /// JSON-LD blocks in document order
    pub json_ld: Vec<JsonLdBlock>,

    /// `<time>` elements in document order
    pub time_tags: Vec<TimeTag>,
}

/// A JSON-LD script block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonLdBlock {
    /// The block was valid JSON
    Parsed(Value),
    /// The block was invalid (usually cut off by the byte budget) but date
    /// fields could be pulled out of the raw text
    Rescued(RescuedJsonLd),
}

/// Date fields recovered from a JSON-LD block that failed to parse.
///
/// Only `datePublished`, `dateModified`, `pubDate` and `publishedAt` are
/// ever present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RescuedJsonLd {
    fields: Map<String, Value>,
}

impl RescuedJsonLd {
    /// Value recovered for `key`, if any
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Whether no date key was recovered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of recovered date keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// A `<time>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeTag {
    /// The `datetime` attribute, when present
    pub datetime: Option<String>,
    /// Inner text with nested markup removed and whitespace trimmed
    pub text: String,
}

/// Parse raw HTML into a [`ParsedDocument`].
///
/// Works on fragments and truncated input; malformed pieces are ignored.
pub fn parse_html(html: &str) -> ParsedDocument {
    ParsedDocument {
        meta: parse_meta_tags(html),
        json_ld: parse_json_ld_blocks(html),
        time_tags: parse_time_tags(html),
    }
}

fn parse_meta_tags(html: &str) -> HashMap<String, String> {
    let mut meta = HashMap::new();

    for caps in REGEXPS.meta_tag.captures_iter(html) {
        let attrs = parse_attributes(&caps[1]);

        let key = META_KEY_ATTRIBUTES
            .iter()
            .find_map(|name| attrs.get(*name).filter(|value| !value.is_empty()));
        let content = attrs.get("content").filter(|value| !value.is_empty());

        if let (Some(key), Some(content)) = (key, content) {
            meta.insert(key.to_lowercase(), content.clone());
        }
    }

    meta
}

fn parse_json_ld_blocks(html: &str) -> Vec<JsonLdBlock> {
    REGEXPS
        .json_ld_script
        .captures_iter(html)
        .filter_map(|caps| parse_json_ld(&caps[1]))
        .collect()
}

/// Parse the body of a JSON-LD script, falling back to [`rescue_json_ld`].
fn parse_json_ld(raw: &str) -> Option<JsonLdBlock> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Some(JsonLdBlock::Parsed(value)),
        Err(e) => match rescue_json_ld(raw) {
            Some(rescued) => {
                debug!(error = %e, fields = rescued.len(), "rescued dates from invalid JSON-LD");
                Some(JsonLdBlock::Rescued(rescued))
            }
            None => {
                debug!(error = %e, "skipping invalid JSON-LD block");
                None
            }
        },
    }
}

/// Pull `"key": "value"` pairs for the known date keys out of text that is
/// not valid JSON.
///
/// Each key is matched independently against the raw text (first match wins,
/// key case ignored). This is not a JSON repair: nesting, escapes and
/// context are all disregarded. Returns `None` if no key matched.
pub fn rescue_json_ld(raw: &str) -> Option<RescuedJsonLd> {
    let mut rescued = RescuedJsonLd::default();

    for (key, regex) in &REGEXPS.rescue_keys {
        if let Some(caps) = regex.captures(raw) {
            rescued
                .fields
                .insert((*key).to_string(), Value::String(caps[1].to_string()));
        }
    }

    if rescued.is_empty() {
        None
    } else {
        Some(rescued)
    }
}

fn parse_time_tags(html: &str) -> Vec<TimeTag> {
    REGEXPS
        .time_tag
        .captures_iter(html)
        .map(|caps| {
            let datetime = caps
                .get(1)
                .and_then(|attrs| parse_attributes(attrs.as_str()).remove("datetime"));
            let text = REGEXPS.markup.replace_all(&caps[2], "").trim().to_string();
            TimeTag { datetime, text }
        })
        .collect()
}

/// Parse the attribute section of a tag.
///
/// Names are lowercased; values may be double-quoted, single-quoted or
/// unquoted. A bare attribute gets an empty value. Later duplicates win.
pub fn parse_attributes(tag_content: &str) -> HashMap<String, String> {
    REGEXPS
        .attribute
        .captures_iter(tag_content)
        .map(|caps| {
            let name = caps[1].to_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            (name, value)
        })
        .collect()
}
