//! # pagedate
//!
//! Best-effort extraction of a web page's publication or modification date
//! from the first few kilobytes of the page.
//!
//! ## Overview
//!
//! Ranking and display code often needs to know *when* a page was written,
//! but downloading whole pages for that is wasteful. Dates nearly always live
//! in the `<head>`, so pagedate streams only a bounded prefix of the body
//! (32 KiB by default), scans it leniently and normalizes whatever date it
//! finds into a canonical UTC timestamp.
//!
//! ## Key Features
//!
//! - **Partial Fetching**: Stops the transfer once the byte budget or the timeout is hit
//! - **Charset Aware**: Decodes incrementally using the charset from `Content-Type`
//! - **Lenient Parsing**: Meta tags, JSON-LD (even when cut off mid-block) and `<time>` tags
//! - **Tiered Extraction**: JSON-LD, then meta tags, then `<time>`, then `Last-Modified`
//! - **Normalization**: ISO-8601, RFC 2822 and common English forms to `YYYY-MM-DDTHH:MM:SS.mmmZ`
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use pagedate::{extract_date, ExtractOptions};
//!
//! # async fn demo() -> pagedate::Result<()> {
//! let date = extract_date("https://example.com/article", &ExtractOptions::default()).await?;
//! println!("{:?}", date); // Some("2024-01-20T12:00:00.000Z")
//! # Ok(())
//! # }
//! ```
//!
//! ## Working Offline
//!
//! The pipeline stages are public, so HTML obtained elsewhere can go straight
//! to the parser and extractor:
//!
//! ```rust
//! use pagedate::{extract_metadata, parse_html, MetadataKind};
//! use reqwest::header::HeaderMap;
//!
//! let html = r#"<script type="application/ld+json">{"datePublished": "2024-06-01"}</script>"#;
//! let document = parse_html(html);
//! let date = extract_metadata(&document, &HeaderMap::new(), &MetadataKind::Date);
//! assert_eq!(date.as_deref(), Some("2024-06-01T00:00:00.000Z"));
//! ```
//!
//! ## Error Handling
//!
//! Failing to find a date is not an error. Timeouts, refused connections,
//! error statuses, broken markup and unparseable dates all end in `Ok(None)`.
//! Only invalid arguments are reported:
//!
//! ```rust,no_run
//! use pagedate::{extract_date, ExtractError, ExtractOptions};
//!
//! # async fn demo() {
//! let options = ExtractOptions::builder().max_bytes(0).build();
//!
//! match extract_date("https://example.com", &options).await {
//!     Ok(date) => println!("{:?}", date),
//!     Err(ExtractError::InvalidByteBudget) => eprintln!("budget must be positive"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! # }
//! ```
//!
//! ## Logging
//!
//! Diagnostics are emitted as [`tracing`] events at `debug` and `trace`
//! level (which tier produced a date, budget aborts, rescued JSON-LD). Install
//! any subscriber to see them.

mod constants;
mod date;
mod error;
mod extractor;
mod fetcher;
mod metadata;
mod options;
mod parser;

// Public exports
pub use constants::{DEFAULT_MAX_BYTES, DEFAULT_USER_AGENT};
pub use date::{format_iso_millis, normalize_date, parse_date};
pub use error::{ExtractError, Result};
pub use extractor::{extract_date, probe_last_modified};
pub use fetcher::{fetch_headers, fetch_partial, FetchOutcome};
pub use metadata::{extract_metadata, extract_metadata_from, MetadataKind};
pub use options::{ExtractOptions, ExtractOptionsBuilder, FetchOptions};
pub use parser::{
    parse_attributes, parse_html, rescue_json_ld, JsonLdBlock, ParsedDocument, RescuedJsonLd,
    TimeTag,
};
