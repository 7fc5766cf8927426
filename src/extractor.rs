//! High-level entry points that fetch a page and return its date.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pagedate::{extract_date, ExtractOptions};
//!
//! # async fn demo() -> pagedate::Result<()> {
//! let options = ExtractOptions::default();
//! match extract_date("https://example.com/article", &options).await? {
//!     Some(date) => println!("published {}", date),
//!     None => println!("no date found"),
//! }
//! # Ok(())
//! # }
//! ```

use crate::date::normalize_date;
use crate::error::Result;
use crate::fetcher::{fetch_headers, fetch_partial};
use crate::metadata::{extract_metadata_from, MetadataKind};
use crate::options::{ExtractOptions, FetchOptions};
use reqwest::header::LAST_MODIFIED;
use tracing::{debug, instrument};

/// Fetch the first `options.max_bytes` of `url` and extract its publication
/// or modification date.
///
/// Returns `Ok(Some(date))` with a canonical UTC timestamp such as
/// `2024-01-20T12:00:00.000Z`, or `Ok(None)` when the page could not be
/// fetched or carries no usable date.
///
/// # Errors
///
/// Only invalid options are errors: a zero byte budget, a zero timeout or an
/// illegal extra header. Network and content problems always become
/// `Ok(None)`.
#[instrument(level = "debug", skip(options), fields(max_bytes = options.max_bytes))]
pub async fn extract_date(url: &str, options: &ExtractOptions) -> Result<Option<String>> {
    let Some(outcome) = fetch_partial(url, options.max_bytes, &options.fetch).await? else {
        debug!("nothing fetched");
        return Ok(None);
    };

    Ok(extract_metadata_from(&outcome, &MetadataKind::Date))
}

/// Date from the `Last-Modified` header of a `HEAD` response.
///
/// Cheaper than [`extract_date`] because no body is transferred, but only
/// useful for servers that report a meaningful `Last-Modified`.
#[instrument(level = "debug", skip(options))]
pub async fn probe_last_modified(url: &str, options: &FetchOptions) -> Result<Option<String>> {
    let Some(headers) = fetch_headers(url, options).await? else {
        return Ok(None);
    };

    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|value| value.to_str().ok());
    Ok(normalize_date(last_modified))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use mockito::Server;
    use std::time::Duration;

    #[tokio::test]
    async fn test_extract_date_from_served_page() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/article")
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
            .with_body(
                r#"<html><head>
                    <meta property="article:published_time" content="2024-01-20T12:00:00+01:00">
                </head><body><p>Hello</p></body></html>"#,
            )
            .create_async()
            .await;

        let date = extract_date(&format!("{}/article", server.url()), &ExtractOptions::default())
            .await
            .unwrap();

        assert_eq!(date, Some("2024-01-20T11:00:00.000Z".to_string()));
    }

    #[tokio::test]
    async fn test_extract_date_falls_back_to_last_modified() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT")
            .with_header("date", "Thu, 01 Feb 2024 00:00:00 GMT")
            .with_body("<html><body>plain</body></html>")
            .create_async()
            .await;

        let date = extract_date(&server.url(), &ExtractOptions::default())
            .await
            .unwrap();

        assert_eq!(date, Some("2015-10-21T07:28:00.000Z".to_string()));
    }

    #[tokio::test]
    async fn test_date_past_the_budget_is_not_seen() {
        let mut server = Server::new_async().await;
        let body = format!(
            "<html><body>{}<time datetime=\"2024-01-01\">New year</time></body></html>",
            "x".repeat(200_000)
        );
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let options = ExtractOptions::builder().max_bytes(2048).build();
        let date = extract_date(&server.url(), &options).await.unwrap();

        assert_eq!(date, None);
    }

    #[tokio::test]
    async fn test_extract_date_network_failure_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let date = extract_date(&server.url(), &ExtractOptions::default())
            .await
            .unwrap();
        assert_eq!(date, None);
    }

    #[tokio::test]
    async fn test_extract_date_rejects_zero_budget() {
        let options = ExtractOptions::builder().max_bytes(0).build();
        let result = extract_date("http://localhost/", &options).await;
        assert!(matches!(result, Err(ExtractError::InvalidByteBudget)));
    }

    #[tokio::test]
    async fn test_probe_last_modified() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("HEAD", "/")
            .with_status(200)
            .with_header("last-modified", "Tue, 15 Nov 1994 12:45:26 GMT")
            .create_async()
            .await;

        let options = FetchOptions {
            timeout: Some(Duration::from_secs(2)),
            headers: Vec::new(),
        };
        let date = probe_last_modified(&server.url(), &options).await.unwrap();

        assert_eq!(date, Some("1994-11-15T12:45:26.000Z".to_string()));
    }
}
