//! Configuration options for fetching and extraction.
//!
//! This module provides [`FetchOptions`], [`ExtractOptions`] and the
//! [`ExtractOptionsBuilder`] used to configure a date extraction call.
//!
//! ## Example
//!
//! ```rust
//! use pagedate::ExtractOptions;
//! use std::time::Duration;
//!
//! // Using default options
//! let options = ExtractOptions::default();
//! assert_eq!(options.max_bytes, 32768);
//!
//! // Using builder for custom options
//! let options = ExtractOptions::builder()
//!     .max_bytes(16 * 1024)
//!     .timeout(Duration::from_secs(3))
//!     .header("Accept-Language", "en")
//!     .build();
//! assert_eq!(options.max_bytes, 16384);
//! ```

use crate::constants::DEFAULT_MAX_BYTES;
use crate::error::{ExtractError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Options for a single network request.
///
/// The default timeout differs per request kind, so `timeout` stays `None`
/// unless the caller sets it: partial fetches wait 10 seconds, header probes 5.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Overall deadline for the request, including reading the body.
    ///
    /// Default: `None` (10s for partial fetches, 5s for header probes)
    pub timeout: Option<Duration>,

    /// Extra request headers.
    ///
    /// Applied after the default `User-Agent`, so a `User-Agent` entry here
    /// replaces it.
    ///
    /// Default: empty
    pub headers: Vec<(String, String)>,
}

impl FetchOptions {
    /// Resolve the effective timeout, rejecting a zero duration.
    pub(crate) fn timeout_or(&self, default: Duration) -> Result<Duration> {
        match self.timeout {
            Some(timeout) if timeout.is_zero() => Err(ExtractError::InvalidTimeout),
            Some(timeout) => Ok(timeout),
            None => Ok(default),
        }
    }

    /// Convert the extra headers into a [`HeaderMap`], later entries winning.
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ExtractError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ExtractError::InvalidHeader(name.as_str().to_string()))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// Options for [`extract_date`](crate::extract_date).
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum number of body bytes to download.
    ///
    /// 32 KiB is usually enough to cover the `<head>` of a page, where almost
    /// all date metadata lives. Must be greater than zero.
    ///
    /// Default: `32768`
    pub max_bytes: usize,

    /// Request options forwarded to the fetcher.
    pub fetch: FetchOptions,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            fetch: FetchOptions::default(),
        }
    }
}

impl ExtractOptions {
    /// Creates a new builder for ExtractOptions
    pub fn builder() -> ExtractOptionsBuilder {
        ExtractOptionsBuilder::default()
    }
}

/// Builder for [`ExtractOptions`].
///
/// ## Example
///
/// ```rust
/// use pagedate::ExtractOptions;
/// use std::time::Duration;
///
/// let options = ExtractOptions::builder()
///     .max_bytes(8192)
///     .timeout(Duration::from_millis(2500))
///     .header("User-Agent", "my-crawler/1.0")
///     .build();
///
/// assert_eq!(options.fetch.timeout, Some(Duration::from_millis(2500)));
/// assert_eq!(options.fetch.headers.len(), 1);
/// ```
#[derive(Default)]
pub struct ExtractOptionsBuilder {
    max_bytes: Option<usize>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
}

impl ExtractOptionsBuilder {
    /// Set the byte budget
    pub fn max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add an extra request header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Build the ExtractOptions
    pub fn build(self) -> ExtractOptions {
        let defaults = ExtractOptions::default();
        ExtractOptions {
            max_bytes: self.max_bytes.unwrap_or(defaults.max_bytes),
            fetch: FetchOptions {
                timeout: self.timeout,
                headers: self.headers,
            },
        }
    }
}
