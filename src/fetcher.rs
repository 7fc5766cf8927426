//! Bounded HTTP retrieval.
//!
//! [`fetch_partial`] downloads at most a byte budget of a page body and
//! decodes it with the charset from `Content-Type`. [`fetch_headers`] issues a
//! `HEAD` request and returns only the response headers.
//!
//! Neither function reports network trouble as an error. A failed request
//! yields `Ok(None)`, and a body that breaks off mid-stream yields whatever
//! was decoded up to that point. `Err` is reserved for invalid arguments.
//!
//! ## Cancellation
//!
//! One deadline covers the whole exchange: sending the request, waiting for
//! the headers and every body read. The byte budget is checked after each
//! chunk. Whichever is hit first ends the transfer, and dropping the
//! [`reqwest::Response`] closes the connection.

use crate::constants::{
    DEFAULT_FETCH_TIMEOUT_MS, DEFAULT_HEAD_TIMEOUT_MS, DEFAULT_USER_AGENT, REGEXPS,
};
use crate::error::{ExtractError, Result};
use crate::options::FetchOptions;
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, warn};
use url::Url;

/// Decoded body prefix and the response headers it came with
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Decoded text, possibly cut off mid-document
    pub content: String,
    /// Response headers
    pub headers: HeaderMap,
}

/// Fetch at most `max_bytes` of the body at `url`.
///
/// Returns `Ok(None)` when the request fails before any content arrives, the
/// status is not a success, or the status carries no body. Hitting the byte
/// budget is not a failure; the decoded prefix is returned. The budget counts
/// raw bytes off the wire, and the chunk that crosses it is kept whole.
///
/// # Errors
///
/// [`ExtractError::InvalidByteBudget`] for a zero budget,
/// [`ExtractError::InvalidTimeout`] for a zero timeout,
/// [`ExtractError::InvalidHeader`] for an illegal extra header and
/// [`ExtractError::Client`] when no HTTP client can be built.
pub async fn fetch_partial(
    url: &str,
    max_bytes: usize,
    options: &FetchOptions,
) -> Result<Option<FetchOutcome>> {
    if max_bytes == 0 {
        return Err(ExtractError::InvalidByteBudget);
    }
    let wait = options.timeout_or(Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS))?;
    let request_headers = request_headers(options)?;
    let client = build_client()?;

    let Some(url) = parse_url(url) else {
        return Ok(None);
    };

    debug!(%url, max_bytes, timeout_ms = wait.as_millis() as u64, "starting partial fetch");
    let deadline = Instant::now() + wait;

    let request = client.get(url).headers(request_headers).send();
    let mut response = match timeout_at(deadline, request).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            debug!(error = %e, "request failed");
            return Ok(None);
        }
        Err(_) => {
            debug!("timed out waiting for response headers");
            return Ok(None);
        }
    };

    let status = response.status();
    if !status.is_success() || !has_body(status) {
        debug!(%status, "no usable body");
        return Ok(None);
    }

    let headers = response.headers().clone();
    let mut decoder = StreamDecoder::new(encoding_for(headers.get(CONTENT_TYPE)));
    let mut received = 0usize;

    loop {
        match timeout_at(deadline, response.chunk()).await {
            Ok(Ok(Some(chunk))) => {
                received += chunk.len();
                decoder.push(&chunk);
                if received >= max_bytes {
                    debug!(received, max_bytes, "byte budget reached, aborting transfer");
                    break;
                }
            }
            Ok(Ok(None)) => {
                decoder.finish();
                break;
            }
            Ok(Err(e)) => {
                debug!(error = %e, received, "body stream failed");
                return Ok(decoder.into_partial(headers));
            }
            Err(_) => {
                debug!(received, "timed out while reading body");
                return Ok(decoder.into_partial(headers));
            }
        }
    }

    drop(response);

    Ok(Some(FetchOutcome {
        content: decoder.into_string(),
        headers,
    }))
}

/// Send a `HEAD` request and return the response headers.
///
/// Any status is accepted, since headers of error responses can still be
/// informative. `Ok(None)` means the request itself failed or timed out
/// (5 seconds unless configured).
pub async fn fetch_headers(url: &str, options: &FetchOptions) -> Result<Option<HeaderMap>> {
    let wait = options.timeout_or(Duration::from_millis(DEFAULT_HEAD_TIMEOUT_MS))?;
    let request_headers = request_headers(options)?;
    let client = build_client()?;

    let Some(url) = parse_url(url) else {
        return Ok(None);
    };

    debug!(%url, "probing headers");
    match timeout(wait, client.head(url).headers(request_headers).send()).await {
        Ok(Ok(response)) => Ok(Some(response.headers().clone())),
        Ok(Err(e)) => {
            debug!(error = %e, "header probe failed");
            Ok(None)
        }
        Err(_) => {
            debug!("header probe timed out");
            Ok(None)
        }
    }
}

fn build_client() -> Result<Client> {
    Client::builder()
        .build()
        .map_err(|e| ExtractError::Client(e.to_string()))
}

fn parse_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!(url = raw, error = %e, "invalid URL");
            None
        }
    }
}

/// Default user agent with the caller's headers layered on top
fn request_headers(options: &FetchOptions) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    for (name, value) in options.header_map()? {
        if let Some(name) = name {
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

fn has_body(status: StatusCode) -> bool {
    !matches!(status, StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT)
}

/// Encoding named by the `charset` parameter, UTF-8 when absent or unknown
fn encoding_for(content_type: Option<&HeaderValue>) -> &'static Encoding {
    let label = content_type
        .and_then(|value| value.to_str().ok())
        .and_then(|value| REGEXPS.charset.captures(value))
        .map(|caps| caps[1].to_string());

    match label {
        None => UTF_8,
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            warn!(charset = %label, "unknown charset, decoding as UTF-8");
            UTF_8
        }),
    }
}

/// Incremental decoder that keeps partial multi-byte sequences between chunks
struct StreamDecoder {
    decoder: Decoder,
    content: String,
}

impl StreamDecoder {
    fn new(encoding: &'static Encoding) -> Self {
        Self {
            decoder: encoding.new_decoder_with_bom_removal(),
            content: String::new(),
        }
    }

    fn push(&mut self, bytes: &[u8]) {
        self.decode(bytes, false);
    }

    /// Flush a dangling sequence at the natural end of the body
    fn finish(&mut self) {
        self.decode(&[], true);
    }

    fn decode(&mut self, mut bytes: &[u8], last: bool) {
        loop {
            let needed = self
                .decoder
                .max_utf8_buffer_length(bytes.len())
                .unwrap_or(bytes.len().saturating_mul(3).saturating_add(16));
            self.content.reserve(needed);

            let (result, read, _) = self.decoder.decode_to_string(bytes, &mut self.content, last);
            bytes = &bytes[read..];

            if let CoderResult::InputEmpty = result {
                break;
            }
        }
    }

    /// Content decoded before a failure, if there is any
    fn into_partial(self, headers: HeaderMap) -> Option<FetchOutcome> {
        if self.content.is_empty() {
            None
        } else {
            Some(FetchOutcome {
                content: self.content,
                headers,
            })
        }
    }

    fn into_string(self) -> String {
        self.content
    }
}
