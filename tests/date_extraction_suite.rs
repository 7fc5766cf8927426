//! Fixture-driven tests over realistic pages.
//!
//! Each directory under tests/test-pages/ holds a `source.html` and an
//! `expected-metadata.json` with the expected date and, optionally, the
//! response headers the page is served with.

use pagedate::{
    extract_date, extract_metadata, parse_html, ExtractOptions, JsonLdBlock, MetadataKind,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Expected outcome for a test page
#[derive(Debug, Deserialize)]
struct ExpectedMetadata {
    date: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

/// A single test page
struct TestCase {
    name: String,
    source_html: String,
    expected_metadata: ExpectedMetadata,
}

impl TestCase {
    fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or("Invalid test case name")?
            .to_string();

        let source_html = fs::read_to_string(path.join("source.html"))?;
        let expected_metadata: ExpectedMetadata =
            serde_json::from_str(&fs::read_to_string(path.join("expected-metadata.json"))?)?;

        Ok(TestCase {
            name,
            source_html,
            expected_metadata,
        })
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.expected_metadata.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        headers
    }
}

fn load_test_cases() -> Vec<TestCase> {
    let test_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-pages");

    let mut test_cases: Vec<TestCase> = fs::read_dir(&test_dir)
        .expect("test-pages directory is missing")
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            TestCase::load(&entry.path())
                .unwrap_or_else(|e| panic!("Failed to load test case {:?}: {}", entry.path(), e))
        })
        .collect();

    test_cases.sort_by(|a, b| a.name.cmp(&b.name));
    test_cases
}

#[test]
fn test_pages_extract_expected_dates() {
    let test_cases = load_test_cases();
    assert!(!test_cases.is_empty());

    let mut failures = Vec::new();
    for test_case in &test_cases {
        let document = parse_html(&test_case.source_html);
        let actual = extract_metadata(&document, &test_case.headers(), &MetadataKind::Date);

        if actual != test_case.expected_metadata.date {
            failures.push(format!(
                "{}: expected {:?}, got {:?}",
                test_case.name, test_case.expected_metadata.date, actual
            ));
        }
    }

    assert!(failures.is_empty(), "mismatches:\n{}", failures.join("\n"));
}

#[test]
fn test_truncated_page_uses_rescued_block() {
    let test_case = load_test_cases()
        .into_iter()
        .find(|case| case.name == "truncated-jsonld")
        .unwrap();

    let document = parse_html(&test_case.source_html);
    assert_eq!(document.json_ld.len(), 1);
    assert!(matches!(document.json_ld[0], JsonLdBlock::Rescued(_)));
}

#[test]
fn test_extraction_is_stable_under_truncation() {
    // Cutting a page anywhere must never panic, whatever is left of it.
    for test_case in load_test_cases() {
        let html = &test_case.source_html;
        for end in (0..=html.len()).filter(|end| html.is_char_boundary(*end)) {
            let document = parse_html(&html[..end]);
            let _ = extract_metadata(&document, &HeaderMap::new(), &MetadataKind::Date);
        }
    }
}

#[tokio::test]
async fn test_pages_served_over_http() {
    let mut server = mockito::Server::new_async().await;

    for test_case in load_test_cases() {
        let path = format!("/{}", test_case.name);
        let mut mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8");
        for (name, value) in &test_case.expected_metadata.headers {
            mock = mock.with_header(name.as_str(), value.as_str());
        }
        let _mock = mock
            .with_body(test_case.source_html.clone())
            .create_async()
            .await;

        let url = format!("{}{}", server.url(), path);
        let actual = extract_date(&url, &ExtractOptions::default()).await.unwrap();

        assert_eq!(actual, test_case.expected_metadata.date, "{}", test_case.name);
    }
}
