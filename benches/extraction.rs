use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pagedate::{extract_metadata, normalize_date, parse_html, MetadataKind};
use reqwest::header::HeaderMap;
use std::fs;
use std::path::Path;

fn load_test_case(name: &str) -> Option<String> {
    let path = Path::new("tests/test-pages").join(name).join("source.html");
    fs::read_to_string(&path).ok()
}

/// A page whose date sits behind a large inline script, like most news sites
fn padded_page(html: &str, padding: usize) -> String {
    format!(
        "<html><head><script>{}</script>{}",
        "var x = 1;".repeat(padding / 10),
        html
    )
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let test_cases = ["news-graph-jsonld", "truncated-jsonld", "blog-time-tags", "no-date"];

    for name in test_cases {
        let html = match load_test_case(name) {
            Some(h) => padded_page(&h, 32 * 1024),
            None => continue,
        };

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("doc", name), &html, |b, html| {
            b.iter(|| std::hint::black_box(parse_html(std::hint::black_box(html))));
        });
    }

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let headers = HeaderMap::new();

    for name in ["news-graph-jsonld", "blog-time-tags"] {
        let document = match load_test_case(name) {
            Some(h) => parse_html(&h),
            None => continue,
        };

        group.bench_with_input(BenchmarkId::new("date", name), &document, |b, document| {
            b.iter(|| extract_metadata(document, &headers, &MetadataKind::Date));
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    let inputs = [
        ("rfc3339", "2024-01-20T12:00:00+02:00"),
        ("rfc2822", "Wed, 21 Oct 2015 07:28:00 GMT"),
        ("prefixed", "Posted on Jan 22, 2024 | News"),
        ("garbage", "not a date at all"),
    ];

    for (name, input) in inputs {
        group.bench_with_input(BenchmarkId::new("input", name), input, |b, input| {
            b.iter(|| normalize_date(std::hint::black_box(input)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_extract, bench_normalize);
criterion_main!(benches);
