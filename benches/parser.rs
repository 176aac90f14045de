//! Performance benchmarks for the CommonMark core parser.
//!
//! Benchmarks block parsing over representative structures, inline parsing
//! at several complexity levels, and scaling with document size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use markdoxide::{parse, parse_inlines};

/// Benchmark block parsing with various structures.
fn bench_block_structures(c: &mut Criterion) {
    let paragraph = "This is a simple paragraph.\n";
    let header = "# Title\n\nParagraph content.\n";
    let fenced = "```\ncode block\n```\n";
    let nested_list = "- Item 1\n  - Nested 1\n  - Nested 2\n- Item 2\n";
    let complex_doc = r"# Document Title

## Section One

This is the first paragraph, with *emphasis* and `code`.

```rust
fn example() {}
```

## Section Two

- List item 1
- List item 2
  - Nested item

> A quoted paragraph
> across two lines.

---
";

    let inputs = [
        ("single_paragraph", paragraph),
        ("header_with_paragraph", header),
        ("fenced_code", fenced),
        ("nested_list", nested_list),
        ("complex_document", complex_doc),
    ];

    let mut group = c.benchmark_group("block_structures");

    for (name, content) in inputs {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", name), &content, |b, input| {
            b.iter(|| parse(black_box(input)));
        });
    }

    group.finish();
}

/// Benchmark inline parsing with various complexity levels.
fn bench_inline_complexity(c: &mut Criterion) {
    let long_100 = "word ".repeat(100);
    let long_1000 = "word ".repeat(1000);

    let inputs: Vec<(&str, &str)> = vec![
        ("plain_text", "This is plain text without any formatting."),
        ("single_emphasis", "This has *emphasized* text."),
        ("nested_spans", "This has *emphasis with **strong** inside*."),
        (
            "mixed_constructs",
            "Has *emphasis*, `code`, <http://example.com>, and &amp; together.",
        ),
        ("long_text_100", &long_100),
        ("long_text_1000", &long_1000),
    ];

    let mut group = c.benchmark_group("inline_complexity");

    for (name, content) in inputs {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_inlines", name), &content, |b, input| {
            b.iter(|| parse_inlines(black_box(input)));
        });
    }

    group.finish();
}

/// Benchmark scaling behavior with increasing document size.
fn bench_scaling(c: &mut Criterion) {
    let base_paragraph = "A paragraph with *emphasis* and `code` spans.\n\n";

    let mut group = c.benchmark_group("scaling");

    for size in [10, 50, 100, 500] {
        let content = base_paragraph.repeat(size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("paragraphs", size), &content, |b, input| {
            b.iter(|| parse(black_box(input)));
        });
    }

    group.finish();
}

/// Benchmark worst-case inline patterns.
fn bench_inline_edge_cases(c: &mut Criterion) {
    let unclosed_emphasis = "*not closed ".repeat(10);
    let mixed_unclosed = "*a _b `c ".repeat(10);
    let many_escapes = r"\*not\* \*emphasis\* ".repeat(50);
    let alternating = "*a* b *c* d *e* f ".repeat(50);

    let inputs: Vec<(&str, String)> = vec![
        ("unclosed_emphasis_10x", unclosed_emphasis),
        ("mixed_unclosed_10x", mixed_unclosed),
        ("many_escapes_50x", many_escapes),
        ("alternating_spans_50x", alternating),
    ];

    let mut group = c.benchmark_group("inline_edge_cases");

    for (name, content) in &inputs {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("parse_inlines", name),
            content.as_str(),
            |b, input| {
                b.iter(|| parse_inlines(black_box(input)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_block_structures,
    bench_inline_complexity,
    bench_scaling,
    bench_inline_edge_cases,
);

criterion_main!(benches);
