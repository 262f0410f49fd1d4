//! Benchmarks for the FB2 → Markdown pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use fb2md::dom::parse_document;
use fb2md::export::AssetTable;
use fb2md::markdown::render_book;
use fb2md::{ConvertOptions, FictionBook, convert_bytes};

const SAMPLE: &[u8] = include_bytes!("../tests/fixtures/sample.fb2");

/// Build a book with `chapters` sections, each citing one footnote and
/// holding a poem, a table and a few paragraphs.
fn synthetic_book(chapters: usize) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?>
<FictionBook xmlns:l="http://www.w3.org/1999/xlink">
<description><title-info><book-title>Bench</book-title></title-info></description>
<body>"#,
    );

    for i in 0..chapters {
        let _ = write!(
            xml,
            r##"<section><title><p>Chapter {i}</p></title>
<epigraph><p>Epigraph {i}</p><text-author>Someone</text-author></epigraph>
<p>Paragraph with <emphasis>emphasis</emphasis> and a note<a l:href="#n{i}" type="note">{i}</a>.</p>
<p>Another paragraph with <strong>strong</strong> text and <a l:href="http://example.com">a link</a>.</p>
<poem><stanza><v>First verse</v><v>Second verse</v></stanza></poem>
<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>
<section><title><p>Part {i}.1</p></title><p>Nested text.</p></section>
</section>"##
        );
    }

    xml.push_str(r#"</body><body name="notes">"#);
    for i in 0..chapters {
        let _ = write!(xml, r#"<section id="n{i}"><title><p>{i}</p></title><p>Note {i}.</p></section>"#);
    }
    xml.push_str("</body></FictionBook>");
    xml
}

fn bench_parse(c: &mut Criterion) {
    let xml = synthetic_book(200);
    c.bench_function("parse_document", |b| {
        b.iter(|| parse_document(&xml).unwrap());
    });
}

fn bench_render(c: &mut Criterion) {
    let book = FictionBook::parse(&synthetic_book(200)).unwrap();
    let assets = AssetTable::assign(book.binaries());
    c.bench_function("render_book", |b| {
        b.iter(|| render_book(&book, &assets, None));
    });
}

fn bench_convert_sample(c: &mut Criterion) {
    let options = ConvertOptions::new().with_images("sample_images");
    c.bench_function("convert_sample", |b| {
        b.iter(|| convert_bytes(SAMPLE, &options).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_render, bench_convert_sample);
criterion_main!(benches);
