use criterion::{criterion_group, criterion_main, Criterion};
use engine::html::extract_span_text;
use engine::tokenizer::tokenize;

fn sample_page() -> String {
    let para = "<p>Intro <span>The quick brown fox jumps over the lazy dog &amp; runs away.</span> \
                <script>var x = '<span>ignored</span>';</script></p>\n";
    para.repeat(500)
}

fn bench_tokenize(c: &mut Criterion) {
    let html = sample_page();
    let text = extract_span_text(&html);
    c.bench_function("tokenize_page", |b| b.iter(|| tokenize(&text)));
    c.bench_function("extract_span_text_page", |b| b.iter(|| extract_span_text(&html)));
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);
