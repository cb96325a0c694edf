//! Highlighting Benchmarks
//!
//! THREE scenarios are benchmarked:
//! 1. Full document - tokenize an article from the start state
//! 2. Single line - tokenize one markup-dense line
//! 3. Incremental edit - re-highlight after replacing one line
//!
//! Run with: cargo bench --bench highlight

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wikitext_lexer::wikitext::{
    highlight_document, highlight_line, Engine, IncrementalHighlighter, LanguageConfig, LineEdit,
};

const ARTICLE: &str = r#"{{Infobox settlement
| name = Example
| population_total = {{formatnum:12345}}
| website = [https://example.org example.org]
}}
'''Example''' is a ''fictional'' town.<ref>{{cite web|url=https://example.org|title=Source}}</ref>

== History ==
The town was founded in [[1850]] by [[John Doe|a settler]]. See https://example.org/history.
<!-- editors: keep this short -->
* First item with &amp; entity
* Second item with <span style="color:red">markup</span>
** Nested item ~~~~

=== Climate ===
{| class="wikitable"
|+ Averages
! Month !! High !! Low
|-
| Jan || 3 || -4
|-
| Feb || 5 || -3
|}
__NOTOC__
<nowiki>'''not bold'''</nowiki> and l'''x'' rollback."#;

fn article(repeat: usize) -> String {
    vec![ARTICLE; repeat].join("\n")
}

fn bench_document(c: &mut Criterion) {
    let engine = Engine::new(LanguageConfig::default()).unwrap();
    let mut group = c.benchmark_group("document");

    for repeat in [1, 10, 50] {
        let text = article(repeat);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(repeat), &text, |b, text| {
            b.iter(|| highlight_document(&engine, black_box(text)))
        });
    }
    group.finish();
}

fn bench_line(c: &mut Criterion) {
    let engine = Engine::new(LanguageConfig::default()).unwrap();
    let line = "'''Bold''' [[Link|text]] {{T|a=1|b={{U}}}} <b>tag</b> &amp; ''it'' l'''x'' https://a.org";

    c.bench_function("line", |b| {
        b.iter(|| {
            let mut state = engine.start_state();
            highlight_line(&engine, black_box(line), &mut state)
        })
    });
}

fn bench_incremental(c: &mut Criterion) {
    let engine = Engine::new(LanguageConfig::default()).unwrap();
    let text = article(50);
    let line_count = text.split('\n').count();
    let middle = line_count / 2;

    c.bench_function("incremental/local_edit", |b| {
        let mut doc = IncrementalHighlighter::new(&engine, &text);
        b.iter(|| {
            doc.apply_edit(LineEdit::replace(middle, "Changed text in the middle."))
                .unwrap()
        })
    });

    c.bench_function("incremental/open_template", |b| {
        b.iter_batched(
            || IncrementalHighlighter::new(&engine, &text),
            |mut doc| doc.apply_edit(LineEdit::replace(middle, "{{Unclosed|")).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_document, bench_line, bench_incremental);
criterion_main!(benches);
