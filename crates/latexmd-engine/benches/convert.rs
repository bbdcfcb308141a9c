use criterion::{Criterion, criterion_group, criterion_main};
use latexmd_engine::{Conversion, Converter, parsing};
use pulldown_cmark::{Parser, html::push_html};

fn generate_document(sections: usize) -> String {
    let mut doc = String::new();
    for i in 0..sections {
        doc.push_str(&format!(
            "## Section {i}\n\n\
             Theorem: label[thm-{i}] For every $x$ in \\(X\\) we have $$f(x) = x^2$$.\n\n\
             Proof: By ref[thm-{i}] and *induction*.\n\n\
             - a list item with `code`\n- another [link](https://example.com)\n\n\
             The claim follows. []\n\n\
             > Remark: quoted text with \\[y\\].\n\n"
        ));
    }
    doc
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");
    group.sample_size(10);

    let converter = Converter::new();
    for sections in [10, 100] {
        let content = generate_document(sections);
        group.bench_function(format!("sections_{sections}"), |b| {
            b.iter(|| {
                let html = converter
                    .convert(std::hint::black_box(&content))
                    .map(Conversion::into_html);
                std::hint::black_box(html)
            });
        });
    }

    group.finish();
}

fn bench_pulldown_cmark_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("baseline");
    group.sample_size(10);

    let content = generate_document(100);
    group.bench_function("pulldown_cmark", |b| {
        b.iter(|| {
            let parser = Parser::new_ext(std::hint::black_box(&content), parsing::options());
            let mut html = String::new();
            push_html(&mut html, parser);
            std::hint::black_box(html)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_convert, bench_pulldown_cmark_baseline);
criterion_main!(benches);
