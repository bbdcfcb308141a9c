use std::{sync::Arc, thread};

use latexmd_engine::Converter;

#[test]
fn documents_convert_independently_across_threads() {
    let converter = Arc::new(Converter::new());
    let results: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (1..=8)
            .map(|n| {
                let converter = Arc::clone(&converter);
                s.spawn(move || {
                    let source = (0..n)
                        .map(|i| format!("Theorem: label[t{i}] x\n\n"))
                        .collect::<String>()
                        + &format!("ref[t{}]", n - 1);
                    converter.convert(&source).unwrap().into_html()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, html) in results.iter().enumerate() {
        let n = i + 1;
        assert_eq!(html.matches("theorem-ref-").count(), n + 1);
        assert!(html.ends_with(&format!("<p><a href=\"#theorem-ref-{n}\">{n}</a></p>\n")));
    }
}
