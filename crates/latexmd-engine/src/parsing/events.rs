//! Helpers over pulldown-cmark inline events.

use std::ops::Range;

use pulldown_cmark::{CowStr, Event};

/// Joins runs of adjacent `Text` events. A joined event keeps the start
/// of its first range and the end of its last.
pub fn merge_text<'a>(
    events: impl IntoIterator<Item = (Event<'a>, Range<usize>)>,
) -> Vec<(Event<'a>, Range<usize>)> {
    let mut out: Vec<(Event<'a>, Range<usize>)> = Vec::new();
    for (event, range) in events {
        if let (Event::Text(next), Some((Event::Text(prev), prev_range))) =
            (&event, out.last_mut())
        {
            let mut joined = String::from(&**prev);
            joined.push_str(next);
            *prev = CowStr::from(joined);
            prev_range.end = range.end;
            continue;
        }
        out.push((event, range));
    }
    out
}

/// Text of the first event, or `""` when it is not text.
pub fn leading_text<'e>(events: &'e [Event<'_>]) -> &'e str {
    match events.first() {
        Some(Event::Text(t)) => &**t,
        _ => "",
    }
}

/// Text of the last event, or `""` when it is not text.
pub fn trailing_text<'e>(events: &'e [Event<'_>]) -> &'e str {
    match events.last() {
        Some(Event::Text(t)) => &**t,
        _ => "",
    }
}

/// Drops the first `len` bytes of the leading text event.
pub fn strip_leading(events: &mut [Event<'_>], len: usize) {
    if let Some(Event::Text(t)) = events.first_mut() {
        let rest = t.get(len..).unwrap_or_default().to_string();
        *t = rest.into();
    }
}

/// Drops `suffix`, and the whitespace after it, from the trailing text event.
pub fn strip_trailing(events: &mut [Event<'_>], suffix: &str) {
    if let Some(Event::Text(t)) = events.last_mut()
        && let Some(rest) = t.trim_end().strip_suffix(suffix)
    {
        let rest = rest.to_string();
        *t = rest.into();
    }
}

/// Text of `event` when it is a `Text` event.
pub fn text<'e>(event: &'e Event<'_>) -> Option<&'e str> {
    match event {
        Event::Text(t) => Some(&**t),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Parser, Tag, TagEnd};

    use super::*;

    fn paragraph(source: &str) -> Vec<Event<'_>> {
        merge_text(Parser::new(source).into_offset_iter())
            .into_iter()
            .map(|(e, _)| e)
            .filter(|e| {
                !matches!(
                    e,
                    Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
                )
            })
            .collect()
    }

    #[test]
    fn escapes_split_text_that_merges_back() {
        let source = r"a \* b [c";
        let merged = merge_text(Parser::new(source).into_offset_iter());
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].0, Event::Text(r"a * b [c".into()));
        assert_eq!(merged[1].1, 0..source.len());
    }

    #[test]
    fn leading_and_trailing() {
        let events = paragraph("Proof: *x* done []");
        assert_eq!(leading_text(&events), "Proof: ");
        assert_eq!(trailing_text(&events), " done []");
        assert_eq!(leading_text(&paragraph("*x* y")), "");
    }

    #[test]
    fn stripping() {
        let mut events = paragraph("Proof: *x* done [] ");
        strip_leading(&mut events, "Proof:".len());
        strip_trailing(&mut events, "[]");
        assert_eq!(leading_text(&events), " ");
        assert_eq!(trailing_text(&events), " done ");
    }

    #[test]
    fn stripping_needs_a_match() {
        let mut events = paragraph("x [] y");
        strip_trailing(&mut events, "[]");
        assert_eq!(trailing_text(&events), "x [] y");
    }
}
