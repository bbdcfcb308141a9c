//! Host markdown parsing on pulldown-cmark, plus what the LaTeX stages
//! need around it: verbatim ranges, placeholder stashing, text-event
//! helpers and source line lookup.

pub mod events;
pub mod source;
pub mod stash;

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

pub use source::Source;
pub use stash::Stash;

/// Host extensions enabled for every document.
pub fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES
}

/// Byte ranges of `source` never rewritten before host parsing: code
/// spans, code blocks and raw HTML blocks. Sorted and disjoint.
pub fn verbatim_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges: Vec<Range<usize>> = Vec::new();
    for (event, range) in Parser::new_ext(source, options()).into_offset_iter() {
        if !matches!(
            event,
            Event::Code(_) | Event::Start(Tag::CodeBlock(_) | Tag::HtmlBlock)
        ) {
            continue;
        }
        match ranges.last_mut() {
            Some(prev) if range.start < prev.end => prev.end = prev.end.max(range.end),
            _ => ranges.push(range),
        }
    }
    ranges
}
