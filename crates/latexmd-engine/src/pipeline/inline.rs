//! Inline stages and the scanner that runs them over a span of text.

use crate::{error::ConvertError, latex::Context, tree::Node};

/// When an inline stage runs relative to host inline parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlinePhase {
    /// Over raw source before host parsing. Outranks backslash escapes and
    /// every host inline construct except code spans.
    Source,
    /// Over text events left by host parsing. Lowest precedence.
    Text,
}

/// A stage match at the scan position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    /// Bytes consumed from the scan position.
    pub len: usize,
    pub node: Node,
}

/// An inline transform tried at every scan position. The first stage
/// that matches wins.
pub trait InlineStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn phase(&self) -> InlinePhase;

    /// Tries a match at `scan.pos()`. Must not advance the scan.
    fn try_match(
        &self,
        ctx: &Context,
        scan: &mut Scan<'_>,
    ) -> Result<Option<InlineMatch>, ConvertError>;
}

/// Scan position over one span of text, with memoized forward searches.
pub struct Scan<'t> {
    text: &'t str,
    pos: usize,
    memos: Vec<Memo>,
}

/// Last search for one needle: started at `from`, found `found`.
struct Memo {
    needle: &'static str,
    from: usize,
    found: Option<usize>,
}

impl<'t> Scan<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            pos: 0,
            memos: Vec::new(),
        }
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'t str {
        &self.text[self.pos..]
    }

    /// Byte offset of the first `needle` at or after `from`.
    ///
    /// Results are remembered per needle, so searches whose start only
    /// moves forward cost linear time in total.
    pub fn find(&mut self, needle: &'static str, from: usize) -> Option<usize> {
        let hay = self.text.as_bytes();
        if from > hay.len() || needle.is_empty() {
            return None;
        }
        let slot = self.memos.iter().position(|m| m.needle == needle);
        if let Some(memo) = slot.map(|i| &self.memos[i]) {
            if from < memo.from {
                let gap_end = (memo.from + needle.len() - 1).min(hay.len());
                return find_bytes(&hay[..gap_end], needle, from).or(memo.found);
            }
            match memo.found {
                None => return None,
                Some(at) if at >= from => return Some(at),
                Some(_) => {}
            }
        }
        let found = find_bytes(hay, needle, from);
        let memo = Memo {
            needle,
            from,
            found,
        };
        match slot {
            Some(i) => self.memos[i] = memo,
            None => self.memos.push(memo),
        }
        found
    }
}

fn find_bytes(hay: &[u8], needle: &str, from: usize) -> Option<usize> {
    let needle = needle.as_bytes();
    hay.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|at| at + from)
}

/// A piece of scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'t> {
    Plain(&'t str),
    Matched(Node),
}

/// Splits `text` into plain runs and stage matches, trying `stages` in
/// order at every position. With `escapes`, a backslash before ASCII
/// punctuation that no stage claims keeps that character from starting
/// a match.
pub fn scan<'t>(
    stages: &[Box<dyn InlineStage>],
    ctx: &Context,
    text: &'t str,
    escapes: bool,
) -> Result<Vec<Span<'t>>, ConvertError> {
    let mut spans = Vec::new();
    let mut scan = Scan::new(text);
    let mut plain = 0;
    while scan.pos < text.len() {
        let mut matched = None;
        for stage in stages {
            if let Some(m) = stage.try_match(ctx, &mut scan)? {
                log::trace!("{} matched at byte {}", stage.name(), scan.pos);
                matched = Some(m);
                break;
            }
        }
        match matched {
            Some(m) => {
                if plain < scan.pos {
                    spans.push(Span::Plain(&text[plain..scan.pos]));
                }
                spans.push(Span::Matched(m.node));
                scan.pos += m.len.max(1);
                plain = scan.pos;
            }
            None => {
                let rest = scan.rest();
                let escaped = escapes
                    && rest.starts_with('\\')
                    && rest[1..].starts_with(|c: char| c.is_ascii_punctuation());
                scan.pos += if escaped {
                    2
                } else {
                    rest.chars().next().map_or(1, char::len_utf8)
                };
            }
        }
    }
    if plain < text.len() {
        spans.push(Span::Plain(&text[plain..]));
    }
    Ok(spans)
}
