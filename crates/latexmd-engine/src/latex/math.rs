//! Math delimiter normalization.
//!
//! `$...$` and `\(...\)` become `\(...\)`; `$$...$$` and `\[...\]` become
//! `\[...\]`. Content is single-line, at least one character, and passed
//! through untouched.

use std::{borrow::Cow, ops::Range};

use crate::{
    error::ConvertError,
    latex::Context,
    pipeline::inline::{self, InlineMatch, InlinePhase, InlineStage, Scan, Span},
    tree::Node,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDelimiter {
    /// `$$...$$`
    DisplayDollar,
    /// `\(...\)`
    InlineParen,
    /// `\[...\]`
    DisplayBracket,
    /// `$...$`
    InlineDollar,
}

impl MathDelimiter {
    /// Match order: `$$` before `$` so display math is not read as two
    /// empty inline spans.
    pub const ALL: [MathDelimiter; 4] = [
        MathDelimiter::DisplayDollar,
        MathDelimiter::InlineParen,
        MathDelimiter::DisplayBracket,
        MathDelimiter::InlineDollar,
    ];

    pub fn open(self) -> &'static str {
        match self {
            MathDelimiter::DisplayDollar => "$$",
            MathDelimiter::InlineParen => r"\(",
            MathDelimiter::DisplayBracket => r"\[",
            MathDelimiter::InlineDollar => "$",
        }
    }

    pub fn close(self) -> &'static str {
        match self {
            MathDelimiter::DisplayDollar => "$$",
            MathDelimiter::InlineParen => r"\)",
            MathDelimiter::DisplayBracket => r"\]",
            MathDelimiter::InlineDollar => "$",
        }
    }

    pub fn is_display(self) -> bool {
        matches!(
            self,
            MathDelimiter::DisplayDollar | MathDelimiter::DisplayBracket
        )
    }

    /// Matches a span at the scan position, returning the content range
    /// and the byte length of the whole span. The first closer after at
    /// least one content character ends the span.
    pub fn match_at(self, scan: &mut Scan<'_>) -> Option<(Range<usize>, usize)> {
        if !scan.rest().starts_with(self.open()) {
            return None;
        }
        let start = scan.pos() + self.open().len();
        let first = scan.text()[start..].chars().next().filter(|c| *c != '\n')?;
        let close = scan.find(self.close(), start + first.len_utf8())?;
        if scan.find("\n", start).is_some_and(|nl| nl < close) {
            return None;
        }
        Some((start..close, close + self.close().len() - scan.pos()))
    }

    /// `content` wrapped in this delimiter's canonical form.
    pub fn canonical(self, content: &str) -> String {
        if self.is_display() {
            format!(r"\[{content}\]")
        } else {
            format!(r"\({content}\)")
        }
    }
}

/// Rewrites every math span in `text` to canonical delimiters.
///
/// Operates on plain text; code spans and escapes are not recognized here.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let stages = MathSpan::all();
    let Ok(spans) = inline::scan(&stages, &Context::default(), text, false) else {
        return Cow::Borrowed(text);
    };
    if !spans.iter().any(|s| matches!(s, Span::Matched(_))) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for span in &spans {
        match span {
            Span::Plain(t) => out.push_str(t),
            Span::Matched(Node::Text(t)) => out.push_str(t),
            Span::Matched(node) => out.push_str(&node.to_html()),
        }
    }
    Cow::Owned(out)
}

/// Inline stage for one delimiter syntax. Runs on raw source, so math
/// content is never read as markdown.
pub struct MathSpan(pub MathDelimiter);

impl MathSpan {
    /// One stage per delimiter, in match order.
    pub fn all() -> Vec<Box<dyn InlineStage>> {
        MathDelimiter::ALL
            .into_iter()
            .map(|d| Box::new(MathSpan(d)) as Box<dyn InlineStage>)
            .collect()
    }
}

impl InlineStage for MathSpan {
    fn name(&self) -> &'static str {
        match self.0 {
            MathDelimiter::DisplayDollar => "math_display_dollar",
            MathDelimiter::InlineParen => "math_inline_paren",
            MathDelimiter::DisplayBracket => "math_display_bracket",
            MathDelimiter::InlineDollar => "math_inline_dollar",
        }
    }

    fn phase(&self) -> InlinePhase {
        InlinePhase::Source
    }

    fn try_match(
        &self,
        _ctx: &Context,
        scan: &mut Scan<'_>,
    ) -> Result<Option<InlineMatch>, ConvertError> {
        let Some((content, len)) = self.0.match_at(scan) else {
            return Ok(None);
        };
        Ok(Some(InlineMatch {
            len,
            node: Node::text(self.0.canonical(&scan.text()[content])),
        }))
    }
}
