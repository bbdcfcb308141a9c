use pulldown_cmark::{CowStr, Event, Tag, TagEnd};

use crate::{
    error::ConvertError,
    latex::Context,
    parsing::events,
    tree::{self, Element, Node},
};

use super::inline::{self, InlineStage, Span};

/// A paragraph offered to the block stages.
#[derive(Debug, Clone)]
pub struct ParagraphBlock<'a> {
    /// Inline events between the paragraph's start and end, with adjacent
    /// text joined.
    pub events: Vec<Event<'a>>,
    /// Number of open block quotes, lists and list items around it.
    pub depth: usize,
    pub in_list: bool,
    /// 1-based source line.
    pub line: usize,
}

impl ParagraphBlock<'_> {
    pub fn leading_text(&self) -> &str {
        events::leading_text(&self.events)
    }

    pub fn trailing_text(&self) -> &str {
        events::trailing_text(&self.events)
    }
}

/// Output handle given to block stages. Collects the host event stream
/// and runs the text-phase inline stages over text it is handed.
pub struct Emitter<'o, 'a> {
    events: &'o mut Vec<Event<'a>>,
    text_stages: &'o [Box<dyn InlineStage>],
}

impl<'o, 'a> Emitter<'o, 'a> {
    pub fn new(events: &'o mut Vec<Event<'a>>, text_stages: &'o [Box<dyn InlineStage>]) -> Self {
        Self {
            events,
            text_stages,
        }
    }

    /// Passes a host event through unchanged.
    pub fn event(&mut self, event: Event<'a>) {
        self.events.push(event);
    }

    /// Raw block-level markup.
    pub fn html(&mut self, html: String) {
        self.events.push(Event::Html(CowStr::from(html)));
    }

    /// An element placed inline.
    pub fn element(&mut self, el: &Element) {
        self.events.push(Event::InlineHtml(tree::to_html(el).into()));
    }

    pub fn start_paragraph(&mut self) {
        self.events.push(Event::Start(Tag::Paragraph));
    }

    pub fn end_paragraph(&mut self) {
        self.events.push(Event::End(TagEnd::Paragraph));
    }

    /// A plain `<p>` around `events`.
    pub fn paragraph(&mut self, ctx: &Context, events: Vec<Event<'a>>) -> Result<(), ConvertError> {
        self.start_paragraph();
        self.inline(ctx, events)?;
        self.end_paragraph();
        Ok(())
    }

    /// Inline events, with the text-phase stages run over every text event.
    pub fn inline(&mut self, ctx: &Context, events: Vec<Event<'a>>) -> Result<(), ConvertError> {
        for event in events {
            match event {
                Event::Text(text) => self.text(ctx, text)?,
                other => self.events.push(other),
            }
        }
        Ok(())
    }

    /// One text event, split where a text-phase stage matches.
    pub fn text(&mut self, ctx: &Context, text: CowStr<'a>) -> Result<(), ConvertError> {
        let spans = inline::scan(self.text_stages, ctx, &text, false)?;
        if !spans.iter().any(|s| matches!(s, Span::Matched(_))) {
            drop(spans);
            self.events.push(Event::Text(text));
            return Ok(());
        }
        for span in spans {
            self.events.push(match span {
                Span::Plain(t) => Event::Text(t.to_string().into()),
                Span::Matched(Node::Text(t)) => Event::Text(t.into()),
                Span::Matched(node) => Event::InlineHtml(node.to_html().into()),
            });
        }
        Ok(())
    }
}

/// A paragraph-level transform. The first stage whose `test` accepts a
/// paragraph runs it; paragraphs no stage claims are rendered as `<p>`.
pub trait BlockStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this stage handles `block`. Errors abort the conversion.
    fn test(&self, ctx: &Context, block: &ParagraphBlock<'_>) -> Result<bool, ConvertError>;

    fn run<'a>(
        &self,
        ctx: &mut Context,
        block: ParagraphBlock<'a>,
        out: &mut Emitter<'_, 'a>,
    ) -> Result<(), ConvertError>;
}

#[cfg(test)]
impl<'a> ParagraphBlock<'a> {
    /// The first paragraph of `source`, outside any container.
    pub(crate) fn parse(source: &'a str, line: usize) -> Self {
        let events = events::merge_text(pulldown_cmark::Parser::new(source).into_offset_iter())
            .into_iter()
            .map(|(e, _)| e)
            .skip_while(|e| !matches!(e, Event::Start(Tag::Paragraph)))
            .skip(1)
            .take_while(|e| !matches!(e, Event::End(TagEnd::Paragraph)))
            .collect();
        Self {
            events,
            depth: 0,
            in_list: false,
            line,
        }
    }
}
