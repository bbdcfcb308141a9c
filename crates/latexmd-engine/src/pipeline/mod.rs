//! The conversion pipeline.
//!
//! 1. Source-phase inline stages (math) run over the raw source outside
//!    code and HTML blocks; their output is stashed behind placeholders.
//! 2. pulldown-cmark parses the result. Paragraphs go to the block stages
//!    with their container depth; text events go to the text-phase inline
//!    stages (`ref[...]`).
//! 3. Placeholders are restored and the event stream is rendered with
//!    `pulldown_cmark::html`.

pub mod inline;
pub mod stage;

use pulldown_cmark::{Event, Parser, Tag, TagEnd, html::push_html};

use crate::{
    error::ConvertError,
    latex::{Context, MathSpan, ProofSpan, ProofStage, Reference, TheoremStage, proof},
    parsing::{self, Source, Stash, events},
};

pub use inline::{InlineMatch, InlinePhase, InlineStage, Scan};
pub use stage::{BlockStage, Emitter, ParagraphBlock};

/// Inline stages in match order.
fn default_inline_stages() -> Vec<Box<dyn InlineStage>> {
    let mut stages = MathSpan::all();
    stages.push(Box::new(Reference));
    stages
}

fn opens_container(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::BlockQuote(_) | Tag::List(_) | Tag::Item | Tag::FootnoteDefinition(_)
    )
}

fn closes_container(end: &TagEnd) -> bool {
    matches!(
        end,
        TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::Item | TagEnd::FootnoteDefinition
    )
}

/// Converts extended markdown to HTML.
///
/// Holds only stateless stages; every [`Converter::convert`] call gets a
/// fresh [`Context`], so one converter can serve many threads.
pub struct Converter {
    block_stages: Vec<Box<dyn BlockStage>>,
    inline_names: Vec<&'static str>,
    source_stages: Vec<Box<dyn InlineStage>>,
    text_stages: Vec<Box<dyn InlineStage>>,
}

impl Converter {
    pub fn new() -> Self {
        let inline = default_inline_stages();
        let inline_names = inline.iter().map(|s| s.name()).collect();
        let (source_stages, text_stages): (Vec<_>, Vec<_>) = inline
            .into_iter()
            .partition(|s| s.phase() == InlinePhase::Source);
        Self {
            block_stages: vec![Box::new(TheoremStage), Box::new(ProofStage)],
            inline_names,
            source_stages,
            text_stages,
        }
    }

    pub fn block_stage_names(&self) -> Vec<&'static str> {
        self.block_stages.iter().map(|s| s.name()).collect()
    }

    pub fn inline_stage_names(&self) -> Vec<&'static str> {
        self.inline_names.clone()
    }

    pub fn convert(&self, source: &str) -> Result<Conversion, ConvertError> {
        let mut ctx = Context::new();
        let mut stash = Stash::default();
        let protected = self.protect(&ctx, source, &mut stash)?;
        let lines = Source::new(&protected);
        let parsed = events::merge_text(
            Parser::new_ext(&protected, parsing::options()).into_offset_iter(),
        );
        log::debug!(
            "converting {} events, {} stashed spans",
            parsed.len(),
            stash.len()
        );

        let mut rendered = Vec::with_capacity(parsed.len());
        let mut out = Emitter::new(&mut rendered, &self.text_stages);
        let mut depth = 0;
        let mut items = 0;
        let mut in_code = false;
        let mut walk = parsed.into_iter();
        while let Some((event, range)) = walk.next() {
            match event {
                Event::Start(Tag::Paragraph) => {
                    let events = walk
                        .by_ref()
                        .map(|(e, _)| e)
                        .take_while(|e| !matches!(e, Event::End(TagEnd::Paragraph)))
                        .collect();
                    let block = ParagraphBlock {
                        events,
                        depth,
                        in_list: items > 0,
                        line: lines.line_of(range.start),
                    };
                    self.paragraph(&mut ctx, block, &mut out)?;
                }
                Event::Start(tag) => {
                    if opens_container(&tag) {
                        depth += 1;
                    }
                    match tag {
                        Tag::Item => items += 1,
                        Tag::CodeBlock(_) => in_code = true,
                        _ => {}
                    }
                    out.event(Event::Start(tag));
                }
                Event::End(end) => {
                    if closes_container(&end) {
                        if let ProofSpan::Open { depth: at, .. } = ctx.proof
                            && at == depth
                        {
                            proof::close_unterminated(&mut ctx, &mut out);
                        }
                        depth -= 1;
                    }
                    match end {
                        TagEnd::Item => items -= 1,
                        TagEnd::CodeBlock => in_code = false,
                        _ => {}
                    }
                    out.event(Event::End(end));
                }
                Event::Text(text) if !in_code => out.text(&ctx, text)?,
                other => out.event(other),
            }
        }
        proof::close_unterminated(&mut ctx, &mut out);

        let mut html = String::with_capacity(source.len() * 2);
        push_html(&mut html, stash.restore(rendered).into_iter());
        Ok(Conversion { html, context: ctx })
    }

    /// Runs the source-phase stages over everything outside verbatim
    /// ranges, stashing their output.
    fn protect(
        &self,
        ctx: &Context,
        source: &str,
        stash: &mut Stash,
    ) -> Result<String, ConvertError> {
        let mut protected = String::with_capacity(source.len());
        let mut from = 0;
        let end = source.len()..source.len();
        for range in parsing::verbatim_ranges(source).into_iter().chain([end]) {
            let start = range.start.max(from);
            for span in inline::scan(&self.source_stages, ctx, &source[from..start], true)? {
                match span {
                    inline::Span::Plain(text) => stash.push_text(text, &mut protected),
                    inline::Span::Matched(node) => stash.push(node, &mut protected),
                }
            }
            stash.push_text(&source[start..range.end.max(start)], &mut protected);
            from = range.end.max(start);
        }
        Ok(protected)
    }

    fn paragraph<'a>(
        &self,
        ctx: &mut Context,
        block: ParagraphBlock<'a>,
        out: &mut Emitter<'_, 'a>,
    ) -> Result<(), ConvertError> {
        for stage in &self.block_stages {
            if stage.test(ctx, &block)? {
                log::debug!("{} stage takes the block at line {}", stage.name(), block.line);
                return stage.run(ctx, block, out);
            }
        }
        out.paragraph(ctx, block.events)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of one conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    html: String,
    /// Final per-document state: labels and the next theorem number.
    pub context: Context,
}

impl Conversion {
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

/// Converts `source` to HTML with a default [`Converter`].
pub fn markdown_to_html(source: &str) -> Result<String, ConvertError> {
    Ok(Converter::new().convert(source)?.into_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order() {
        let c = Converter::new();
        assert_eq!(c.block_stage_names(), vec!["theorem", "proof"]);
        assert_eq!(
            c.inline_stage_names(),
            vec![
                "math_display_dollar",
                "math_inline_paren",
                "math_display_bracket",
                "math_inline_dollar",
                "reference",
            ]
        );
    }

    #[test]
    fn converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }

    #[test]
    fn context_is_fresh_per_call() {
        let c = Converter::new();
        let first = c.convert("Theorem: label[a] x").unwrap();
        let second = c.convert("Theorem: label[a] y").unwrap();
        assert_eq!(first.context.next_theorem_number(), 2);
        assert_eq!(second.context.labels.resolve("a"), Some(1));
    }

    #[test]
    fn code_keeps_dollars_and_private_use_characters() {
        let html = markdown_to_html("`$a$ \u{E000}0\u{E001}` and $b$\n").unwrap();
        assert_eq!(
            html,
            "<p><code>$a$ \u{E000}0\u{E001}</code> and \\(b\\)</p>\n"
        );
    }
}
