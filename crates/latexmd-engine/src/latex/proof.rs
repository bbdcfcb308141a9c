use crate::{
    error::ConvertError,
    parsing::events,
    pipeline::{BlockStage, Emitter, ParagraphBlock},
    tree::Element,
};

use super::{Context, context::ProofSpan};

/// Start and end markers found on one paragraph. Both may be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofMarks {
    pub start: bool,
    pub end: bool,
}

impl ProofMarks {
    pub const START: &'static str = "proof:";
    pub const END: &'static str = "[]";

    /// `Proof:` opening the first text and `[]` closing the last one.
    pub fn detect(block: &ParagraphBlock<'_>) -> Self {
        Self {
            start: block
                .leading_text()
                .get(..Self::START.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(Self::START)),
            end: block.trailing_text().trim_end().ends_with(Self::END),
        }
    }
}

fn container() -> Element {
    Element::new("div").with_attr("class", "proof-container")
}

/// Closes a proof left open when its container ends, or at end of input.
pub fn close_unterminated(ctx: &mut Context, out: &mut Emitter<'_, '_>) {
    if let ProofSpan::Open { line, .. } = ctx.proof {
        log::warn!("proof opened at line {line} is never closed");
        out.html(format!("{}\n", container().close_tag()));
        ctx.proof = ProofSpan::Closed;
    }
}

/// Wraps the paragraphs from `Proof:` to `[]` in one proof container.
///
/// A proof spans paragraphs at the container depth it started at.
/// Paragraphs nested deeper are rendered inside the container as they
/// are; the proof closes early if its own container ends.
pub struct ProofStage;

impl BlockStage for ProofStage {
    fn name(&self) -> &'static str {
        "proof"
    }

    fn test(&self, ctx: &Context, block: &ParagraphBlock<'_>) -> Result<bool, ConvertError> {
        if block.in_list {
            return Ok(false);
        }
        let marks = ProofMarks::detect(block);
        match ctx.proof {
            ProofSpan::Open { .. } if marks.start => {
                Err(ConvertError::ProofAlreadyOpen { line: block.line })
            }
            ProofSpan::Open { depth, .. } => Ok(depth == block.depth),
            ProofSpan::Closed if marks.end && !marks.start => {
                Err(ConvertError::DanglingProofEnd { line: block.line })
            }
            ProofSpan::Closed => Ok(marks.start),
        }
    }

    fn run<'a>(
        &self,
        ctx: &mut Context,
        block: ParagraphBlock<'a>,
        out: &mut Emitter<'_, 'a>,
    ) -> Result<(), ConvertError> {
        let marks = ProofMarks::detect(&block);
        let mut body = block.events;
        if marks.start {
            events::strip_leading(&mut body, ProofMarks::START.len());
        }
        if marks.end {
            events::strip_trailing(&mut body, ProofMarks::END);
        }

        if marks.start {
            let title = Element::new("span")
                .with_attr("class", "proof-title")
                .with_text("Proof.");
            out.html(format!("{}\n", container().open_tag()));
            out.start_paragraph();
            out.element(&title);
            out.inline(ctx, body)?;
            out.end_paragraph();
        } else {
            out.paragraph(ctx, body)?;
        }

        if marks.end {
            log::debug!("proof closed at line {}", block.line);
            out.html(format!("{}\n", container().close_tag()));
            ctx.proof = ProofSpan::Closed;
        } else if marks.start {
            log::debug!("proof opened at line {}", block.line);
            ctx.proof = ProofSpan::Open {
                depth: block.depth,
                line: block.line,
            };
        }
        Ok(())
    }
}
