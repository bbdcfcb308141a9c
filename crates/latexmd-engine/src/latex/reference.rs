use crate::{
    error::{Command, ConvertError},
    pipeline::inline::{InlineMatch, InlinePhase, InlineStage, Scan},
    tree::Element,
};

use super::{Context, labels};

/// `ref[name]`, resolved to a link to the labelled theorem.
///
/// Runs on text left by host parsing, and labels must be defined before
/// they are referenced.
pub struct Reference;

impl Reference {
    pub const OPEN: &'static str = "ref[";
    pub const CLOSE: &'static str = "]";
}

impl InlineStage for Reference {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn phase(&self) -> InlinePhase {
        InlinePhase::Text
    }

    fn try_match(
        &self,
        ctx: &Context,
        scan: &mut Scan<'_>,
    ) -> Result<Option<InlineMatch>, ConvertError> {
        if !scan.rest().starts_with(Self::OPEN) {
            return Ok(None);
        }
        let start = scan.pos() + Self::OPEN.len();
        let Some(first) = scan.text()[start..].chars().next().filter(|c| *c != '\n') else {
            return Ok(None);
        };
        let Some(close) = scan.find(Self::CLOSE, start + first.len_utf8()) else {
            return Ok(None);
        };
        if scan.find("\n", start).is_some_and(|nl| nl < close) {
            return Ok(None);
        }
        let name = &scan.text()[start..close];

        labels::validate(Command::Ref, name)?;
        let number = ctx
            .labels
            .resolve(name)
            .ok_or_else(|| ConvertError::UnresolvedReference {
                name: name.to_string(),
            })?;

        Ok(Some(InlineMatch {
            len: close + Self::CLOSE.len() - scan.pos(),
            node: Element::new("a")
                .with_attr("href", format!("#theorem-ref-{number}"))
                .with_text(number.to_string())
                .into(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::inline::{Span, scan};

    fn convert(ctx: &Context, text: &str) -> Result<String, ConvertError> {
        let stages: Vec<Box<dyn InlineStage>> = vec![Box::new(Reference)];
        Ok(scan(&stages, ctx, text, false)?
            .into_iter()
            .map(|span| match span {
                Span::Plain(t) => t.to_string(),
                Span::Matched(node) => node.to_html(),
            })
            .collect())
    }

    fn ctx_with(name: &str, number: u32) -> Context {
        let mut ctx = Context::default();
        ctx.labels.insert(name, number).unwrap();
        ctx
    }

    #[test]
    fn resolves_to_anchor_link() {
        let ctx = ctx_with("main", 3);
        assert_eq!(
            convert(&ctx, "by ref[main]."),
            Ok(r##"by <a href="#theorem-ref-3">3</a>."##.to_string())
        );
    }

    #[test]
    fn unknown_label_fails() {
        assert_eq!(
            convert(&Context::default(), "ref[later]"),
            Err(ConvertError::UnresolvedReference {
                name: "later".into()
            })
        );
    }

    #[test]
    fn malformed_name_fails_as_ref() {
        assert_eq!(
            convert(&Context::default(), "ref[a b]"),
            Err(ConvertError::InvalidLabelFormat {
                command: Command::Ref,
                name: "a b".into()
            })
        );
    }

    #[test]
    fn incomplete_syntax_is_text() {
        assert_eq!(convert(&Context::default(), "ref[ and ref"), Ok("ref[ and ref".into()));
        assert_eq!(convert(&Context::default(), "ref[]"), Ok("ref[]".into()));
    }

    #[test]
    fn many_unclosed_openers_scan_quickly() {
        let text = "ref[a ".repeat(20_000);
        assert_eq!(convert(&Context::default(), &text), Ok(text.clone()));
    }
}
