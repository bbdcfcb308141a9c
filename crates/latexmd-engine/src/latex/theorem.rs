use std::{fmt, sync::OnceLock};

use pulldown_cmark::Event;
use regex::Regex;

use crate::{
    error::ConvertError,
    parsing::events,
    pipeline::{BlockStage, Emitter, ParagraphBlock},
    tree::Element,
};

use super::Context;

fn label_re() -> &'static Regex {
    static LABEL_RE: OnceLock<Regex> = OnceLock::new();
    LABEL_RE.get_or_init(|| Regex::new(r"label\[(.+?)\]").expect("Invalid label regex"))
}

/// The theorem-like environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Corollary,
    Definition,
    Example,
    Lemma,
    Proposition,
    Remark,
    Theorem,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Corollary,
        Category::Definition,
        Category::Example,
        Category::Lemma,
        Category::Proposition,
        Category::Remark,
        Category::Theorem,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Category::Corollary => "corollary",
            Category::Definition => "definition",
            Category::Example => "example",
            Category::Lemma => "lemma",
            Category::Proposition => "proposition",
            Category::Remark => "remark",
            Category::Theorem => "theorem",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Category::Corollary => "Corollary",
            Category::Definition => "Definition",
            Category::Example => "Example",
            Category::Lemma => "Lemma",
            Category::Proposition => "Proposition",
            Category::Remark => "Remark",
            Category::Theorem => "Theorem",
        }
    }

    /// The category whose keyword, followed by a colon, starts `text`.
    /// The keyword matches case-insensitively.
    pub fn detect(text: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| {
            let kw = c.keyword();
            text.get(..kw.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(kw))
                && text[kw.len()..].starts_with(':')
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Numbers theorem-like paragraphs and records their labels.
pub struct TheoremStage;

impl TheoremStage {
    /// Labels in text events, in order. Markup splits a label's text.
    fn labels(events: &[Event<'_>]) -> Vec<String> {
        events
            .iter()
            .filter_map(events::text)
            .flat_map(|t| label_re().captures_iter(t).map(|c| c[1].to_string()))
            .collect()
    }

    fn strip_labels(events: &mut [Event<'_>]) {
        for event in events {
            if let Event::Text(t) = event {
                let stripped = label_re().replace_all(&**t, "").into_owned();
                *t = stripped.into();
            }
        }
    }
}

impl BlockStage for TheoremStage {
    fn name(&self) -> &'static str {
        "theorem"
    }

    fn test(&self, ctx: &Context, block: &ParagraphBlock<'_>) -> Result<bool, ConvertError> {
        if block.in_list {
            return Ok(false);
        }
        let Some(category) = Category::detect(block.leading_text()) else {
            return Ok(false);
        };
        if ctx.proof_open() {
            return Err(ConvertError::TheoremInProof {
                category: category.keyword().to_string(),
                line: block.line,
            });
        }
        Ok(true)
    }

    fn run<'a>(
        &self,
        ctx: &mut Context,
        block: ParagraphBlock<'a>,
        out: &mut Emitter<'_, 'a>,
    ) -> Result<(), ConvertError> {
        let Some(category) = Category::detect(block.leading_text()) else {
            return out.paragraph(ctx, block.events);
        };
        let number = ctx.next_theorem_number();
        let mut body = block.events;
        events::strip_leading(&mut body, category.keyword().len() + 1);

        let labels = Self::labels(&body);
        match labels.as_slice() {
            [] => {}
            [name] => {
                ctx.labels.insert(name, number)?;
                log::debug!("label {name} -> {category} {number}");
                Self::strip_labels(&mut body);
            }
            [.., extra] => {
                return Err(ConvertError::MultipleLabels {
                    count: labels.len(),
                    extra: extra.clone(),
                });
            }
        }

        let container = Element::new("p").with_attr("class", format!("{category}-container"));
        let anchor = Element::new("a")
            .with_attr("class", format!("theorem-like-title {category}-title"))
            .with_attr("name", format!("theorem-ref-{number}"))
            .with_text(format!("{} {number}.", category.title()));
        out.html(container.open_tag());
        out.element(&anchor);
        out.inline(ctx, body)?;
        out.html(format!("{}\n", container.close_tag()));

        ctx.advance_theorem();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::latex::ProofSpan;

    #[rstest]
    #[case("Theorem: x", Some(Category::Theorem))]
    #[case("LEMMA: x", Some(Category::Lemma))]
    #[case("definition:x", Some(Category::Definition))]
    #[case("Theorem x", None)]
    #[case("Theorem : x", None)]
    #[case("Theorems: x", None)]
    #[case("Proof: x", None)]
    #[case("Thé", None)]
    fn detection(#[case] text: &str, #[case] expected: Option<Category>) {
        assert_eq!(Category::detect(text), expected);
    }

    #[test]
    fn keywords_and_titles_agree() {
        for c in Category::ALL {
            assert_eq!(c.title().to_lowercase(), c.keyword());
        }
    }

    #[test]
    fn theorem_inside_open_proof_reports_line() {
        let mut ctx = Context::default();
        ctx.proof = ProofSpan::Open { depth: 0, line: 1 };
        assert_eq!(
            TheoremStage.test(&ctx, &ParagraphBlock::parse("Lemma: x", 5)),
            Err(ConvertError::TheoremInProof {
                category: "lemma".into(),
                line: 5
            })
        );
    }

    #[test]
    fn labels_are_found_between_markup() {
        let block = ParagraphBlock::parse("Theorem: *a* label[main] b", 1);
        assert_eq!(TheoremStage::labels(&block.events), vec!["main"]);
    }

    #[test]
    fn list_paragraphs_are_ignored() {
        let mut block = ParagraphBlock::parse("Theorem: x", 1);
        block.in_list = true;
        assert_eq!(TheoremStage.test(&Context::default(), &block), Ok(false));
    }
}
