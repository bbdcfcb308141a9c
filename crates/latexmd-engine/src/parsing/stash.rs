//! Output produced before host parsing, held behind placeholder tokens.
//!
//! A placeholder is `U+E000`, the stash index in decimal, then `U+E001`.
//! Host markdown treats it as plain text, so whatever it stands for is
//! out of reach of escapes, emphasis and links. Private-use characters
//! already in the source are stashed too, so every `U+E000` in host
//! output opens a placeholder.

use pulldown_cmark::{CowStr, Event, Tag};

use crate::tree::Node;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

#[derive(Debug, Default)]
pub struct Stash {
    items: Vec<Node>,
}

enum Piece<'t> {
    Text(&'t str),
    Stashed(&'t Node),
}

impl Stash {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stores `node` and appends its placeholder to `out`.
    pub fn push(&mut self, node: Node, out: &mut String) {
        out.push(OPEN);
        out.push_str(&self.items.len().to_string());
        out.push(CLOSE);
        self.items.push(node);
    }

    /// Appends `text` to `out`, stashing any placeholder delimiters in it.
    pub fn push_text(&mut self, text: &str, out: &mut String) {
        let mut rest = text;
        while let Some(at) = rest.find([OPEN, CLOSE]) {
            out.push_str(&rest[..at]);
            let c = rest[at..].chars().next().unwrap_or(OPEN);
            self.push(Node::Text(c.to_string()), out);
            rest = &rest[at + c.len_utf8()..];
        }
        out.push_str(rest);
    }

    /// Puts stashed output back into `events`. Stashed text joins the
    /// surrounding text; stashed elements become inline HTML. Link and
    /// image destinations and titles get the text form.
    pub fn restore<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        if self.is_empty() {
            return events;
        }
        let mut out = Vec::with_capacity(events.len());
        for event in events {
            match event {
                Event::Text(text) if text.contains(OPEN) => self.expand(&text, &mut out),
                Event::Code(code) => out.push(Event::Code(self.restore_str(code))),
                Event::Html(html) => out.push(Event::Html(self.restore_str(html))),
                Event::InlineHtml(html) => out.push(Event::InlineHtml(self.restore_str(html))),
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => out.push(Event::Start(Tag::Link {
                    link_type,
                    dest_url: self.restore_str(dest_url),
                    title: self.restore_str(title),
                    id,
                })),
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => out.push(Event::Start(Tag::Image {
                    link_type,
                    dest_url: self.restore_str(dest_url),
                    title: self.restore_str(title),
                    id,
                })),
                other => out.push(other),
            }
        }
        out
    }

    fn expand<'a>(&self, text: &str, out: &mut Vec<Event<'a>>) {
        let mut buf = String::new();
        for piece in self.split(text) {
            match piece {
                Piece::Text(t) => buf.push_str(t),
                Piece::Stashed(Node::Text(t)) => buf.push_str(t),
                Piece::Stashed(node) => {
                    if !buf.is_empty() {
                        out.push(Event::Text(std::mem::take(&mut buf).into()));
                    }
                    out.push(Event::InlineHtml(node.to_html().into()));
                }
            }
        }
        if !buf.is_empty() {
            out.push(Event::Text(buf.into()));
        }
    }

    /// Restores placeholders in a string emitted verbatim. Stashed text is
    /// inserted as is.
    fn restore_str<'a>(&self, s: CowStr<'a>) -> CowStr<'a> {
        if !s.contains(OPEN) {
            return s;
        }
        let mut out = String::with_capacity(s.len());
        for piece in self.split(&s) {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Stashed(Node::Text(t)) => out.push_str(t),
                Piece::Stashed(node) => out.push_str(&node.to_html()),
            }
        }
        out.into()
    }

    fn split<'t>(&'t self, text: &'t str) -> Vec<Piece<'t>> {
        let mut pieces = Vec::new();
        let mut rest = text;
        while let Some(open) = rest.find(OPEN) {
            let after = &rest[open + OPEN.len_utf8()..];
            let stashed = after.find(CLOSE).and_then(|close| {
                let index: usize = after[..close].parse().ok()?;
                Some((self.items.get(index)?, close))
            });
            match stashed {
                Some((node, close)) => {
                    pieces.push(Piece::Text(&rest[..open]));
                    pieces.push(Piece::Stashed(node));
                    rest = &after[close + CLOSE.len_utf8()..];
                }
                None => {
                    let end = open + OPEN.len_utf8();
                    pieces.push(Piece::Text(&rest[..end]));
                    rest = &rest[end..];
                }
            }
        }
        pieces.push(Piece::Text(rest));
        pieces
    }
}
