//! Small owned HTML fragments produced by the LaTeX stages: theorem
//! anchors, proof titles and reference links.

mod html;

pub use html::to_html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Text, escaped on serialization.
    Text(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn to_html(&self) -> String {
        match self {
            Node::Element(e) => to_html(e),
            Node::Text(t) => html_escape::encode_text(t).into_owned(),
        }
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push(Node::text(text));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a child; adjacent text nodes are merged.
    pub fn push(&mut self, node: impl Into<Node>) {
        match (self.children.last_mut(), node.into()) {
            (_, Node::Text(t)) if t.is_empty() => {}
            (Some(Node::Text(prev)), Node::Text(t)) => prev.push_str(&t),
            (_, node) => self.children.push(node),
        }
    }
}
