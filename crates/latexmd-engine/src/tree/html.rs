use super::Element;

const VOID: &[&str] = &["br", "hr", "img"];

/// Serializes an element and its children to HTML on one line.
pub fn to_html(e: &Element) -> String {
    let mut out = e.open_tag();
    if VOID.contains(&e.tag.as_str()) {
        return out;
    }
    for child in &e.children {
        out.push_str(&child.to_html());
    }
    out.push_str(&e.close_tag());
    out
}

impl Element {
    /// `<tag attr="value" ...>`, or `<tag ... />` for void elements.
    pub fn open_tag(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push_str(if VOID.contains(&self.tag.as_str()) {
            " />"
        } else {
            ">"
        });
        out
    }

    pub fn close_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}
