//! Metadata header split off the top of a markdown document.
//!
//! ```text
//! ---
//! title: Groups
//! template: page.html
//! macros: macros/algebra.tex
//!     macros/groups.tex
//! ---
//! Body starts here.
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}([A-Za-z0-9_-]+):\s*(.*)$").expect("Invalid meta key regex")
});
static META_MORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {4,}(.*)$").expect("Invalid meta continuation regex"));
static BEGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-{3}(\s.*)?$").expect("Invalid meta begin regex"));
static END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-{3}|\.{3})(\s.*)?$").expect("Invalid meta end regex"));

/// Parsed header: lowercased keys mapping to every value given for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    values: HashMap<String, Vec<String>>,
}

impl Meta {
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits `source` into its metadata header and the remaining body.
pub fn split(source: &str) -> (Meta, String) {
    let mut lines = source.lines().peekable();
    let mut meta = Meta::default();

    if lines.peek().is_some_and(|line| BEGIN_RE.is_match(line)) {
        lines.next();
    }

    let mut key: Option<String> = None;
    let mut kept = None;
    for line in lines.by_ref() {
        if line.trim().is_empty() || END_RE.is_match(line) {
            break;
        }
        if let Some(caps) = META_RE.captures(line) {
            let k = caps[1].to_lowercase();
            meta.values
                .entry(k.clone())
                .or_default()
                .push(caps[2].trim().to_string());
            key = Some(k);
        } else if let (Some(caps), Some(k)) = (META_MORE_RE.captures(line), &key) {
            meta.values
                .entry(k.clone())
                .or_default()
                .push(caps[1].trim().to_string());
        } else {
            kept = Some(line);
            break;
        }
    }

    let body: Vec<&str> = kept.into_iter().chain(lines).collect();
    (meta, body.join("\n"))
}
