//! Markdown to HTML conversion with LaTeX-style theorem, proof, label/ref
//! and math idioms, on top of pulldown-cmark.
//!
//! ```
//! let html = latexmd_engine::markdown_to_html("Theorem: label[inf] $p$ is prime.\n\nSee ref[inf].")?;
//! assert!(html.contains(r##"<a href="#theorem-ref-1">1</a>"##));
//! # Ok::<(), latexmd_engine::ConvertError>(())
//! ```

pub mod error;
pub mod latex;
pub mod parsing;
pub mod pipeline;
pub mod tree;

pub use error::{Command, ConvertError};
pub use latex::{Category, Context, LabelTable, normalize};
pub use pipeline::{Conversion, Converter, markdown_to_html};
pub use tree::{Element, Node, to_html};
