//! Manifest-driven static site builder.
//!
//! A site is a source directory, a manifest listing which files to build and
//! how, and a target directory. Markdown pages go through the latexmd engine
//! and are wrapped in Tera templates.

pub mod build;
pub mod manifest;
pub mod meta;
pub mod processors;
pub mod templates;

pub use build::{BuildError, BuildSummary, build_site};
pub use manifest::{FileSet, Manifest, ManifestError, ProcessorKind};
pub use processors::{
    MarkdownFilter, MarkdownProcessor, PassProcessor, ProcessError, Processor, TemplateProcessor,
};
