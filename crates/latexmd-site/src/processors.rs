//! Per-file processors: each turns one source file into the bytes of its target.

use crate::meta;
use latexmd_engine::{ConvertError, Converter};
use relative_path::{RelativePath, RelativePathBuf};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tera::{Tera, Value};

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to render template {name}: {source}")]
    Template { name: String, source: tera::Error },
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error("Missing metadata key: {key}")]
    MissingMeta { key: &'static str },
}

impl ProcessError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| ProcessError::Io { path, source }
    }
}

pub trait Processor {
    /// Produces the bytes written for the source file at `path`.
    fn process(&self, path: &RelativePath) -> Result<Vec<u8>, ProcessError>;

    /// Where the output for `path` lands, relative to the target directory.
    fn target(&self, path: &RelativePath) -> RelativePathBuf {
        path.to_relative_path_buf()
    }
}

/// Copies files unchanged.
pub struct PassProcessor {
    src: PathBuf,
}

impl PassProcessor {
    pub fn new(src: impl Into<PathBuf>) -> Self {
        Self { src: src.into() }
    }
}

impl Processor for PassProcessor {
    fn process(&self, path: &RelativePath) -> Result<Vec<u8>, ProcessError> {
        let full = path.to_path(&self.src);
        std::fs::read(&full).map_err(ProcessError::io(&full))
    }
}

/// Renders the file itself as a template.
pub struct TemplateProcessor {
    tera: Arc<Tera>,
    build_time: f64,
}

impl TemplateProcessor {
    pub fn new(tera: Arc<Tera>) -> Self {
        let build_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default();
        Self { tera, build_time }
    }
}

impl Processor for TemplateProcessor {
    fn process(&self, path: &RelativePath) -> Result<Vec<u8>, ProcessError> {
        let mut context = tera::Context::new();
        context.insert("BUILD_TIME", &self.build_time);
        render(&self.tera, path.as_str(), &context)
    }
}

/// Converts a markdown document and wraps it in the template named by its `template` key.
pub struct MarkdownProcessor {
    src: PathBuf,
    tera: Arc<Tera>,
    converter: Arc<Converter>,
}

impl MarkdownProcessor {
    pub fn new(src: impl Into<PathBuf>, tera: Arc<Tera>, converter: Arc<Converter>) -> Self {
        Self {
            src: src.into(),
            tera,
            converter,
        }
    }

    fn read(&self, path: &RelativePath) -> Result<String, ProcessError> {
        let full = path.to_path(&self.src);
        std::fs::read_to_string(&full).map_err(ProcessError::io(&full))
    }
}

impl Processor for MarkdownProcessor {
    fn process(&self, path: &RelativePath) -> Result<Vec<u8>, ProcessError> {
        let source = self.read(path)?;
        let (meta, body) = meta::split(&source);
        let html = self.converter.convert(&body)?.into_html();

        let template = meta
            .first("template")
            .ok_or(ProcessError::MissingMeta { key: "template" })?;
        let macros = meta
            .get("macros")
            .unwrap_or_default()
            .iter()
            .map(|name| self.read(RelativePath::new(name)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut context = tera::Context::new();
        context.insert("markdown", &html);
        context.insert("macros", &macros.join("\n"));
        context.insert("title", meta.first("title").unwrap_or_default());
        render(&self.tera, template, &context)
    }

    fn target(&self, path: &RelativePath) -> RelativePathBuf {
        match path.as_str().strip_suffix(".md") {
            Some(stem) => RelativePathBuf::from(format!("{stem}.html")),
            None => path.to_relative_path_buf(),
        }
    }
}

fn render(tera: &Tera, name: &str, context: &tera::Context) -> Result<Vec<u8>, ProcessError> {
    tera.render(name, context)
        .map(String::into_bytes)
        .map_err(|source| ProcessError::Template {
            name: name.to_string(),
            source,
        })
}

/// The `markdown` template filter: converts a string and wraps the HTML in
/// `<div class="markdown">`. Its output is not escaped.
pub struct MarkdownFilter {
    converter: Arc<Converter>,
}

impl MarkdownFilter {
    pub fn new(converter: Arc<Converter>) -> Self {
        Self { converter }
    }
}

impl tera::Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("markdown filter expects a string"))?;
        let html = self
            .converter
            .convert(text)
            .map_err(|err| tera::Error::chain("markdown conversion failed", err))?
            .into_html();
        Ok(Value::String(format!(
            "<div class=\"markdown\">\n{html}</div>\n"
        )))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::load_templates;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn tera_for(root: &Path, extra: &[&str]) -> Arc<Tera> {
        let extra: Vec<RelativePathBuf> = extra.iter().map(|p| RelativePathBuf::from(*p)).collect();
        let extensions = vec!["html".to_string()];
        Arc::new(load_templates(root, &extensions, &extra, Arc::new(Converter::new())).unwrap())
    }

    #[test]
    fn pass_processor_copies_bytes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("logo.bin"), [0u8, 159, 146, 150]).unwrap();

        let processor = PassProcessor::new(dir.path());
        let path = RelativePath::new("logo.bin");

        assert_eq!(processor.process(path).unwrap(), vec![0u8, 159, 146, 150]);
        assert_eq!(processor.target(path), RelativePathBuf::from("logo.bin"));
    }

    #[test]
    fn pass_processor_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = PassProcessor::new(dir.path())
            .process(RelativePath::new("nope.css"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Io { .. }));
    }

    #[test]
    fn markdown_processor_fills_template() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "page.html",
            "<title>{{ title }}</title><script>{{ macros | safe }}</script>{{ markdown | safe }}",
        );
        write(dir.path(), "macros/a.tex", "\\newcommand{\\R}{\\mathbb{R}}");
        write(dir.path(), "macros/b.tex", "\\newcommand{\\N}{\\mathbb{N}}");
        write(
            dir.path(),
            "notes/groups.md",
            "title: Groups\ntemplate: page.html\nmacros: macros/a.tex\n    macros/b.tex\n\nLemma: $x$ is *fine*.",
        );

        let processor =
            MarkdownProcessor::new(dir.path(), tera_for(dir.path(), &[]), Arc::new(Converter::new()));
        let path = RelativePath::new("notes/groups.md");
        let out = String::from_utf8(processor.process(path).unwrap()).unwrap();

        assert_eq!(
            out,
            "<title>Groups</title>\
             <script>\\newcommand{\\R}{\\mathbb{R}}\n\\newcommand{\\N}{\\mathbb{N}}</script>\
             <p class=\"lemma-container\"><a class=\"theorem-like-title lemma-title\" name=\"theorem-ref-1\">Lemma 1.</a> \\(x\\) is <em>fine</em>.</p>\n"
        );
        assert_eq!(processor.target(path), RelativePathBuf::from("notes/groups.html"));
    }

    #[test]
    fn markdown_without_template_key_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bare.md", "title: Bare\n\nText.");

        let processor =
            MarkdownProcessor::new(dir.path(), tera_for(dir.path(), &[]), Arc::new(Converter::new()));
        let err = processor.process(RelativePath::new("bare.md")).unwrap_err();

        assert!(matches!(err, ProcessError::MissingMeta { key: "template" }));
    }

    #[test]
    fn markdown_conversion_errors_propagate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "page.html", "{{ markdown }}");
        write(dir.path(), "bad.md", "template: page.html\n\nSee ref[missing].");

        let processor =
            MarkdownProcessor::new(dir.path(), tera_for(dir.path(), &[]), Arc::new(Converter::new()));
        let err = processor.process(RelativePath::new("bad.md")).unwrap_err();

        assert!(matches!(
            err,
            ProcessError::Convert(ConvertError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn template_processor_markdown_filter_and_build_time() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "index.html",
            "{% set intro = \"Definition: a *group*.\" %}{{ intro | markdown }}{% if BUILD_TIME > 0 %}built{% endif %}",
        );

        let processor = TemplateProcessor::new(tera_for(dir.path(), &[]));
        let out = String::from_utf8(processor.process(RelativePath::new("index.html")).unwrap())
            .unwrap();

        assert_eq!(
            out,
            "<div class=\"markdown\">\n\
             <p class=\"definition-container\"><a class=\"theorem-like-title definition-title\" name=\"theorem-ref-1\">Definition 1.</a> a <em>group</em>.</p>\n</div>\n\
             built"
        );
    }

    #[test]
    fn markdown_filter_uses_fresh_numbering_per_call() {
        let filter = MarkdownFilter::new(Arc::new(Converter::new()));
        let args = HashMap::new();
        let value = Value::String("Theorem: A.".into());

        let first = tera::Filter::filter(&filter, &value, &args).unwrap();
        let second = tera::Filter::filter(&filter, &value, &args).unwrap();

        assert_eq!(first, second);
        assert!(first.as_str().unwrap().contains("Theorem 1."));
    }

    #[test]
    fn markdown_filter_rejects_non_strings() {
        let filter = MarkdownFilter::new(Arc::new(Converter::new()));
        let result = tera::Filter::filter(&filter, &Value::Bool(true), &HashMap::new());
        assert!(result.is_err());
    }

    #[test]
    fn template_processor_unknown_template() {
        let dir = TempDir::new().unwrap();
        let processor = TemplateProcessor::new(tera_for(dir.path(), &[]));
        let err = processor
            .process(RelativePath::new("missing.html"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Template { .. }));
    }
}
