//! Loading the Tera template set from the site source directory.

use crate::processors::MarkdownFilter;
use latexmd_engine::Converter;
use relative_path::RelativePathBuf;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::Tera;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Failed to scan template directory {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to load templates: {0}")]
    Tera(#[from] tera::Error),
}

/// Builds the template set: every file under `src` with one of `extensions`,
/// plus the explicitly listed `extra` files, each named by its path relative to `src`.
///
/// The `markdown` filter is registered on the returned instance.
pub fn load_templates(
    src: &Path,
    extensions: &[String],
    extra: &[RelativePathBuf],
    converter: Arc<Converter>,
) -> Result<Tera, TemplateError> {
    let mut names = Vec::new();
    if src.is_dir() {
        scan_directory_recursive(src, src, extensions, &mut names)?;
    }
    for path in extra {
        if !names.contains(path) {
            names.push(path.clone());
        }
    }
    names.sort();

    let files: Vec<(PathBuf, Option<String>)> = names
        .iter()
        .map(|name| (name.to_path(src), Some(name.to_string())))
        .collect();
    log::debug!("loading {} templates from {}", files.len(), src.display());

    let mut tera = Tera::default();
    tera.register_filter("markdown", MarkdownFilter::new(converter));
    tera.add_template_files(files)?;
    Ok(tera)
}

fn scan_directory_recursive(
    root: &Path,
    dir: &Path,
    extensions: &[String],
    names: &mut Vec<RelativePathBuf>,
) -> Result<(), TemplateError> {
    let scan_err = |source| TemplateError::Scan {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();

        if path.is_dir() {
            scan_directory_recursive(root, &path, extensions, names)?;
        } else if let Some(ext) = path.extension().and_then(|ext| ext.to_str())
            && extensions.iter().any(|wanted| wanted == ext)
            && let Ok(rel) = path.strip_prefix(root)
            && let Ok(name) = RelativePathBuf::from_path(rel)
        {
            names.push(name);
        }
    }
    Ok(())
}
