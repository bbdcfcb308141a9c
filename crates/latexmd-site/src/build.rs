use crate::manifest::{Manifest, ManifestError, ProcessorKind};
use crate::processors::{
    MarkdownProcessor, PassProcessor, ProcessError, Processor, TemplateProcessor,
};
use crate::templates::{TemplateError, load_templates};
use latexmd_config::SiteConfig;
use latexmd_engine::Converter;
use relative_path::{RelativePath, RelativePathBuf};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Templates(#[from] TemplateError),
    #[error("error building file {path}: {source}")]
    File {
        path: RelativePathBuf,
        source: ProcessError,
    },
}

/// Files written by one build, as paths relative to the target directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub written: Vec<RelativePathBuf>,
}

struct Processors {
    pass: PassProcessor,
    template: TemplateProcessor,
    markdown: MarkdownProcessor,
}

impl Processors {
    fn get(&self, kind: ProcessorKind) -> &dyn Processor {
        match kind {
            ProcessorKind::Pass => &self.pass,
            ProcessorKind::Template => &self.template,
            ProcessorKind::Markdown => &self.markdown,
        }
    }
}

/// Builds the site described by `config`: reads the manifest, then processes
/// every file set in order, writing results under the target directory.
///
/// Stops at the first failing file.
pub fn build_site(config: &SiteConfig) -> Result<BuildSummary, BuildError> {
    let manifest = Manifest::load(&config.manifest_path())?;
    log::debug!(
        "manifest {} lists {} files",
        config.manifest_path().display(),
        manifest.file_count()
    );

    let template_files: Vec<RelativePathBuf> = manifest
        .filesets
        .iter()
        .filter(|set| set.processor == ProcessorKind::Template)
        .flat_map(|set| set.files.iter().cloned())
        .collect();

    let converter = Arc::new(Converter::new());
    let tera = Arc::new(load_templates(
        &config.src,
        &config.template_extensions,
        &template_files,
        converter.clone(),
    )?);
    let processors = Processors {
        pass: PassProcessor::new(&config.src),
        template: TemplateProcessor::new(tera.clone()),
        markdown: MarkdownProcessor::new(&config.src, tera, converter),
    };

    let mut summary = BuildSummary::default();
    for fileset in &manifest.filesets {
        let processor = processors.get(fileset.processor);
        for path in &fileset.files {
            let target = build_file(processor, path, &config.tgt).map_err(|source| {
                BuildError::File {
                    path: path.clone(),
                    source,
                }
            })?;
            log::info!("built {path} -> {target}");
            summary.written.push(target);
        }
    }
    Ok(summary)
}

fn build_file(
    processor: &dyn Processor,
    path: &RelativePath,
    tgt: &Path,
) -> Result<RelativePathBuf, ProcessError> {
    let processed = processor.process(path)?;
    let target = processor.target(path);
    let full = target.to_path(tgt);
    let io_err = |source| ProcessError::Io {
        path: full.clone(),
        source,
    };

    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(&full, processed).map_err(io_err)?;
    Ok(target)
}
