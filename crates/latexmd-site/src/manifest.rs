//! The build manifest: an ordered list of file sets, each handled by one processor.

use relative_path::RelativePathBuf;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse manifest at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    Pass,
    #[serde(alias = "jinja")]
    Template,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileSet {
    pub processor: ProcessorKind,
    #[serde(default)]
    pub files: Vec<RelativePathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub filesets: Vec<FileSet>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(text)
    }

    /// Total number of files across all file sets.
    pub fn file_count(&self) -> usize {
        self.filesets.iter().map(|set| set.files.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn parses_filesets_in_order() {
        let manifest = Manifest::from_yaml(
            "- processor: pass\n  files: [style.css, img/logo.png]\n- processor: markdown\n  files:\n    - notes/groups.md\n",
        )
        .unwrap();

        assert_eq!(manifest.filesets.len(), 2);
        assert_eq!(manifest.filesets[0].processor, ProcessorKind::Pass);
        assert_eq!(
            manifest.filesets[0].files,
            vec![
                RelativePathBuf::from("style.css"),
                RelativePathBuf::from("img/logo.png")
            ]
        );
        assert_eq!(manifest.filesets[1].processor, ProcessorKind::Markdown);
        assert_eq!(manifest.file_count(), 3);
    }

    #[rstest]
    #[case("pass", ProcessorKind::Pass)]
    #[case("template", ProcessorKind::Template)]
    #[case("jinja", ProcessorKind::Template)]
    #[case("markdown", ProcessorKind::Markdown)]
    fn processor_names(#[case] name: &str, #[case] expected: ProcessorKind) {
        let manifest =
            Manifest::from_yaml(&format!("- processor: {name}\n  files: [a]\n")).unwrap();
        assert_eq!(manifest.filesets[0].processor, expected);
    }

    #[test]
    fn unknown_processor_is_rejected() {
        assert!(Manifest::from_yaml("- processor: sass\n  files: [a.scss]\n").is_err());
    }

    #[test]
    fn missing_manifest_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("manifest.yaml");

        let err = Manifest::load(&path).unwrap_err();

        assert!(matches!(err, ManifestError::Read { .. }));
        assert!(err.to_string().contains("manifest.yaml"));
    }
}
