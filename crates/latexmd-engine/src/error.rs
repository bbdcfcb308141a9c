use std::fmt;

/// The command whose argument failed label validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Label,
    Ref,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Command::Label => "label",
            Command::Ref => "ref",
        })
    }
}

/// Failures that abort a conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid {command} format: {name:?}")]
    InvalidLabelFormat { command: Command, name: String },
    #[error("duplicate label: {name}")]
    DuplicateLabel { name: String },
    #[error("{count} labels found in one block, extra label: {extra}")]
    MultipleLabels { count: usize, extra: String },
    #[error("unresolved reference: {name}")]
    UnresolvedReference { name: String },
    #[error("line {line}: proof started while another proof is open")]
    ProofAlreadyOpen { line: usize },
    #[error("line {line}: proof end marker without an open proof")]
    DanglingProofEnd { line: usize },
    #[error("line {line}: {category} block inside an open proof")]
    TheoremInProof { category: String, line: usize },
}
