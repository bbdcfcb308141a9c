use super::labels::LabelTable;

/// Whether a proof container is accepting paragraphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProofSpan {
    #[default]
    Closed,
    Open {
        /// Container depth of the paragraph that started the proof.
        depth: usize,
        /// 1-based line of that paragraph.
        line: usize,
    },
}

/// Per-conversion state threaded through every stage call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub labels: LabelTable,
    pub(crate) theorems: u32,
    pub proof: ProofSpan,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number the next theorem-like block receives. Starts at 1.
    pub fn next_theorem_number(&self) -> u32 {
        self.theorems + 1
    }

    pub fn advance_theorem(&mut self) {
        self.theorems += 1;
    }

    pub fn proof_open(&self) -> bool {
        matches!(self.proof, ProofSpan::Open { .. })
    }
}
