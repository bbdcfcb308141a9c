//! LaTeX authoring idioms on top of the host markdown engine.
//!
//! Block stages: [`TheoremStage`], [`ProofStage`]. Inline stages:
//! [`MathSpan`] (one per delimiter syntax) and [`Reference`]. All
//! per-document state lives in [`Context`].

pub mod context;
pub mod labels;
pub mod math;
pub mod proof;
pub mod reference;
pub mod theorem;

pub use context::{Context, ProofSpan};
pub use labels::LabelTable;
pub use math::{MathDelimiter, MathSpan, normalize};
pub use proof::{ProofMarks, ProofStage};
pub use reference::Reference;
pub use theorem::{Category, TheoremStage};
