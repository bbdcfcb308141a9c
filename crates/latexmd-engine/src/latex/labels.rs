use std::collections::HashMap;

use crate::error::{Command, ConvertError};

/// Whether `name` is a usable label: non-empty ASCII letters, digits, `-` and `_`.
pub fn is_valid_label(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn validate(command: Command, name: &str) -> Result<(), ConvertError> {
    if is_valid_label(name) {
        Ok(())
    } else {
        Err(ConvertError::InvalidLabelFormat {
            command,
            name: name.to_string(),
        })
    }
}

/// Label name to theorem number, for one conversion.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: HashMap<String, u32>,
}

impl LabelTable {
    /// Binds `name` to `number`. Labels are never rebound.
    pub fn insert(&mut self, name: &str, number: u32) -> Result<(), ConvertError> {
        validate(Command::Label, name)?;
        if self.labels.contains_key(name) {
            return Err(ConvertError::DuplicateLabel {
                name: name.to_string(),
            });
        }
        self.labels.insert(name.to_string(), number);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
