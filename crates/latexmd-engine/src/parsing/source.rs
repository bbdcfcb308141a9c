use xi_rope::Rope;

/// Document text held in a rope for offset to line lookups.
pub struct Source {
    rope: Rope,
}

impl Source {
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from(text),
        }
    }

    /// 1-based line holding byte `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.rope.line_of_offset(offset.min(self.rope.len())) + 1
    }
}
