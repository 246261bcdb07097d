/// An alternate test case derived from a basis scenario.
///
/// Variants run through the same phase pipeline as the basis test case,
/// under their own `kind` label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variant<T> {
    pub tc: T,
    /// Must be non-empty unless the variant is skipped.
    pub kind: String,
    /// Omit the variant entirely. It still occupies an index.
    pub skip: bool,
    /// Run the variant's test case as-is even when a clone function exists.
    pub skip_clone: bool,
}

impl<T> Variant<T> {
    pub fn new(kind: impl Into<String>, tc: T) -> Self {
        Self {
            tc,
            kind: kind.into(),
            skip: false,
            skip_clone: false,
        }
    }

    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    pub fn skip_clone(mut self) -> Self {
        self.skip_clone = true;
        self
    }
}
