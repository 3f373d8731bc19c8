//! Arc key types.
//!
//! A simple digraph has at most one arc per ordered `(from, to)` pair, so the pair is the key.

use std::hash::{Hash, Hasher};

#[derive(Clone, Copy)]
pub(in crate::graph) struct ArcKeyView<'a> {
    pub(in crate::graph) from: &'a str,
    pub(in crate::graph) to: &'a str,
}

// Must hash exactly like `ArcKey` so borrowed lookups hit the owned entries.
impl Hash for ArcKeyView<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl hashbrown::Equivalent<ArcKey> for ArcKeyView<'_> {
    fn equivalent(&self, key: &ArcKey) -> bool {
        key.from == self.from && key.to == self.to
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArcKey {
    pub from: String,
    pub to: String,
}

impl ArcKey {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Hash for ArcKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.from.hash(state);
        self.to.hash(state);
    }
}
