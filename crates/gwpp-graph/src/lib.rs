//! Directed graph container used by the `gwpp` solvers.
//!
//! A simple digraph: string node ids, at most one arc per ordered pair, arbitrary arc labels.
//! Helper traversals live in [`alg`].

mod graph;

pub use graph::{ArcKey, Graph, alg};
