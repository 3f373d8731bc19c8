//! Directed graph container.
//!
//! Nodes are string ids kept in insertion order. Arcs are keyed by the ordered `(from, to)`
//! pair, so inserting an arc whose endpoints already carry one replaces its label in place.
//! Out/in adjacency is maintained eagerly on every mutation so that read-only queries stay on
//! `&self` without interior mutability, which keeps `&Graph<E>` shareable across threads.

use rustc_hash::FxBuildHasher;

pub mod alg;
mod arc_key;

pub use arc_key::ArcKey;
use arc_key::ArcKeyView;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone)]
struct NodeEntry {
    id: String,
    out: Vec<usize>,
    in_: Vec<usize>,
}

#[derive(Debug, Clone)]
struct ArcEntry<E> {
    key: ArcKey,
    from_ix: usize,
    to_ix: usize,
    label: E,
}

#[derive(Debug, Clone)]
pub struct Graph<E> {
    nodes: Vec<NodeEntry>,
    node_index: HashMap<String, usize>,

    arcs: Vec<ArcEntry<E>>,
    arc_index: HashMap<ArcKey, usize>,
}

impl<E> Default for Graph<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Graph<E> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            arcs: Vec::new(),
            arc_index: HashMap::default(),
        }
    }

    fn arc_index_of(&self, from: &str, to: &str) -> Option<usize> {
        self.arc_index.get(&ArcKeyView { from, to }).copied()
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Adds `id` if it is not present yet and returns its dense index.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> usize {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            return ix;
        }
        let ix = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            out: Vec::new(),
            in_: Vec::new(),
        });
        self.node_index.insert(id, ix);
        ix
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Dense index of `id`, stable for the lifetime of the graph (nodes are never removed).
    pub fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub fn node_id(&self, ix: usize) -> Option<&str> {
        self.nodes.get(ix).map(|n| n.id.as_str())
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn arcs(&self) -> impl Iterator<Item = (&ArcKey, &E)> {
        self.arcs.iter().map(|a| (&a.key, &a.label))
    }

    pub fn for_each_arc_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&ArcKey, &mut E),
    {
        for a in &mut self.arcs {
            f(&a.key, &mut a.label);
        }
    }

    /// Inserts the arc `from -> to`, creating missing endpoints.
    ///
    /// Returns the label previously stored on the same ordered pair, if any.
    pub fn set_arc(&mut self, from: impl Into<String>, to: impl Into<String>, label: E) -> Option<E> {
        let from = from.into();
        let to = to.into();
        if let Some(ix) = self.arc_index_of(&from, &to) {
            return Some(std::mem::replace(&mut self.arcs[ix].label, label));
        }

        let from_ix = self.ensure_node(from.clone());
        let to_ix = self.ensure_node(to.clone());
        let ix = self.arcs.len();
        let key = ArcKey { from, to };
        self.arcs.push(ArcEntry {
            key: key.clone(),
            from_ix,
            to_ix,
            label,
        });
        self.arc_index.insert(key, ix);
        self.nodes[from_ix].out.push(ix);
        self.nodes[to_ix].in_.push(ix);
        None
    }

    pub fn arc(&self, from: &str, to: &str) -> Option<&E> {
        let ix = self.arc_index_of(from, to)?;
        Some(&self.arcs[ix].label)
    }

    /// Removes `from -> to` and returns its label.
    ///
    /// Arc storage is compacted with a swap-remove; per-node adjacency lists keep their
    /// relative order.
    pub fn remove_arc(&mut self, from: &str, to: &str) -> Option<E> {
        let ix = self.arc_index_of(from, to)?;
        let _ = self.arc_index.remove_entry(&ArcKeyView { from, to });

        let (from_ix, to_ix) = (self.arcs[ix].from_ix, self.arcs[ix].to_ix);
        self.nodes[from_ix].out.retain(|&a| a != ix);
        self.nodes[to_ix].in_.retain(|&a| a != ix);

        let last = self.arcs.len() - 1;
        let removed = self.arcs.swap_remove(ix);
        if ix != last {
            let moved = &self.arcs[ix];
            if let Some(slot) = self.arc_index.get_mut(&moved.key) {
                *slot = ix;
            }
            for a in self.nodes[moved.from_ix].out.iter_mut() {
                if *a == last {
                    *a = ix;
                }
            }
            for a in self.nodes[moved.to_ix].in_.iter_mut() {
                if *a == last {
                    *a = ix;
                }
            }
        }
        Some(removed.label)
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        self.out_arcs(v).map(|(w, _)| w).collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        self.nodes[v_ix]
            .in_
            .iter()
            .map(|&a| self.arcs[a].key.from.as_str())
            .collect()
    }

    /// Out-arcs of `v` as `(head, label)` in insertion order.
    pub fn out_arcs<'a>(&'a self, v: &str) -> impl Iterator<Item = (&'a str, &'a E)> + use<'a, E> {
        let out: &'a [usize] = match self.node_index.get(v) {
            Some(&v_ix) => self.nodes[v_ix].out.as_slice(),
            None => &[],
        };
        out.iter().map(move |&a| {
            let arc = &self.arcs[a];
            (arc.key.to.as_str(), &arc.label)
        })
    }

    /// Out-arcs of the node at `v_ix` as `(head index, label)`.
    pub fn out_arcs_ix(&self, v_ix: usize) -> impl Iterator<Item = (usize, &E)> {
        let out: &[usize] = match self.nodes.get(v_ix) {
            Some(n) => n.out.as_slice(),
            None => &[],
        };
        out.iter().map(move |&a| {
            let arc = &self.arcs[a];
            (arc.to_ix, &arc.label)
        })
    }

    /// Head index of the `pos`-th out-arc of `v_ix`.
    fn out_head_ix(&self, v_ix: usize, pos: usize) -> Option<usize> {
        let a = *self.nodes.get(v_ix)?.out.get(pos)?;
        Some(self.arcs[a].to_ix)
    }

    pub fn out_degree(&self, v: &str) -> usize {
        self.node_index
            .get(v)
            .map_or(0, |&ix| self.nodes[ix].out.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_remove_keeps_index_and_adjacency_consistent() {
        let mut g: Graph<i32> = Graph::new();
        g.set_arc("a", "b", 1);
        g.set_arc("a", "c", 2);
        g.set_arc("b", "c", 3);
        g.set_arc("c", "d", 4);

        assert_eq!(g.remove_arc("a", "b"), Some(1));
        assert_eq!(g.arc_count(), 3);
        assert_eq!(g.arc("c", "d"), Some(&4));
        assert_eq!(g.successors("a"), vec!["c"]);
        assert_eq!(g.successors("c"), vec!["d"]);
        assert_eq!(g.predecessors("d"), vec!["c"]);
        assert_eq!(g.predecessors("c"), vec!["a", "b"]);

        for (key, label) in g.arcs() {
            assert_eq!(g.arc(&key.from, &key.to), Some(label));
        }
    }
}
