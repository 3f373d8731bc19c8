//! Shortest-path oracles.
//!
//! The contraction loop only needs "the minimum-length simple source→sink path under the
//! current arc lengths". [`ShortestPathOracle`] is that capability; [`Dijkstra`] is the
//! sequential implementation shipped with the crate.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{Error, Result};
use crate::model::Network;

pub trait ShortestPathOracle {
    /// Minimum-length simple path from `source` to `sink`, endpoints included.
    fn shortest_path(&self, network: &Network, source: &str, sink: &str) -> Result<Vec<String>>;

    /// Whether every length must be non-negative before the oracle is queried.
    ///
    /// When this returns `true` the solver shifts all lengths up front and applies the same
    /// shift to every artificial arc it creates.
    fn requires_non_negative(&self) -> bool {
        false
    }
}

impl<T: ShortestPathOracle + ?Sized> ShortestPathOracle for &T {
    fn shortest_path(&self, network: &Network, source: &str, sink: &str) -> Result<Vec<String>> {
        (**self).shortest_path(network, source, sink)
    }

    fn requires_non_negative(&self) -> bool {
        (**self).requires_non_negative()
    }
}

/// Binary-heap Dijkstra with deterministic tie-breaking (earliest push wins).
///
/// The default mode tolerates negative lengths on arcs leaving the source, which is the only
/// place length assignment produces them: the source is settled first and nothing ever
/// relaxes back into a settled node. [`Dijkstra::strict`] rejects any negative length instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dijkstra {
    strict: bool,
}

impl Dijkstra {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

#[derive(Debug, Clone, Copy)]
struct HeapEntry {
    dist: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // Reversed on both keys: `BinaryHeap` is a max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl ShortestPathOracle for Dijkstra {
    fn shortest_path(&self, network: &Network, source: &str, sink: &str) -> Result<Vec<String>> {
        let g = network.graph();
        let missing = |node: &str| Error::MissingNode {
            node: node.to_string(),
        };
        let s = g.node_ix(source).ok_or_else(|| missing(source))?;
        let t = g.node_ix(sink).ok_or_else(|| missing(sink))?;

        let n = g.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<usize>> = vec![None; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();
        let mut seq: u64 = 0;

        dist[s] = 0.0;
        heap.push(HeapEntry {
            dist: 0.0,
            seq,
            node: s,
        });

        while let Some(HeapEntry { dist: d, node: u, .. }) = heap.pop() {
            if settled[u] {
                continue;
            }
            settled[u] = true;
            if u == t {
                break;
            }

            for (w, arc) in g.out_arcs_ix(u) {
                let length = arc.length();
                if self.strict && length < 0.0 {
                    return Err(Error::NegativeLength {
                        from: g.node_id(u).unwrap_or_default().to_string(),
                        to: g.node_id(w).unwrap_or_default().to_string(),
                        length,
                    });
                }
                if settled[w] {
                    continue;
                }
                let candidate = d + length;
                if candidate < dist[w] {
                    dist[w] = candidate;
                    pred[w] = Some(u);
                    seq += 1;
                    heap.push(HeapEntry {
                        dist: candidate,
                        seq,
                        node: w,
                    });
                }
            }
        }

        if !settled[t] {
            return Err(Error::Unreachable {
                from: source.to_string(),
                to: sink.to_string(),
            });
        }

        let mut path: Vec<String> = Vec::new();
        let mut cur = Some(t);
        while let Some(v) = cur {
            path.push(g.node_id(v).unwrap_or_default().to_string());
            cur = pred[v];
        }
        path.reverse();
        tracing::trace!(?path, length = dist[t], "dijkstra");
        Ok(path)
    }

    fn requires_non_negative(&self) -> bool {
        self.strict
    }
}
