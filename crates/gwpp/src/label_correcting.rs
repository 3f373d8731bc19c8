//! Label-correcting search (Algorithm 2).
//!
//! A node's label is the best value `loss(u, n) * min(capacity(u, n), value(u))` over all
//! source→n paths, with the source itself labelled `+∞`. Labels are popped from a max-heap, so
//! settled values never increase and the graph is only read.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Network;

/// Best value and path for one node. Unreachable nodes keep `0.0` and an empty path.
///
/// The source's `+∞` serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub node: String,
    pub value: f64,
    pub path: Vec<String>,
}

impl Label {
    pub fn is_reachable(&self) -> bool {
        !self.path.is_empty()
    }
}

/// A non-stale pop from the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settled {
    pub node: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelResult {
    source: String,
    labels: Vec<Label>,
    settle_order: Vec<Settled>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl LabelResult {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Labels in node insertion order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn label(&self, node: &str) -> Option<&Label> {
        self.index.get(node).map(|&ix| &self.labels[ix])
    }

    pub fn value(&self, node: &str) -> Option<f64> {
        self.label(node).map(|l| l.value)
    }

    pub fn path(&self, node: &str) -> Option<&[String]> {
        self.label(node).map(|l| l.path.as_slice())
    }

    pub fn settle_order(&self) -> &[Settled] {
        &self.settle_order
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    value: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Highest value first; among equals, the earliest push.
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Labels every node of `network` from its source.
pub fn best_values(network: &Network) -> Result<LabelResult> {
    let g = network.graph();
    let source = network.source();
    let s = g.node_ix(source).ok_or_else(|| Error::MissingNode {
        node: source.to_string(),
    })?;

    let n = g.node_count();
    let mut best = vec![0.0_f64; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut settle: Vec<(usize, f64)> = Vec::new();
    let mut heap = BinaryHeap::new();
    let mut seq: u64 = 0;

    best[s] = f64::INFINITY;
    heap.push(QueueEntry {
        value: f64::INFINITY,
        seq,
        node: s,
    });

    while let Some(QueueEntry { value, node: u, .. }) = heap.pop() {
        if value < best[u] {
            continue;
        }
        settle.push((u, value));

        for (w, arc) in g.out_arcs_ix(u) {
            let candidate = arc.loss() * f64::from(arc.capacity()).min(value);
            if candidate > best[w] {
                tracing::trace!(
                    from = g.node_id(u).unwrap_or_default(),
                    to = g.node_id(w).unwrap_or_default(),
                    value = candidate,
                    "improved label"
                );
                best[w] = candidate;
                pred[w] = Some(u);
                seq += 1;
                heap.push(QueueEntry {
                    value: candidate,
                    seq,
                    node: w,
                });
            }
        }
    }

    let id = |ix: usize| g.node_id(ix).unwrap_or_default().to_string();
    let mut index = FxHashMap::default();
    let mut labels = Vec::with_capacity(n);
    for ix in 0..n {
        let path = if ix == s || pred[ix].is_some() {
            let mut path = Vec::new();
            let mut cur = Some(ix);
            // The predecessor links form a tree rooted at the source; `n` hops bound any walk.
            while let Some(v) = cur {
                if path.len() > n {
                    break;
                }
                path.push(id(v));
                cur = pred[v];
            }
            path.reverse();
            path
        } else {
            Vec::new()
        };
        index.insert(id(ix), ix);
        labels.push(Label {
            node: id(ix),
            value: best[ix],
            path,
        });
    }

    Ok(LabelResult {
        source: source.to_string(),
        labels,
        settle_order: settle
            .into_iter()
            .map(|(ix, value)| Settled {
                node: id(ix),
                value,
            })
            .collect(),
        index,
    })
}

/// Labels for several target nodes from one read-only run.
pub fn best_values_for(network: &Network, targets: &[&str]) -> Result<Vec<Label>> {
    let result = best_values(network)?;
    targets
        .iter()
        .map(|&t| {
            result.label(t).cloned().ok_or_else(|| Error::MissingNode {
                node: t.to_string(),
            })
        })
        .collect()
}
