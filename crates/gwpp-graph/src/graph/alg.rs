//! Traversal helpers over [`Graph`](super::Graph).

use super::Graph;
use std::collections::{BTreeMap, BTreeSet};

/// Depth-first preorder of everything reachable from `roots`, following arc direction.
pub fn preorder<E>(g: &Graph<E>, roots: &[&str]) -> Vec<String> {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<&str> = Vec::new();

    for &root in roots {
        if !g.has_node(root) {
            continue;
        }
        stack.push(root);
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            out.push(v.to_string());
            // Reverse so the first successor is visited first.
            let succ = g.successors(v);
            for w in succ.into_iter().rev() {
                if !visited.contains(w) {
                    stack.push(w);
                }
            }
        }
    }
    out
}

pub fn is_reachable<E>(g: &Graph<E>, from: &str, to: &str) -> bool {
    preorder(g, &[from]).iter().any(|v| v == to)
}

/// Strongly connected components with more than one node, plus self-loops.
///
/// Each cycle is listed in node insertion order; cycles are ordered by their earliest node.
/// The search keeps its own frame stack, so path depth is bounded by memory, not the call stack.
pub fn find_cycles<E>(g: &Graph<E>) -> Vec<Vec<String>> {
    struct Tarjan<'a, E> {
        g: &'a Graph<E>,
        index: usize,
        stack: Vec<usize>,
        on_stack: Vec<bool>,
        indices: Vec<Option<usize>>,
        lowlink: Vec<usize>,
        // (node, position of the next successor to look at)
        frames: Vec<(usize, usize)>,
        sccs: Vec<Vec<usize>>,
    }

    impl<E> Tarjan<'_, E> {
        fn enter(&mut self, v: usize) {
            self.indices[v] = Some(self.index);
            self.lowlink[v] = self.index;
            self.index += 1;
            self.stack.push(v);
            self.on_stack[v] = true;
            self.frames.push((v, 0));
        }

        fn strongconnect(&mut self, root: usize) {
            self.enter(root);
            while let Some(frame) = self.frames.last_mut() {
                let (v, pos) = *frame;
                if let Some(w) = self.g.out_head_ix(v, pos) {
                    frame.1 += 1;
                    match self.indices[w] {
                        None => self.enter(w),
                        Some(w_idx) if self.on_stack[w] => {
                            self.lowlink[v] = self.lowlink[v].min(w_idx);
                        }
                        Some(_) => {}
                    }
                    continue;
                }

                self.frames.pop();
                if let Some(&(parent, _)) = self.frames.last() {
                    self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
                }

                if Some(self.lowlink[v]) == self.indices[v] {
                    let mut scc: Vec<usize> = Vec::new();
                    loop {
                        let Some(w) = self.stack.pop() else {
                            debug_assert!(false, "tarjan stack underflow");
                            break;
                        };
                        self.on_stack[w] = false;
                        scc.push(w);
                        if w == v {
                            break;
                        }
                    }
                    self.sccs.push(scc);
                }
            }
        }
    }

    let n = g.node_count();
    let mut tarjan = Tarjan {
        g,
        index: 0,
        stack: Vec::new(),
        on_stack: vec![false; n],
        indices: vec![None; n],
        lowlink: vec![0; n],
        frames: Vec::new(),
        sccs: Vec::new(),
    };

    for v in 0..n {
        if tarjan.indices[v].is_none() {
            tarjan.strongconnect(v);
        }
    }

    let mut cycles: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for mut scc in tarjan.sccs {
        let is_cycle = scc.len() > 1 || {
            let v = scc[0];
            g.out_arcs_ix(v).any(|(w, _)| w == v)
        };
        if !is_cycle {
            continue;
        }
        // Dense indices follow insertion order.
        scc.sort_unstable();
        let ids: Vec<String> = scc
            .iter()
            .filter_map(|&ix| g.node_id(ix).map(str::to_string))
            .collect();
        cycles.insert(scc[0], ids);
    }
    cycles.into_values().collect()
}
