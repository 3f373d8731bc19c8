//! The contraction loop (Algorithm 1).
//!
//! Each iteration asks the oracle for the shortest source→sink path, finds its most saturated
//! arc and, unless that arc already leaves the source, contracts it into an artificial source
//! arc. Every contraction removes one arc that does not leave the source and only ever adds
//! arcs that do, so the loop is bounded by the number of arcs.

use std::time::{Duration, Instant};

use gwpp_graph::alg;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::SolveOptions;
use crate::error::{Error, Result};
use crate::length::{assign_lengths, shift_to_non_negative};
use crate::model::{Arc, Network, PathMetrics, walk_with};
use crate::oracle::{Dijkstra, ShortestPathOracle};
use crate::rewrite::{contract, erase_loops};
use crate::saturation::{SaturatedArc, most_saturated_arc};

/// One pass of the loop, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    /// Shortest path returned by the oracle (may start with an artificial arc).
    pub path: Vec<String>,
    pub saturated: SaturatedArc,
    /// `false` only for the final iteration.
    pub contracted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Source→sink path over original arcs.
    pub path: Vec<String>,
    /// Capacity of the final saturated arc, which leaves the source.
    pub bottleneck: u32,
    /// Product of the original losses along `path`.
    pub loss: f64,
    pub iterations: usize,
    /// Constant added to every length; `0.0` unless the oracle required it.
    pub shift: f64,
    pub trace: Vec<IterationRecord>,
}

impl Solution {
    pub fn contractions(&self) -> usize {
        self.trace.iter().filter(|r| r.contracted).count()
    }
}

enum SolveState {
    Iterating,
    Done {
        path: Vec<String>,
        saturated: SaturatedArc,
    },
}

/// Original attributes of arcs a contraction took out of the network.
#[derive(Default)]
struct Displaced {
    arcs: FxHashMap<(String, String), (u32, f64)>,
}

impl Displaced {
    fn lookup(&self, network: &Network, from: &str, to: &str) -> Option<(u32, f64)> {
        match network.arc(from, to) {
            Some(Arc::Real { capacity, loss, .. }) => Some((*capacity, *loss)),
            _ => self
                .arcs
                .get(&(from.to_string(), to.to_string()))
                .copied(),
        }
    }
}

/// Contraction solver over a pluggable shortest-path oracle.
#[derive(Debug, Clone)]
pub struct Gwpp<O = Dijkstra> {
    oracle: O,
    options: SolveOptions,
}

impl Default for Gwpp<Dijkstra> {
    fn default() -> Self {
        Self::new()
    }
}

impl Gwpp<Dijkstra> {
    pub fn new() -> Self {
        Self::from_options(SolveOptions::default())
    }

    /// Uses [`Dijkstra::strict`] when `options.strict_oracle` is set.
    pub fn from_options(options: SolveOptions) -> Self {
        let oracle = if options.strict_oracle {
            Dijkstra::strict()
        } else {
            Dijkstra::default()
        };
        Self { oracle, options }
    }
}

impl<O: ShortestPathOracle> Gwpp<O> {
    pub fn with_oracle(oracle: O, options: SolveOptions) -> Self {
        Self { oracle, options }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Runs the loop to completion. The network is left in its final contracted state.
    pub fn solve(&self, network: &mut Network) -> Result<Solution> {
        self.options.validate()?;
        network.validate()?;

        // The iteration budget bounds the loop on cyclic networks.
        if tracing::enabled!(tracing::Level::DEBUG) {
            let cycles = alg::find_cycles(network.graph());
            if !cycles.is_empty() {
                tracing::debug!(cycles = cycles.len(), "network has directed cycles");
            }
        }

        assign_lengths(network);
        let shift = if self.oracle.requires_non_negative() {
            shift_to_non_negative(network)
        } else {
            0.0
        };

        let budget = self
            .options
            .max_iterations
            .unwrap_or(network.arc_count() + 1);
        let deadline = self.options.oracle_deadline();
        let source = network.source().to_string();
        let sink = network.sink().to_string();

        let mut displaced = Displaced::default();
        let mut trace: Vec<IterationRecord> = Vec::new();

        let (walk, saturated) = loop {
            if trace.len() >= budget {
                return Err(Error::CycleSuspected {
                    iterations: trace.len(),
                });
            }
            let path = self.query(network, &source, &sink, deadline)?;
            let saturated = most_saturated_arc(network, &path)?;
            tracing::debug!(
                iteration = trace.len() + 1,
                from = %saturated.from,
                to = %saturated.to,
                capacity = saturated.capacity,
                "saturated arc"
            );

            let state = if saturated.from == source {
                SolveState::Done {
                    path: path.clone(),
                    saturated: saturated.clone(),
                }
            } else {
                for arc in contract(network, &path, &saturated, shift)? {
                    displaced.arcs.insert((arc.from, arc.to), (arc.capacity, arc.loss));
                }
                SolveState::Iterating
            };

            let contracted = matches!(state, SolveState::Iterating);
            trace.push(IterationRecord {
                path,
                saturated,
                contracted,
            });
            if let SolveState::Done { path, saturated } = state {
                break (path, saturated);
            }
        };

        let path = reconstruct(network, &walk, &saturated);
        let PathMetrics { loss, .. } =
            walk_with(&path, |from, to| displaced.lookup(network, from, to))?;

        tracing::debug!(
            iterations = trace.len(),
            bottleneck = saturated.capacity,
            loss,
            "solve finished"
        );
        Ok(Solution {
            path,
            bottleneck: saturated.capacity,
            loss,
            iterations: trace.len(),
            shift,
            trace,
        })
    }

    /// Solves a copy and hands back the contracted copy alongside the solution.
    pub fn solve_cloned(&self, network: &Network) -> Result<(Solution, Network)> {
        let mut network = network.clone();
        let solution = self.solve(&mut network)?;
        Ok((solution, network))
    }

    fn query(
        &self,
        network: &Network,
        source: &str,
        sink: &str,
        deadline: Option<Duration>,
    ) -> Result<Vec<String>> {
        let started = Instant::now();
        let path = self.oracle.shortest_path(network, source, sink)?;
        if let Some(deadline) = deadline {
            let elapsed = started.elapsed();
            if elapsed > deadline {
                return Err(Error::OracleDeadline { elapsed, deadline });
            }
        }
        if path.first().map(String::as_str) != Some(source)
            || path.last().map(String::as_str) != Some(sink)
        {
            return Err(Error::invalid(format!(
                "oracle returned a path that does not run from {source} to {sink}"
            )));
        }
        Ok(path)
    }
}

/// Replaces a leading artificial arc by the prefix it stands for.
fn reconstruct(network: &Network, walk: &[String], saturated: &SaturatedArc) -> Vec<String> {
    let prefix = network
        .arc(&saturated.from, &saturated.to)
        .map(Arc::stored_prefix)
        .unwrap_or_default();
    if prefix.is_empty() {
        return walk.to_vec();
    }
    let mut path = prefix.to_vec();
    path.extend_from_slice(&walk[saturated.position + 2..]);
    erase_loops(path)
}

/// Solves with the default oracle and options.
pub fn solve(network: &mut Network) -> Result<Solution> {
    Gwpp::new().solve(network)
}
