#![forbid(unsafe_code)]

//! Bottleneck/loss path optimization over capacitated, lossy directed networks.
//!
//! Two solvers share the [`Network`] model:
//! - [`Gwpp`] (Algorithm 1) turns the multiplicative loss objective into additive
//!   `-ln` lengths, repeatedly asks a [`ShortestPathOracle`] for the shortest path and
//!   contracts its most saturated arc into an artificial source arc until the bottleneck
//!   leaves the source.
//! - [`best_values`] (Algorithm 2) is a read-only max-heap label-correcting search for the
//!   best `loss * min(capacity, value)` label of every node.
//!
//! ```
//! let mut network = gwpp::generate::paper_network()?;
//! let solution = gwpp::solve(&mut network)?;
//! assert_eq!(solution.path, ["S", "4", "5", "T"]);
//! assert_eq!(solution.bottleneck, 4);
//! # Ok::<(), gwpp::Error>(())
//! ```

pub mod config;
pub mod convergence;
pub mod error;
pub mod experiment;
pub mod generate;
pub mod io;
pub mod label_correcting;
pub mod length;
pub mod model;
pub mod oracle;
pub mod rewrite;
pub mod saturation;

pub use gwpp_graph as graph;

pub use config::SolveOptions;
pub use convergence::{Gwpp, IterationRecord, Solution, solve};
pub use error::{Error, Result};
pub use label_correcting::{Label, LabelResult, Settled, best_values, best_values_for};
pub use model::{Arc, Network, PathMetrics};
pub use oracle::{Dijkstra, ShortestPathOracle};
pub use saturation::SaturatedArc;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
