//! Instance producers: the fixed paper network and seeded random networks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Network;

pub const SOURCE: &str = "S";
pub const SINK: &str = "T";

const PAPER_ARCS: [(&str, &str, u32, f64); 15] = [
    ("S", "2", 7, 0.86),
    ("S", "3", 8, 0.73),
    ("S", "4", 10, 0.82),
    ("2", "3", 6, 0.8),
    ("2", "5", 10, 0.74),
    ("3", "2", 5, 0.9),
    ("3", "4", 6, 0.7),
    ("3", "5", 3, 0.89),
    ("4", "3", 5, 0.9),
    ("4", "5", 13, 0.68),
    ("5", "6", 1, 0.9),
    ("5", "7", 8, 0.2),
    ("5", "T", 4, 0.5),
    ("6", "T", 3, 0.89),
    ("7", "T", 9, 0.3),
];

/// The eight-node worked example from the GWPP paper, `S` to `T`.
pub fn paper_network() -> Result<Network> {
    Network::from_arcs(SOURCE, SINK, PAPER_ARCS)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RandomNetworkOptions {
    /// Total node count, `S` and `T` included.
    pub nodes: usize,
    /// Probability of an arc between each ordered pair of inner nodes.
    pub probability: f64,
    /// Number of random `S → … → T` chains laid over the inner nodes.
    pub paths: usize,
}

impl Default for RandomNetworkOptions {
    fn default() -> Self {
        Self {
            nodes: 10,
            probability: 0.1,
            paths: 2,
        }
    }
}

impl RandomNetworkOptions {
    pub fn validate(&self) -> Result<()> {
        if self.nodes < 2 {
            return Err(Error::invalid(format!(
                "nodes must be at least 2 (got {})",
                self.nodes
            )));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::invalid(format!(
                "probability must be in [0, 1] (got {})",
                self.probability
            )));
        }
        if self.paths < 1 {
            return Err(Error::invalid(
                "paths must be at least 1 so the sink is reachable",
            ));
        }
        Ok(())
    }
}

/// Random directed network with at least `options.paths` source→sink chains.
///
/// Inner nodes are named `"0"` to `"{nodes - 3}"`. Each chain visits every inner node in a
/// fresh random order, so chains may overwrite arcs drawn earlier. Capacities are uniform in
/// `1..=10`, losses in `0.1..0.99`.
pub fn random_network<R: Rng + ?Sized>(
    options: &RandomNetworkOptions,
    rng: &mut R,
) -> Result<Network> {
    options.validate()?;

    let inner: Vec<String> = (0..options.nodes - 2).map(|i| i.to_string()).collect();
    let mut network = Network::new(SOURCE, SINK)?;
    for id in &inner {
        network.add_node(id.as_str());
    }

    for from in &inner {
        for to in &inner {
            if from != to && rng.gen_bool(options.probability) {
                add_random_arc(&mut network, from, to, rng)?;
            }
        }
    }

    let mut order: Vec<&str> = inner.iter().map(String::as_str).collect();
    for _ in 0..options.paths {
        order.shuffle(rng);
        let chain: Vec<&str> = std::iter::once(SOURCE)
            .chain(order.iter().copied())
            .chain(std::iter::once(SINK))
            .collect();
        for pair in chain.windows(2) {
            add_random_arc(&mut network, pair[0], pair[1], rng)?;
        }
    }

    tracing::debug!(
        nodes = network.node_count(),
        arcs = network.arc_count(),
        "generated random network"
    );
    Ok(network)
}

/// [`random_network`] driven by `StdRng::seed_from_u64(seed)`.
pub fn random_network_seeded(options: &RandomNetworkOptions, seed: u64) -> Result<Network> {
    let mut rng = StdRng::seed_from_u64(seed);
    random_network(options, &mut rng)
}

fn add_random_arc<R: Rng + ?Sized>(
    network: &mut Network,
    from: &str,
    to: &str,
    rng: &mut R,
) -> Result<()> {
    let capacity = rng.gen_range(1..=10);
    let loss = rng.gen_range(0.1..0.99);
    network.add_arc(from, to, capacity, loss)
}
