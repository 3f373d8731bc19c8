//! Timing both solvers over batches of random networks.

use std::time::Instant;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::convergence::Gwpp;
use crate::error::{Error, Result};
use crate::generate::{RandomNetworkOptions, random_network};
use crate::label_correcting::best_values;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub instances: usize,
    pub nodes: usize,
    pub paths: usize,
    pub probability: f64,
}

impl ExperimentConfig {
    pub const fn new(instances: usize, nodes: usize, paths: usize, probability: f64) -> Self {
        Self {
            instances,
            nodes,
            paths,
            probability,
        }
    }

    fn network_options(&self) -> RandomNetworkOptions {
        RandomNetworkOptions {
            nodes: self.nodes,
            probability: self.probability,
            paths: self.paths,
        }
    }
}

/// Averages over the instances of one configuration. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentStats {
    pub nodes: usize,
    pub paths: usize,
    pub avg_edges: f64,
    pub average_time_alg1: f64,
    pub average_time_alg2: f64,
    pub probability: f64,
}

/// The sixteen configurations of the published benchmark, one instance each.
pub fn default_configs() -> Vec<ExperimentConfig> {
    [
        (1000, 0.5),
        (1000, 0.7),
        (1000, 0.9),
        (2000, 0.1),
        (2000, 0.15),
        (2000, 0.6),
        (2000, 0.6),
        (5000, 0.1),
        (5000, 0.2),
        (5000, 0.3),
        (10000, 0.15),
        (10000, 0.3),
        (10000, 0.5),
        (15000, 0.15),
        (20000, 0.15),
        (25000, 0.15),
    ]
    .into_iter()
    .map(|(nodes, probability)| ExperimentConfig::new(1, nodes, 10, probability))
    .collect()
}

/// Generates `config.instances` networks and times the label-correcting search, then the
/// contraction solve, on each.
pub fn run_experiment<R: Rng + ?Sized>(
    config: &ExperimentConfig,
    solver: &Gwpp,
    rng: &mut R,
) -> Result<ExperimentStats> {
    if config.instances == 0 {
        return Err(Error::invalid("instances must be at least 1"));
    }

    let options = config.network_options();
    let mut edges = 0usize;
    let mut alg1 = 0.0;
    let mut alg2 = 0.0;
    for instance in 0..config.instances {
        let mut network = random_network(&options, rng)?;
        edges += network.arc_count();

        let started = Instant::now();
        best_values(&network)?;
        alg2 += started.elapsed().as_secs_f64();

        let started = Instant::now();
        let solution = solver.solve(&mut network)?;
        alg1 += started.elapsed().as_secs_f64();

        tracing::debug!(
            instance,
            nodes = config.nodes,
            iterations = solution.iterations,
            "experiment instance done"
        );
    }

    let n = config.instances as f64;
    Ok(ExperimentStats {
        nodes: config.nodes,
        paths: config.paths,
        avg_edges: edges as f64 / n,
        average_time_alg1: alg1 / n,
        average_time_alg2: alg2 / n,
        probability: config.probability,
    })
}

/// Runs every configuration from one seeded generator.
pub fn run_experiments(
    configs: &[ExperimentConfig],
    solver: &Gwpp,
    seed: u64,
) -> Result<Vec<ExperimentStats>> {
    let mut rng = StdRng::seed_from_u64(seed);
    configs
        .iter()
        .map(|config| -> Result<ExperimentStats> {
            let stats = run_experiment(config, solver, &mut rng)?;
            tracing::info!(
                nodes = stats.nodes,
                avg_edges = stats.avg_edges,
                alg1 = stats.average_time_alg1,
                alg2 = stats.average_time_alg2,
                "experiment configuration done"
            );
            Ok(stats)
        })
        .collect()
}
