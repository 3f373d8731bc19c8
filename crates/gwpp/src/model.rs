//! Capacitated, lossy network model.
//!
//! A [`Network`] is a simple digraph whose arcs carry a capacity (integer, `>= 1`) and a loss
//! factor in `(0, 1]`, plus the source/sink pair a solve runs between. Arcs created by
//! contraction are [`Arc::Artificial`] and remember the original path segment they replace.

use crate::error::{Error, Result};
use gwpp_graph::{ArcKey, Graph};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Arc {
    Real {
        capacity: u32,
        loss: f64,
        length: f64,
    },
    Artificial {
        capacity: u32,
        loss: f64,
        length: f64,
        /// Source-to-head node sequence over original arcs.
        stored_prefix: Vec<String>,
    },
}

impl Arc {
    /// A real arc; its length is assigned when a solve starts.
    pub fn real(capacity: u32, loss: f64) -> Self {
        Self::Real {
            capacity,
            loss,
            length: 0.0,
        }
    }

    pub fn capacity(&self) -> u32 {
        match self {
            Self::Real { capacity, .. } | Self::Artificial { capacity, .. } => *capacity,
        }
    }

    pub fn loss(&self) -> f64 {
        match self {
            Self::Real { loss, .. } | Self::Artificial { loss, .. } => *loss,
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Self::Real { length, .. } | Self::Artificial { length, .. } => *length,
        }
    }

    pub fn set_length(&mut self, value: f64) {
        match self {
            Self::Real { length, .. } | Self::Artificial { length, .. } => *length = value,
        }
    }

    /// Empty for real arcs.
    pub fn stored_prefix(&self) -> &[String] {
        match self {
            Self::Real { .. } => &[],
            Self::Artificial { stored_prefix, .. } => stored_prefix,
        }
    }

    pub fn is_artificial(&self) -> bool {
        matches!(self, Self::Artificial { .. })
    }
}

pub(crate) fn validate_arc_attrs(from: &str, to: &str, capacity: u32, loss: f64) -> Result<()> {
    if capacity < 1 {
        return Err(Error::invalid(format!(
            "arc {from} -> {to}: capacity must be >= 1 (got {capacity})"
        )));
    }
    if !(loss > 0.0 && loss <= 1.0) {
        return Err(Error::invalid(format!(
            "arc {from} -> {to}: loss must be in (0, 1] (got {loss})"
        )));
    }
    Ok(())
}

/// Bottleneck capacity and cumulative loss of a walked path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathMetrics {
    pub bottleneck: u32,
    pub loss: f64,
}

#[derive(Debug, Clone)]
pub struct Network {
    graph: Graph<Arc>,
    source: String,
    sink: String,
}

impl Network {
    pub fn new(source: impl Into<String>, sink: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let sink = sink.into();
        if source == sink {
            return Err(Error::invalid(format!(
                "source and sink must differ (both are {source})"
            )));
        }
        let mut graph = Graph::new();
        graph.ensure_node(source.clone());
        graph.ensure_node(sink.clone());
        Ok(Self {
            graph,
            source,
            sink,
        })
    }

    /// Builds a network from `(from, to, capacity, loss)` tuples.
    pub fn from_arcs<'a, I>(source: &str, sink: &str, arcs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, u32, f64)>,
    {
        let mut network = Self::new(source, sink)?;
        for (from, to, capacity, loss) in arcs {
            network.add_arc(from, to, capacity, loss)?;
        }
        Ok(network)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn graph(&self) -> &Graph<Arc> {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut Graph<Arc> {
        &mut self.graph
    }

    pub fn add_node(&mut self, id: impl Into<String>) {
        self.graph.ensure_node(id);
    }

    /// Inserts (or overwrites) the real arc `from -> to`.
    pub fn add_arc(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        capacity: u32,
        loss: f64,
    ) -> Result<()> {
        let from = from.into();
        let to = to.into();
        if from == to {
            return Err(Error::invalid(format!("self-loop on {from} is not allowed")));
        }
        validate_arc_attrs(&from, &to, capacity, loss)?;
        self.graph.set_arc(from, to, Arc::real(capacity, loss));
        Ok(())
    }

    pub fn arc(&self, from: &str, to: &str) -> Option<&Arc> {
        self.graph.arc(from, to)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.graph.has_node(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.arc_count()
    }

    pub fn arcs(&self) -> impl Iterator<Item = (&ArcKey, &Arc)> {
        self.graph.arcs()
    }

    pub fn artificial_arc_count(&self) -> usize {
        self.graph.arcs().filter(|(_, a)| a.is_artificial()).count()
    }

    pub fn validate(&self) -> Result<()> {
        for id in [&self.source, &self.sink] {
            if !self.graph.has_node(id) {
                return Err(Error::MissingNode { node: id.clone() });
            }
        }
        for (key, arc) in self.graph.arcs() {
            if key.from == key.to {
                return Err(Error::invalid(format!("self-loop on {}", key.from)));
            }
            validate_arc_attrs(&key.from, &key.to, arc.capacity(), arc.loss())?;
        }
        Ok(())
    }

    /// Walks `path` over the current arcs and reports its bottleneck and cumulative loss.
    pub fn walk(&self, path: &[String]) -> Result<PathMetrics> {
        walk_with(path, |from, to| {
            self.graph.arc(from, to).map(|a| (a.capacity(), a.loss()))
        })
    }
}

pub(crate) fn walk_with<F>(path: &[String], mut lookup: F) -> Result<PathMetrics>
where
    F: FnMut(&str, &str) -> Option<(u32, f64)>,
{
    if path.len() < 2 {
        return Err(Error::EmptyPath { len: path.len() });
    }
    let mut bottleneck = u32::MAX;
    let mut loss = 1.0;
    for pair in path.windows(2) {
        let (from, to) = (pair[0].as_str(), pair[1].as_str());
        let (capacity, arc_loss) = lookup(from, to).ok_or_else(|| Error::missing_arc(from, to))?;
        bottleneck = bottleneck.min(capacity);
        loss *= arc_loss;
    }
    Ok(PathMetrics { bottleneck, loss })
}
