//! Contraction of a saturated arc into an artificial source arc.

use crate::error::{Error, Result};
use crate::length::arc_length;
use crate::model::{Arc, Network};
use crate::saturation::SaturatedArc;

/// An original arc displaced from the network by a contraction.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacedArc {
    pub from: String,
    pub to: String,
    pub capacity: u32,
    pub loss: f64,
}

/// Replaces the saturated arc `(u, v)` (with `u != source`) by an artificial arc
/// `(source, v)` that remembers `path[..=v]`.
///
/// Any arc already on `(source, v)` is overwritten. `shift` is the constant previously added
/// to every length (zero when the oracle accepts negative lengths). Returns the real arcs the
/// contraction displaced: always `(u, v)`, plus the original `(source, v)` if it was real.
pub fn contract(
    network: &mut Network,
    path: &[String],
    saturated: &SaturatedArc,
    shift: f64,
) -> Result<Vec<DisplacedArc>> {
    let source = network.source().to_string();
    if saturated.from == source {
        return Err(Error::invalid(format!(
            "arc {} -> {} already leaves the source",
            saturated.from, saturated.to
        )));
    }
    let head_pos = saturated.position + 1;
    if path.get(saturated.position) != Some(&saturated.from)
        || path.get(head_pos) != Some(&saturated.to)
    {
        return Err(Error::invalid(format!(
            "arc {} -> {} is not at position {} of the path",
            saturated.from, saturated.to, saturated.position
        )));
    }

    let arc = network
        .arc(&saturated.from, &saturated.to)
        .ok_or_else(|| Error::missing_arc(&saturated.from, &saturated.to))?;
    let (capacity, loss) = (arc.capacity(), arc.loss());
    let stored_prefix = expand_prefix(network, &path[..=head_pos]);

    let artificial = Arc::Artificial {
        capacity,
        loss,
        length: arc_length(true, capacity, loss) + shift,
        stored_prefix,
    };

    let graph = network.graph_mut();
    let mut displaced = Vec::with_capacity(2);
    if let Some(Arc::Real { capacity, loss, .. }) =
        graph.set_arc(source.clone(), saturated.to.clone(), artificial)
    {
        displaced.push(DisplacedArc {
            from: source,
            to: saturated.to.clone(),
            capacity,
            loss,
        });
    }
    if let Some(Arc::Real { capacity, loss, .. }) =
        graph.remove_arc(&saturated.from, &saturated.to)
    {
        displaced.push(DisplacedArc {
            from: saturated.from.clone(),
            to: saturated.to.clone(),
            capacity,
            loss,
        });
    }

    tracing::debug!(
        from = %saturated.from,
        to = %saturated.to,
        capacity,
        "contracted saturated arc into the source"
    );
    Ok(displaced)
}

/// Rewrites a path segment that starts at the source so it only uses original arcs.
///
/// Only arcs leaving the source can be artificial, so at most the first hop is expanded.
pub(crate) fn expand_prefix(network: &Network, segment: &[String]) -> Vec<String> {
    let leading: &[String] = match segment {
        [a, b, ..] => network.arc(a, b).map(Arc::stored_prefix).unwrap_or_default(),
        _ => &[],
    };
    if leading.is_empty() {
        return segment.to_vec();
    }
    let mut out: Vec<String> = Vec::with_capacity(leading.len() + segment.len());
    out.extend_from_slice(leading);
    out.extend_from_slice(&segment[2..]);
    erase_loops(out)
}

/// Splices out every revisit so each node appears at most once.
///
/// Dropping a closed sub-walk keeps the walk connected and can only raise its bottleneck and
/// its cumulative loss factor.
pub(crate) fn erase_loops(walk: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(walk.len());
    for node in walk {
        if let Some(pos) = out.iter().position(|v| *v == node) {
            tracing::debug!(node = %node, "erased a loop from the reconstructed path");
            out.truncate(pos + 1);
        } else {
            out.push(node);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(nodes: &[&str]) -> Vec<String> {
        nodes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn erase_loops_keeps_simple_walks() {
        assert_eq!(erase_loops(p(&["s", "a", "t"])), p(&["s", "a", "t"]));
    }

    #[test]
    fn erase_loops_splices_revisits() {
        assert_eq!(
            erase_loops(p(&["s", "a", "b", "a", "c", "t"])),
            p(&["s", "a", "c", "t"])
        );
    }
}
