//! Logarithmic arc lengths.
//!
//! Multiplying losses along a path is summing `-ln(loss)`. Arcs leaving the source also fold
//! in their capacity, `-ln(loss * capacity)`, which steers the search toward branches with a
//! large immediate bottleneck.

use crate::model::Network;

pub fn arc_length(leaves_source: bool, capacity: u32, loss: f64) -> f64 {
    if leaves_source {
        -(loss * f64::from(capacity)).ln()
    } else {
        -loss.ln()
    }
}

/// Assigns every arc its length from its current loss and capacity.
pub fn assign_lengths(network: &mut Network) {
    let source = network.source().to_string();
    network.graph_mut().for_each_arc_mut(|key, arc| {
        let length = arc_length(key.from == source, arc.capacity(), arc.loss());
        arc.set_length(length);
    });
}

pub fn min_length(network: &Network) -> Option<f64> {
    network
        .arcs()
        .map(|(_, arc)| arc.length())
        .min_by(|a, b| a.total_cmp(b))
}

/// Shifts every length by `max(0, -min_length) + 1` so all lengths become positive.
///
/// Returns the shift constant; arcs created afterwards must add it to their own length.
pub fn shift_to_non_negative(network: &mut Network) -> f64 {
    let Some(min) = min_length(network) else {
        return 0.0;
    };
    let shift = (-min).max(0.0) + 1.0;
    network.graph_mut().for_each_arc_mut(|_, arc| {
        let length = arc.length() + shift;
        arc.set_length(length);
    });
    tracing::debug!(shift, "shifted arc lengths to non-negative");
    shift
}
