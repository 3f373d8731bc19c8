//! Bottleneck detection along a candidate path.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Network;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaturatedArc {
    pub from: String,
    pub to: String,
    pub capacity: u32,
    /// Index of `from` in the path; `to` sits at `position + 1`.
    pub position: usize,
}

/// Minimum-capacity arc on `path`. Ties go to the earliest arc.
pub fn most_saturated_arc(network: &Network, path: &[String]) -> Result<SaturatedArc> {
    if path.len() < 2 {
        return Err(Error::EmptyPath { len: path.len() });
    }

    let mut best: Option<SaturatedArc> = None;
    for (position, pair) in path.windows(2).enumerate() {
        let (from, to) = (pair[0].as_str(), pair[1].as_str());
        let arc = network
            .arc(from, to)
            .ok_or_else(|| Error::missing_arc(from, to))?;
        let capacity = arc.capacity();
        if best.as_ref().is_none_or(|b| capacity < b.capacity) {
            best = Some(SaturatedArc {
                from: from.to_string(),
                to: to.to_string(),
                capacity,
                position,
            });
        }
    }

    best.ok_or(Error::EmptyPath { len: path.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(nodes: &[&str]) -> Vec<String> {
        nodes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ties_resolve_to_the_leftmost_arc() {
        let network = Network::from_arcs(
            "s",
            "t",
            [("s", "a", 5, 0.9), ("a", "b", 2, 0.9), ("b", "t", 2, 0.9)],
        )
        .unwrap();
        let arc = most_saturated_arc(&network, &path(&["s", "a", "b", "t"])).unwrap();
        assert_eq!((arc.from.as_str(), arc.to.as_str()), ("a", "b"));
        assert_eq!(arc.capacity, 2);
        assert_eq!(arc.position, 1);
    }

    #[test]
    fn degenerate_paths_are_rejected() {
        let network = Network::new("s", "t").unwrap();
        assert!(matches!(
            most_saturated_arc(&network, &path(&["s"])),
            Err(Error::EmptyPath { len: 1 })
        ));
        assert!(matches!(
            most_saturated_arc(&network, &[]),
            Err(Error::EmptyPath { len: 0 })
        ));
    }

    #[test]
    fn unknown_arcs_are_reported() {
        let network = Network::new("s", "t").unwrap();
        assert!(matches!(
            most_saturated_arc(&network, &path(&["s", "t"])),
            Err(Error::MissingArc { .. })
        ));
    }
}
