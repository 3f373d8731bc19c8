//! JSON persistence of networks.
//!
//! Only real arcs are stored. Lengths are derived when a solve starts and are not persisted.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Network;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArcRecord {
    pub from: String,
    pub to: String,
    pub capacity: u32,
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkDocument {
    pub source: String,
    pub sink: String,
    /// Nodes without arcs; nodes named by an arc are implied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub arcs: Vec<ArcRecord>,
}

impl NetworkDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

impl TryFrom<&NetworkDocument> for Network {
    type Error = Error;

    fn try_from(doc: &NetworkDocument) -> Result<Self> {
        let mut network = Network::new(doc.source.as_str(), doc.sink.as_str())?;
        for id in &doc.nodes {
            network.add_node(id.as_str());
        }
        for arc in &doc.arcs {
            if network.arc(&arc.from, &arc.to).is_some() {
                return Err(Error::invalid(format!(
                    "duplicate arc {} -> {}",
                    arc.from, arc.to
                )));
            }
            network.add_arc(arc.from.as_str(), arc.to.as_str(), arc.capacity, arc.loss)?;
        }
        Ok(network)
    }
}

impl TryFrom<NetworkDocument> for Network {
    type Error = Error;

    fn try_from(doc: NetworkDocument) -> Result<Self> {
        Network::try_from(&doc)
    }
}

impl From<&Network> for NetworkDocument {
    fn from(network: &Network) -> Self {
        let arcs: Vec<ArcRecord> = network
            .arcs()
            .filter(|(_, arc)| !arc.is_artificial())
            .map(|(key, arc)| ArcRecord {
                from: key.from.clone(),
                to: key.to.clone(),
                capacity: arc.capacity(),
                loss: arc.loss(),
            })
            .collect();
        let touched: FxHashSet<&str> = arcs
            .iter()
            .flat_map(|a| [a.from.as_str(), a.to.as_str()])
            .collect();
        let nodes = network
            .graph()
            .nodes()
            .filter(|&id| id != network.source() && id != network.sink() && !touched.contains(id))
            .map(str::to_string)
            .collect();
        Self {
            source: network.source().to_string(),
            sink: network.sink().to_string(),
            nodes,
            arcs,
        }
    }
}

/// Loads a [`Network`] from a JSON document.
pub fn network_from_json(text: &str) -> Result<Network> {
    Network::try_from(&NetworkDocument::from_json_str(text)?)
}

pub fn network_to_json(network: &Network, pretty: bool) -> Result<String> {
    NetworkDocument::from(network).to_json_string(pretty)
}
