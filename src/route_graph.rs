//! Route graph: a linear chain of stations carrying inspection counts,
//! shaped for a graph renderer (nodes `{id, label, witness, hold}`,
//! edges `{source, target}`).

use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};

use crate::error::SpoolError;
use crate::load::{InspectionLoad, StationLoad};
use crate::topology::Topology;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
    pub id: String,
    pub label: String,
    pub witness: u64,
    pub hold: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGraph {
    pub nodes: Vec<RouteNode>,
    pub edges: Vec<RouteEdge>,
}

impl RouteGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&RouteNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// petgraph view of the chain; node indices follow `nodes` order.
    pub fn to_digraph(&self) -> DiGraph<RouteNode, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<_> = self
            .nodes
            .iter()
            .map(|n| graph.add_node(n.clone()))
            .collect();
        for pair in indices.windows(2) {
            graph.add_edge(pair[0], pair[1], ());
        }
        graph
    }

    pub fn to_json(&self) -> Result<String, SpoolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One node per station in `order`, one edge per adjacent pair.
///
/// Counts come from `load`, `{0, 0}` for stations it does not know. The
/// result is always a simple path regardless of how spools actually route.
pub fn build_route_graph<S: AsRef<str>>(order: &[S], load: &InspectionLoad) -> RouteGraph {
    build_labelled(order, load, |station| station.to_string())
}

/// Route graph over the canonical station order, with display labels.
pub fn canonical_route_graph(topology: &Topology, load: &InspectionLoad) -> RouteGraph {
    build_labelled(topology.stations(), load, |station| {
        topology.label(station).to_string()
    })
}

/// Route graph of a single spool type's route; empty for an unroutable type.
pub fn route_graph_for_type(
    topology: &Topology,
    spool_type: &str,
    load: &InspectionLoad,
) -> RouteGraph {
    match topology.route(spool_type) {
        Some(route) => build_labelled(&route, load, |station| topology.label(station).to_string()),
        None => RouteGraph::default(),
    }
}

fn build_labelled<S, F>(order: &[S], load: &InspectionLoad, label: F) -> RouteGraph
where
    S: AsRef<str>,
    F: Fn(&str) -> String,
{
    let nodes = order
        .iter()
        .map(|station| {
            let station = station.as_ref();
            let counts = load.get(station).unwrap_or_default();
            RouteNode {
                id: station.to_string(),
                label: label(station),
                witness: counts.witness,
                hold: counts.hold,
            }
        })
        .collect();

    let edges = order
        .windows(2)
        .map(|pair| RouteEdge {
            source: pair[0].as_ref().to_string(),
            target: pair[1].as_ref().to_string(),
        })
        .collect();

    RouteGraph { nodes, edges }
}

impl From<&RouteNode> for StationLoad {
    fn from(node: &RouteNode) -> Self {
        StationLoad {
            witness: node.witness,
            hold: node.hold,
        }
    }
}
