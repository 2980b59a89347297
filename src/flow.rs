use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::topology::Topology;

/// Shopfloor material flow.
///
/// Nodes are stations in canonical order; an edge joins two stations that
/// are consecutive stops on at least one route and carries the spool types
/// that make that move.
pub struct FlowGraph {
    graph: DiGraph<String, BTreeSet<String>>,
    /// Map from station name → NodeIndex for fast lookup.
    node_map: HashMap<String, NodeIndex>,
    /// Spool types visiting each station, indexed like the nodes.
    visitors: Vec<BTreeSet<String>>,
}

impl FlowGraph {
    pub fn from_topology(topology: &Topology) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::with_capacity(topology.stations().len());
        let mut indices = Vec::with_capacity(topology.stations().len());

        for station in topology.stations() {
            let idx = graph.add_node(station.clone());
            node_map.insert(station.clone(), idx);
            indices.push(idx);
        }

        let mut visitors = vec![BTreeSet::new(); indices.len()];
        for (spool_type, route) in topology.routes_by_index() {
            for &stop in route {
                visitors[stop].insert(spool_type.to_string());
            }
            for pair in route.windows(2) {
                let (src, dst) = (indices[pair[0]], indices[pair[1]]);
                let edge = match graph.find_edge(src, dst) {
                    Some(edge) => edge,
                    None => graph.add_edge(src, dst, BTreeSet::new()),
                };
                graph[edge].insert(spool_type.to_string());
            }
        }

        Self {
            graph,
            node_map,
            visitors,
        }
    }

    pub fn station_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Spool types whose route passes through `station`, sorted.
    pub fn spool_types_at(&self, station: &str) -> Vec<&str> {
        self.node_map
            .get(station)
            .map(|idx| self.visitors[idx.index()].iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Spool types moving directly from `from` to `to`.
    pub fn spool_types_between(&self, from: &str, to: &str) -> Vec<&str> {
        let (Some(&src), Some(&dst)) = (self.node_map.get(from), self.node_map.get(to)) else {
            return Vec::new();
        };
        self.graph
            .find_edge(src, dst)
            .map(|edge| self.graph[edge].iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Stations reached in one move from `station`, in canonical order.
    pub fn successors(&self, station: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(station) else {
            return Vec::new();
        };
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        next.sort();
        next.into_iter().map(|n| self.graph[n].as_str()).collect()
    }

    /// Every station reachable from `station` by some route, in canonical order.
    pub fn downstream(&self, station: &str) -> Vec<&str> {
        self.reachable(station, Direction::Outgoing)
    }

    /// Every station from which `station` can be reached, in canonical order.
    pub fn upstream(&self, station: &str) -> Vec<&str> {
        self.reachable(station, Direction::Incoming)
    }

    pub fn is_acyclic(&self) -> bool {
        !petgraph::algo::is_cyclic_directed(&self.graph)
    }

    fn reachable(&self, station: &str, direction: Direction) -> Vec<&str> {
        let Some(&start) = self.node_map.get(station) else {
            return Vec::new();
        };

        let mut stack: Vec<NodeIndex> = self.graph.neighbors_directed(start, direction).collect();
        let mut visited = HashSet::new();

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for neighbor in self.graph.neighbors_directed(node, direction) {
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        let mut result: Vec<NodeIndex> = visited.into_iter().collect();
        result.sort();
        result.into_iter().map(|n| self.graph[n].as_str()).collect()
    }
}
