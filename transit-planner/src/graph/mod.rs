//! Rail network topology and shortest-path search.
//!
//! The network is modelled as an undirected graph of station ids. Edges come
//! from consecutive stations on each line plus any extra connections listed
//! in the topology asset. Adjacency is always stored in both directions.

use std::collections::{HashMap, VecDeque};

use serde::Deserialize;
use tracing::trace;

/// Topology compiled into the binary.
const DEFAULT_TOPOLOGY: &str = include_str!("../../data/rail_topology.json");

/// Error loading a topology asset.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Asset is not valid JSON or has the wrong shape
    #[error("invalid topology JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A line lists the same station twice in a row
    #[error("line {line} connects station {station} to itself")]
    SelfLoop { line: String, station: String },
}

/// On-disk topology format.
#[derive(Debug, Deserialize)]
struct TopologyAsset {
    lines: Vec<LineAsset>,
    #[serde(default)]
    connections: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct LineAsset {
    code: String,
    stations: Vec<String>,
}

/// Static rail topology.
///
/// Connections are symmetric: if A is adjacent to B, B is adjacent to A.
/// Neighbours are kept in insertion order so searches are reproducible.
#[derive(Debug, Clone, Default)]
pub struct StationGraph {
    adjacency: HashMap<String, Vec<String>>,
}

impl StationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a topology from its JSON form.
    ///
    /// ```
    /// use transit_planner::graph::StationGraph;
    ///
    /// let graph = StationGraph::from_json(
    ///     r#"{ "lines": [{ "code": "L1", "stations": ["A", "B", "C"] }] }"#,
    /// ).unwrap();
    /// assert_eq!(graph.shortest_path("A", "C"), vec!["A", "B", "C"]);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let asset: TopologyAsset = serde_json::from_str(json)?;
        let mut graph = Self::new();

        for line in &asset.lines {
            for pair in line.stations.windows(2) {
                if pair[0] == pair[1] {
                    return Err(GraphError::SelfLoop {
                        line: line.code.clone(),
                        station: pair[0].clone(),
                    });
                }
                graph.add_connection(&pair[0], &pair[1]);
            }
        }
        for (a, b) in &asset.connections {
            graph.add_connection(a, b);
        }

        Ok(graph)
    }

    /// The network compiled in from `data/rail_topology.json`.
    pub fn default_network() -> Result<Self, GraphError> {
        Self::from_json(DEFAULT_TOPOLOGY)
    }

    /// Connect two stations in both directions.
    ///
    /// Repeated connections and self-connections are ignored.
    pub fn add_connection(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        Self::push_neighbour(&mut self.adjacency, a, b);
        Self::push_neighbour(&mut self.adjacency, b, a);
    }

    fn push_neighbour(adjacency: &mut HashMap<String, Vec<String>>, from: &str, to: &str) {
        let neighbours = adjacency.entry(from.to_string()).or_default();
        if !neighbours.iter().any(|n| n == to) {
            neighbours.push(to.to_string());
        }
    }

    /// Stations adjacent to `station`, in insertion order.
    pub fn neighbours(&self, station: &str) -> &[String] {
        self.adjacency
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if the station appears in the graph.
    pub fn contains(&self, station: &str) -> bool {
        self.adjacency.contains_key(station)
    }

    /// True if two stations are directly connected.
    pub fn is_adjacent(&self, a: &str, b: &str) -> bool {
        self.neighbours(a).iter().any(|n| n == b)
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns true if the graph has no stations.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Check the symmetry invariant over every edge.
    pub fn is_symmetric(&self) -> bool {
        self.adjacency
            .iter()
            .all(|(a, neighbours)| neighbours.iter().all(|b| self.is_adjacent(b, a)))
    }

    /// Fewest-hop path from `start` to `end`, including both endpoints.
    ///
    /// Returns an empty path if either station is unknown, no path exists,
    /// or `start == end` (callers handle the same-station case themselves).
    /// Hop count is minimised, not physical distance.
    pub fn shortest_path(&self, start: &str, end: &str) -> Vec<String> {
        if start == end || !self.contains(start) || !self.contains(end) {
            return Vec::new();
        }

        let mut previous: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        previous.insert(start, start);
        queue.push_back(start);

        while let Some(station) = queue.pop_front() {
            if station == end {
                break;
            }
            for next in self.neighbours(station) {
                if previous.contains_key(next.as_str()) {
                    continue;
                }
                previous.insert(next, station);
                queue.push_back(next);
            }
        }

        if !previous.contains_key(end) {
            trace!(start, end, "no rail path");
            return Vec::new();
        }

        let mut path = vec![end.to_string()];
        let mut current = end;
        while current != start {
            current = previous[current];
            path.push(current.to_string());
        }
        path.reverse();
        path
    }
}

/// Builder for creating station graphs.
///
/// Provides a fluent API for small synthetic networks in tests and demos.
#[derive(Debug, Default)]
pub struct StationGraphBuilder {
    inner: StationGraph,
}

impl StationGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line through the given stations, in order.
    pub fn line(mut self, stations: &[&str]) -> Self {
        for pair in stations.windows(2) {
            self.inner.add_connection(pair[0], pair[1]);
        }
        self
    }

    /// Add a single connection.
    pub fn connect(mut self, a: &str, b: &str) -> Self {
        self.inner.add_connection(a, b);
        self
    }

    /// Build the graph.
    pub fn build(self) -> StationGraph {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> StationGraph {
        // A - B - D and A - C - D, plus a tail D - E
        StationGraphBuilder::new()
            .line(&["A", "B", "D", "E"])
            .line(&["A", "C", "D"])
            .build()
    }

    #[test]
    fn empty_graph() {
        let graph = StationGraph::new();
        assert!(graph.is_empty());
        assert!(graph.shortest_path("A", "B").is_empty());
    }

    #[test]
    fn connections_are_symmetric() {
        let graph = diamond();
        assert!(graph.is_symmetric());
        assert!(graph.is_adjacent("B", "A"));
        assert!(graph.is_adjacent("A", "B"));
        assert!(!graph.is_adjacent("A", "D"));
    }

    #[test]
    fn duplicate_and_self_connections_ignored() {
        let graph = StationGraphBuilder::new()
            .connect("A", "B")
            .connect("B", "A")
            .connect("A", "A")
            .build();
        assert_eq!(graph.neighbours("A"), ["B"]);
        assert_eq!(graph.neighbours("B"), ["A"]);
    }

    #[test]
    fn shortest_path_includes_endpoints() {
        let graph = diamond();
        let path = graph.shortest_path("A", "E");
        assert_eq!(path.len(), 4);
        assert_eq!(path.first().map(String::as_str), Some("A"));
        assert_eq!(path.last().map(String::as_str), Some("E"));
    }

    #[test]
    fn ties_broken_by_insertion_order() {
        // B was connected to A before C, so the path goes via B
        let graph = diamond();
        assert_eq!(graph.shortest_path("A", "D"), vec!["A", "B", "D"]);
    }

    #[test]
    fn same_station_is_empty() {
        assert!(diamond().shortest_path("A", "A").is_empty());
    }

    #[test]
    fn unknown_station_is_empty() {
        let graph = diamond();
        assert!(graph.shortest_path("A", "Z").is_empty());
        assert!(graph.shortest_path("Z", "A").is_empty());
    }

    #[test]
    fn disconnected_component_is_empty() {
        let graph = StationGraphBuilder::new()
            .line(&["A", "B"])
            .line(&["X", "Y"])
            .build();
        assert!(graph.shortest_path("A", "Y").is_empty());
    }

    #[test]
    fn from_json_with_connections() {
        let graph = StationGraph::from_json(
            r#"{
                "lines": [
                    { "code": "L1", "stations": ["A", "B", "C"] },
                    { "code": "L2", "stations": ["X", "Y"] }
                ],
                "connections": [["C", "X"]]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.shortest_path("A", "Y"), vec!["A", "B", "C", "X", "Y"]);
    }

    #[test]
    fn from_json_rejects_self_loop() {
        let err = StationGraph::from_json(r#"{ "lines": [{ "code": "L1", "stations": ["A", "A"] }] }"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "line L1 connects station A to itself");
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            StationGraph::from_json("not json"),
            Err(GraphError::Json(_))
        ));
    }

    #[test]
    fn default_network_loads() {
        let graph = StationGraph::default_network().unwrap();
        assert!(graph.is_symmetric());
        assert!(graph.contains("CEN"));
        assert!(graph.contains("MOK"));

        let path = graph.shortest_path("CEN", "MOK");
        assert_eq!(path, vec!["CEN", "ADM", "TST", "JOR", "YMT", "MOK"]);
    }

    #[test]
    fn default_network_links_hong_kong_to_central() {
        let graph = StationGraph::default_network().unwrap();
        assert!(graph.is_adjacent("HOK", "CEN"));
        assert_eq!(graph.shortest_path("HOK", "ADM"), vec!["HOK", "CEN", "ADM"]);
    }

    #[test]
    fn default_network_crosses_lines() {
        let graph = StationGraph::default_network().unwrap();
        // Island line to Kwun Tong line via the Tsuen Wan line
        let path = graph.shortest_path("WAC", "KOT");
        assert_eq!(path.first().map(String::as_str), Some("WAC"));
        assert_eq!(path.last().map(String::as_str), Some("KOT"));
        for pair in path.windows(2) {
            assert!(graph.is_adjacent(&pair[0], &pair[1]));
        }
    }
}
