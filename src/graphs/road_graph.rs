use std::fmt::Display;

use geo::{Distance as GeoDistance, Haversine};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    adjacency_graph::AdjacencyGraph, node_index::NodeIndex, Distance, Graph, Vertex, WeightedEdge,
};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in meters.
    pub fn haversine_distance(&self, other: &Coordinate) -> f64 {
        Haversine.distance(geo::Point::from(*self), geo::Point::from(*other))
    }
}

impl From<Coordinate> for geo::Point {
    fn from(coordinate: Coordinate) -> Self {
        geo::Point::new(coordinate.longitude, coordinate.latitude)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.latitude, self.longitude)
    }
}

/// A street network: a weighted graph whose vertices carry the coordinate of
/// the intersection or way node they stand for.
///
/// Never mutated after construction, share it behind an `Arc`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "RoadGraphParts")]
pub struct RoadGraph {
    graph: AdjacencyGraph,
    coordinates: Vec<Coordinate>,
    #[serde(skip_serializing)]
    index: NodeIndex,
}

#[derive(Deserialize)]
struct RoadGraphParts {
    graph: AdjacencyGraph,
    coordinates: Vec<Coordinate>,
}

impl From<RoadGraphParts> for RoadGraph {
    fn from(parts: RoadGraphParts) -> Self {
        RoadGraph::new(parts.graph, parts.coordinates)
    }
}

impl RoadGraph {
    fn new(graph: AdjacencyGraph, coordinates: Vec<Coordinate>) -> RoadGraph {
        // Every vertex needs a coordinate and every coordinate a vertex.
        let number_of_vertices = coordinates.len() as Vertex;
        let graph = if graph.number_of_vertices() == number_of_vertices {
            graph
        } else {
            let mut resized = AdjacencyGraph::with_vertices(number_of_vertices);
            (0..graph.number_of_vertices().min(number_of_vertices))
                .flat_map(|tail| graph.edges(tail))
                .filter(|edge| edge.head < number_of_vertices)
                .for_each(|edge| resized.insert_edge(&edge));
            resized
        };

        let index = NodeIndex::new(&coordinates);
        RoadGraph {
            graph,
            coordinates,
            index,
        }
    }

    pub fn graph(&self) -> &AdjacencyGraph {
        &self.graph
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.coordinates.len() as u32
    }

    pub fn number_of_edges(&self) -> u32 {
        self.graph.number_of_edges()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinate(&self, vertex: Vertex) -> Option<Coordinate> {
        self.coordinates.get(vertex as usize).copied()
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn nearest_vertex(&self, coordinate: &Coordinate) -> Option<Vertex> {
        self.index.nearest(coordinate)
    }
}

/// Collects vertices and edges, then freezes them into a [`RoadGraph`].
#[derive(Default)]
pub struct RoadGraphBuilder {
    coordinates: Vec<Coordinate>,
    edges: Vec<WeightedEdge>,
}

impl RoadGraphBuilder {
    pub fn new() -> RoadGraphBuilder {
        RoadGraphBuilder::default()
    }

    pub fn add_vertex(&mut self, coordinate: Coordinate) -> Vertex {
        self.coordinates.push(coordinate);
        (self.coordinates.len() - 1) as Vertex
    }

    /// Directed edge with an explicit weight. Self loops are dropped.
    pub fn add_edge(&mut self, tail: Vertex, head: Vertex, weight: Distance) -> &mut Self {
        if let Some(edge) = WeightedEdge::new(tail, head, weight) {
            self.edges.push(edge);
        }
        self
    }

    pub fn add_edge_bidirectional(
        &mut self,
        tail: Vertex,
        head: Vertex,
        weight: Distance,
    ) -> &mut Self {
        self.add_edge(tail, head, weight).add_edge(head, tail, weight)
    }

    /// Adds a street segment weighted by its length in whole meters.
    pub fn add_segment(&mut self, tail: Vertex, head: Vertex, two_way: bool) -> &mut Self {
        let (Some(from), Some(to)) = (
            self.coordinates.get(tail as usize),
            self.coordinates.get(head as usize),
        ) else {
            return self;
        };
        let weight = from.haversine_distance(to).round() as Distance;

        if two_way {
            self.add_edge_bidirectional(tail, head, weight)
        } else {
            self.add_edge(tail, head, weight)
        }
    }

    pub fn number_of_vertices(&self) -> u32 {
        self.coordinates.len() as u32
    }

    pub fn build(self) -> RoadGraph {
        let number_of_vertices = self.coordinates.len() as Vertex;
        let mut graph = AdjacencyGraph::with_vertices(number_of_vertices);

        let mut dropped = 0;
        for edge in &self.edges {
            if edge.tail < number_of_vertices && edge.head < number_of_vertices {
                graph.insert_edge(edge);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("dropped {} edges with unknown endpoints", dropped);
        }

        RoadGraph::new(graph, self.coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::Edge;

    #[test]
    fn segment_weight_is_rounded_length() {
        let mut builder = RoadGraphBuilder::new();
        let a = builder.add_vertex(Coordinate::new(0.0, 0.0));
        let b = builder.add_vertex(Coordinate::new(0.0, 0.01));
        builder.add_segment(a, b, false);
        let road_graph = builder.build();

        // One hundredth of a degree along the equator.
        let weight = road_graph
            .graph()
            .get_weight(&Edge { tail: a, head: b })
            .unwrap();
        assert!((1110..=1113).contains(&weight), "weight was {}", weight);
        assert_eq!(
            road_graph
                .graph()
                .get_weight(&Edge { tail: b, head: a }),
            None
        );
    }

    #[test]
    fn unknown_endpoints_are_dropped() {
        let mut builder = RoadGraphBuilder::new();
        let a = builder.add_vertex(Coordinate::new(0.0, 0.0));
        builder.add_edge(a, 5, 10).add_edge(a, a, 1);
        let road_graph = builder.build();

        assert_eq!(road_graph.number_of_vertices(), 1);
        assert_eq!(road_graph.number_of_edges(), 0);
    }

    #[test]
    fn survives_bincode() {
        let mut builder = RoadGraphBuilder::new();
        let a = builder.add_vertex(Coordinate::new(-23.48, -46.85));
        let b = builder.add_vertex(Coordinate::new(-23.49, -46.86));
        let _isolated = builder.add_vertex(Coordinate::new(-23.50, -46.87));
        builder.add_edge_bidirectional(a, b, 42);
        let road_graph = builder.build();

        let bytes = bincode::serialize(&road_graph).unwrap();
        let restored: RoadGraph = bincode::deserialize(&bytes).unwrap();

        assert_eq!(restored.number_of_vertices(), 3);
        assert_eq!(restored.coordinates(), road_graph.coordinates());
        assert_eq!(restored.number_of_edges(), 2);
        assert_eq!(
            restored.nearest_vertex(&Coordinate::new(-23.501, -46.871)),
            Some(2)
        );
    }
}
