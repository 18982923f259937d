use serde::{Deserialize, Serialize};

use super::{Distance, Edge, Graph, TaillessEdge, Vertex, WeightedEdge};

/// Outgoing edges per vertex, each list sorted by head so lookups can binary
/// search. Parallel edges collapse to the lightest one.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdjacencyGraph {
    edges: Vec<Vec<TaillessEdge>>,
}

impl AdjacencyGraph {
    pub fn with_vertices(number_of_vertices: u32) -> AdjacencyGraph {
        AdjacencyGraph {
            edges: vec![Vec::new(); number_of_vertices as usize],
        }
    }

    pub fn from_edges(edges: &[WeightedEdge]) -> AdjacencyGraph {
        let mut graph = AdjacencyGraph::default();
        edges.iter().for_each(|edge| graph.insert_edge(edge));
        graph
    }

    /// Inserts the edge unless an edge between the same endpoints is already
    /// at least as light. Vertices are created on demand.
    pub fn insert_edge(&mut self, edge: &WeightedEdge) {
        let highest_endpoint = std::cmp::max(edge.tail, edge.head) as usize;
        if highest_endpoint >= self.edges.len() {
            self.edges.resize(highest_endpoint + 1, Vec::new());
        }

        let edges_sharing_tail = &mut self.edges[edge.tail as usize];
        match edges_sharing_tail.binary_search_by_key(&edge.head, |other| other.head) {
            Ok(index) => {
                let existing = &mut edges_sharing_tail[index];
                existing.weight = std::cmp::min(existing.weight, edge.weight);
            }
            Err(index) => edges_sharing_tail.insert(index, edge.remove_tail()),
        }
    }

    pub fn insert_edge_bidirectional(&mut self, edge: &WeightedEdge) {
        self.insert_edge(edge);
        self.insert_edge(&edge.reversed());
    }
}

impl Graph for AdjacencyGraph {
    fn number_of_vertices(&self) -> u32 {
        self.edges.len() as u32
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_> {
        let edges_sharing_tail = self
            .edges
            .get(tail as usize)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Box::new(
            edges_sharing_tail
                .iter()
                .map(move |tailless_edge| tailless_edge.set_tail(tail)),
        )
    }

    fn get_weight(&self, edge: &Edge) -> Option<Distance> {
        let edges_sharing_tail = self.edges.get(edge.tail as usize)?;
        let index = edges_sharing_tail
            .binary_search_by_key(&edge.head, |tailless_edge| tailless_edge.head)
            .ok()?;

        Some(edges_sharing_tail[index].weight)
    }
}
