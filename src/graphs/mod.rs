use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod adjacency_graph;
pub mod node_index;
pub mod road_graph;

pub type Vertex = u32;
pub type Distance = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub tail: Vertex,
    pub head: Vertex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub tail: Vertex,
    pub head: Vertex,
    pub weight: Distance,
}

impl WeightedEdge {
    /// Returns `None` for self loops, they never shorten a path.
    pub fn new(tail: Vertex, head: Vertex, weight: Distance) -> Option<WeightedEdge> {
        if tail == head {
            return None;
        }

        Some(WeightedEdge { tail, head, weight })
    }

    pub fn remove_weight(&self) -> Edge {
        Edge {
            tail: self.tail,
            head: self.head,
        }
    }

    pub fn remove_tail(&self) -> TaillessEdge {
        TaillessEdge {
            head: self.head,
            weight: self.weight,
        }
    }

    pub fn reversed(&self) -> WeightedEdge {
        WeightedEdge {
            tail: self.head,
            head: self.tail,
            weight: self.weight,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaillessEdge {
    pub head: Vertex,
    pub weight: Distance,
}

impl TaillessEdge {
    pub fn set_tail(&self, tail: Vertex) -> WeightedEdge {
        WeightedEdge {
            tail,
            head: self.head,
            weight: self.weight,
        }
    }
}

pub trait Graph: Send + Sync {
    fn number_of_vertices(&self) -> u32;

    fn number_of_edges(&self) -> u32 {
        (0..self.number_of_vertices())
            .map(|vertex| self.edges(vertex).len() as u32)
            .sum::<u32>()
    }

    fn edges(&self, tail: Vertex) -> Box<dyn ExactSizeIterator<Item = WeightedEdge> + Send + '_>;

    fn get_weight(&self, edge: &Edge) -> Option<Distance>;

    /// Sums the weights along consecutive vertices, `None` if any hop is not
    /// an edge of the graph or the sum does not fit a [`Distance`].
    fn get_path_distance(&self, vertices: &[Vertex]) -> Option<Distance> {
        vertices
            .iter()
            .tuple_windows()
            .try_fold(0 as Distance, |distance, (&tail, &head)| {
                distance.checked_add(self.get_weight(&Edge { tail, head })?)
            })
    }
}
