use serde::{Deserialize, Serialize};

use crate::graphs::{Distance, Vertex};

pub mod collections;
pub mod dijkstra;

/// Vertices from source to target, both included, and the summed weight of
/// the edges between them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub vertices: Vec<Vertex>,
    pub distance: Distance,
}

pub trait PathFinding: Send + Sync {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path>;

    fn shortest_path_distance(&self, source: Vertex, target: Vertex) -> Option<Distance> {
        self.shortest_path(source, target).map(|path| path.distance)
    }
}
