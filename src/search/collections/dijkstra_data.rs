use crate::{
    graphs::{Distance, Graph, Vertex},
    search::Path,
};

/// Distances and predecessors found by a search.
pub trait DijkstraData {
    fn get_predecessor(&self, vertex: Vertex) -> Option<Vertex>;

    fn set_predecessor(&mut self, vertex: Vertex, predecessor: Vertex);

    /// `Distance::MAX` for vertices the search has not reached.
    fn get_distance(&self, vertex: Vertex) -> Distance;

    fn set_distance(&mut self, vertex: Vertex, distance: Distance);

    /// Walks the predecessors back from `target`. `None` if the search never
    /// reached it.
    fn get_path(&self, target: Vertex) -> Option<Path> {
        let distance = self.get_distance(target);
        if distance == Distance::MAX {
            return None;
        }

        let mut vertices = vec![target];
        let mut current = target;
        while let Some(predecessor) = self.get_predecessor(current) {
            vertices.push(predecessor);
            current = predecessor;
        }
        vertices.reverse();

        Some(Path { vertices, distance })
    }
}

pub struct DijkstraDataVec {
    predecessors: Vec<Vertex>,
    distances: Vec<Distance>,
}

impl DijkstraDataVec {
    pub fn new(graph: &dyn Graph) -> Self {
        let number_of_vertices = graph.number_of_vertices() as usize;
        DijkstraDataVec {
            predecessors: vec![Vertex::MAX; number_of_vertices],
            distances: vec![Distance::MAX; number_of_vertices],
        }
    }
}

impl DijkstraData for DijkstraDataVec {
    fn get_predecessor(&self, vertex: Vertex) -> Option<Vertex> {
        let predecessor = self.predecessors[vertex as usize];
        (predecessor != Vertex::MAX).then_some(predecessor)
    }

    fn set_predecessor(&mut self, vertex: Vertex, predecessor: Vertex) {
        self.predecessors[vertex as usize] = predecessor;
    }

    fn get_distance(&self, vertex: Vertex) -> Distance {
        self.distances[vertex as usize]
    }

    fn set_distance(&mut self, vertex: Vertex, distance: Distance) {
        self.distances[vertex as usize] = distance;
    }
}
