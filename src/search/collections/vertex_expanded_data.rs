use fixedbitset::FixedBitSet;

use crate::graphs::{Graph, Vertex};

pub trait VertexExpandedData {
    /// Marks the vertex as expanded and reports whether it already was.
    fn expand(&mut self, vertex: Vertex) -> bool;
}

pub struct VertexExpandedDataBitSet {
    expanded: FixedBitSet,
}

impl VertexExpandedDataBitSet {
    pub fn new(graph: &dyn Graph) -> Self {
        VertexExpandedDataBitSet {
            expanded: FixedBitSet::with_capacity(graph.number_of_vertices() as usize),
        }
    }
}

impl VertexExpandedData for VertexExpandedDataBitSet {
    fn expand(&mut self, vertex: Vertex) -> bool {
        self.expanded.put(vertex as usize)
    }
}
