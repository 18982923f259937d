use tracing::debug;

use super::{
    collections::{
        dijkstra_data::{DijkstraData, DijkstraDataVec},
        vertex_distance_queue::{VertexDistanceQueue, VertexDistanceQueueRadixHeap},
        vertex_expanded_data::{VertexExpandedData, VertexExpandedDataBitSet},
    },
    Path, PathFinding,
};
use crate::graphs::{Graph, Vertex};

/// Runs Dijkstra from `source` until `target` is settled or the queue runs
/// dry. The search state is left in `data` for the caller to read.
///
/// Returns the number of expanded vertices.
pub fn dijkstra_one_to_one(
    graph: &dyn Graph,
    data: &mut dyn DijkstraData,
    expanded: &mut dyn VertexExpandedData,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
    target: Vertex,
) -> u32 {
    let mut number_of_expanded = 0;
    data.set_distance(source, 0);
    queue.insert(source, 0);

    while let Some(tail) = queue.pop() {
        if expanded.expand(tail) {
            continue;
        }
        number_of_expanded += 1;
        if tail == target {
            break;
        }

        let distance_tail = data.get_distance(tail);
        for edge in graph.edges(tail) {
            let alternative_distance_head = distance_tail.saturating_add(edge.weight);
            if alternative_distance_head < data.get_distance(edge.head) {
                data.set_distance(edge.head, alternative_distance_head);
                data.set_predecessor(edge.head, tail);
                queue.insert(edge.head, alternative_distance_head);
            }
        }
    }

    number_of_expanded
}

/// Allocates fresh search state for a single query.
pub fn dijkstra_one_to_one_wrapped(graph: &dyn Graph, source: Vertex, target: Vertex) -> Option<Path> {
    dijkstra_one_to_one_with_queue(
        graph,
        &mut VertexDistanceQueueRadixHeap::new(),
        source,
        target,
    )
}

pub fn dijkstra_one_to_one_with_queue(
    graph: &dyn Graph,
    queue: &mut dyn VertexDistanceQueue,
    source: Vertex,
    target: Vertex,
) -> Option<Path> {
    let number_of_vertices = graph.number_of_vertices();
    if source >= number_of_vertices || target >= number_of_vertices {
        return None;
    }

    let mut data = DijkstraDataVec::new(graph);
    let mut expanded = VertexExpandedDataBitSet::new(graph);
    queue.clear();

    let number_of_expanded =
        dijkstra_one_to_one(graph, &mut data, &mut expanded, queue, source, target);
    debug!(
        "dijkstra {} -> {} expanded {} of {} vertices",
        source, target, number_of_expanded, number_of_vertices
    );

    data.get_path(target)
}

pub struct Dijkstra<'a> {
    pub graph: &'a dyn Graph,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a dyn Graph) -> Self {
        Dijkstra { graph }
    }
}

impl PathFinding for Dijkstra<'_> {
    fn shortest_path(&self, source: Vertex, target: Vertex) -> Option<Path> {
        dijkstra_one_to_one_wrapped(self.graph, source, target)
    }
}
