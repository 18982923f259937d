use std::{cmp::Reverse, collections::BinaryHeap};

use radix_heap::RadixHeapMap;

use crate::graphs::{Distance, Vertex};

/// Priority queue handing out the vertex with the smallest tentative
/// distance. Implementations may hold stale entries, callers skip vertices
/// that were already expanded.
pub trait VertexDistanceQueue {
    fn clear(&mut self);

    fn insert(&mut self, vertex: Vertex, distance: Distance);

    fn pop(&mut self) -> Option<Vertex>;
}

/// Ties pop the smaller vertex id first.
#[derive(Default)]
pub struct VertexDistanceQueueBinaryHeap {
    heap: BinaryHeap<Reverse<(Distance, Vertex)>>,
}

impl VertexDistanceQueueBinaryHeap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VertexDistanceQueue for VertexDistanceQueueBinaryHeap {
    fn clear(&mut self) {
        self.heap.clear();
    }

    fn insert(&mut self, vertex: Vertex, distance: Distance) {
        self.heap.push(Reverse((distance, vertex)));
    }

    fn pop(&mut self) -> Option<Vertex> {
        let Reverse((_distance, vertex)) = self.heap.pop()?;
        Some(vertex)
    }
}

/// Monotone queue: a key may never be smaller than the last popped one,
/// which holds for Dijkstra on non-negative weights.
pub struct VertexDistanceQueueRadixHeap {
    // max heap, so distances are stored negated
    heap: RadixHeapMap<i64, Vertex>,
}

impl Default for VertexDistanceQueueRadixHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexDistanceQueueRadixHeap {
    pub fn new() -> Self {
        VertexDistanceQueueRadixHeap {
            heap: RadixHeapMap::new(),
        }
    }
}

impl VertexDistanceQueue for VertexDistanceQueueRadixHeap {
    fn clear(&mut self) {
        self.heap.clear();
    }

    fn insert(&mut self, vertex: Vertex, distance: Distance) {
        self.heap.push(-(distance as i64), vertex);
    }

    fn pop(&mut self) -> Option<Vertex> {
        let (_negative_distance, vertex) = self.heap.pop()?;
        Some(vertex)
    }
}
