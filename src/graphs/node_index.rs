use rstar::{primitives::GeomWithData, RTree};

use super::{road_graph::Coordinate, Vertex};

type IndexedVertex = GeomWithData<[f64; 3], Vertex>;

/// Nearest vertex lookup by great-circle distance.
///
/// Vertices are stored as points on the unit sphere. The straight-line chord
/// between two such points grows monotonically with the great-circle distance,
/// so the euclidean nearest neighbour in the tree is also the geographic one.
#[derive(Clone)]
pub struct NodeIndex {
    tree: RTree<IndexedVertex>,
}

impl NodeIndex {
    pub fn new(coordinates: &[Coordinate]) -> NodeIndex {
        let tree = RTree::bulk_load(
            coordinates
                .iter()
                .enumerate()
                .map(|(vertex, coordinate)| {
                    IndexedVertex::new(unit_sphere_point(coordinate), vertex as Vertex)
                })
                .collect(),
        );

        NodeIndex { tree }
    }

    pub fn nearest(&self, coordinate: &Coordinate) -> Option<Vertex> {
        self.tree
            .nearest_neighbor(&unit_sphere_point(coordinate))
            .map(|indexed| indexed.data)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIndex")
            .field("size", &self.tree.size())
            .finish()
    }
}

fn unit_sphere_point(coordinate: &Coordinate) -> [f64; 3] {
    let latitude = coordinate.latitude.to_radians();
    let longitude = coordinate.longitude.to_radians();
    [
        latitude.cos() * longitude.cos(),
        latitude.cos() * longitude.sin(),
        latitude.sin(),
    ]
}
