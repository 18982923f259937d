use ahash::AHashMap;
use tracing::debug;

use crate::graphs::{
    road_graph::{Coordinate, RoadGraph, RoadGraphBuilder},
    Vertex,
};

/// `highway` values a car may use.
pub const DRIVABLE_HIGHWAYS: &[&str] = &[
    "motorway",
    "motorway_link",
    "trunk",
    "trunk_link",
    "primary",
    "primary_link",
    "secondary",
    "secondary_link",
    "tertiary",
    "tertiary_link",
    "unclassified",
    "residential",
    "living_street",
    "service",
    "road",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Oneway {
    No,
    Forward,
    Backward,
}

/// Direction of travel for a drivable way, `None` for every other way.
///
/// Private access stays in: streets inside a gated condominium are usually
/// tagged `access=private`.
pub fn classify_way<'a>(tags: impl IntoIterator<Item = (&'a str, &'a str)>) -> Option<Oneway> {
    let mut highway = None;
    let mut oneway = None;
    let mut junction = None;
    let mut excluded = false;

    for (key, value) in tags {
        match key {
            "highway" => highway = Some(value),
            "oneway" => oneway = Some(value),
            "junction" => junction = Some(value),
            "access" | "motor_vehicle" => excluded |= value == "no",
            "area" => excluded |= value == "yes",
            _ => {}
        }
    }

    let highway = highway?;
    if excluded || !DRIVABLE_HIGHWAYS.contains(&highway) {
        return None;
    }

    Some(match oneway {
        Some("yes" | "true" | "1") => Oneway::Forward,
        Some("-1" | "reverse") => Oneway::Backward,
        Some(_) => Oneway::No,
        None if junction == Some("roundabout") || highway == "motorway" => Oneway::Forward,
        None => Oneway::No,
    })
}

#[derive(Clone, Debug)]
pub struct OsmWay {
    pub nodes: Vec<i64>,
    pub oneway: Oneway,
}

/// OSM nodes and drivable ways, as read from any source, before they become a
/// [`RoadGraph`].
#[derive(Default)]
pub struct OsmNetwork {
    nodes: AHashMap<i64, Coordinate>,
    ways: Vec<OsmWay>,
}

impl OsmNetwork {
    pub fn new() -> OsmNetwork {
        OsmNetwork::default()
    }

    pub fn add_node(&mut self, id: i64, coordinate: Coordinate) {
        self.nodes.insert(id, coordinate);
    }

    pub fn add_way(&mut self, way: OsmWay) {
        self.ways.push(way);
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn number_of_ways(&self) -> usize {
        self.ways.len()
    }

    /// Only nodes referenced by a way become vertices. Segments touching an
    /// unknown node are skipped.
    pub fn into_road_graph(self) -> RoadGraph {
        let mut builder = RoadGraphBuilder::new();
        let mut vertex_of: AHashMap<i64, Vertex> = AHashMap::new();
        let mut skipped = 0;

        for way in &self.ways {
            for pair in way.nodes.windows(2) {
                let (Some(&from), Some(&to)) = (self.nodes.get(&pair[0]), self.nodes.get(&pair[1]))
                else {
                    skipped += 1;
                    continue;
                };
                let tail = *vertex_of
                    .entry(pair[0])
                    .or_insert_with(|| builder.add_vertex(from));
                let head = *vertex_of
                    .entry(pair[1])
                    .or_insert_with(|| builder.add_vertex(to));

                match way.oneway {
                    Oneway::No => builder.add_segment(tail, head, true),
                    Oneway::Forward => builder.add_segment(tail, head, false),
                    Oneway::Backward => builder.add_segment(head, tail, false),
                };
            }
        }

        if skipped > 0 {
            debug!("skipped {} segments with nodes outside the extract", skipped);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::{Edge, Graph};

    #[test]
    fn classifies_ways() {
        assert_eq!(classify_way([("highway", "residential")]), Some(Oneway::No));
        assert_eq!(
            classify_way([("highway", "residential"), ("oneway", "yes")]),
            Some(Oneway::Forward)
        );
        assert_eq!(
            classify_way([("oneway", "-1"), ("highway", "tertiary")]),
            Some(Oneway::Backward)
        );
        assert_eq!(
            classify_way([("highway", "primary"), ("junction", "roundabout")]),
            Some(Oneway::Forward)
        );
        assert_eq!(
            classify_way([("highway", "service"), ("access", "private")]),
            Some(Oneway::No)
        );
        assert_eq!(classify_way([("highway", "footway")]), None);
        assert_eq!(classify_way([("highway", "service"), ("access", "no")]), None);
        assert_eq!(classify_way([("building", "yes")]), None);
    }

    #[test]
    fn builds_graph_honouring_direction() {
        let mut network = OsmNetwork::new();
        network.add_node(10, Coordinate::new(0.0, 0.0));
        network.add_node(11, Coordinate::new(0.0, 0.001));
        network.add_node(12, Coordinate::new(0.0, 0.002));
        network.add_node(99, Coordinate::new(5.0, 5.0));
        network.add_way(OsmWay {
            nodes: vec![10, 11],
            oneway: Oneway::No,
        });
        network.add_way(OsmWay {
            nodes: vec![11, 12, 13],
            oneway: Oneway::Backward,
        });

        let road_graph = network.into_road_graph();

        // node 99 is not on a way, node 13 is missing
        assert_eq!(road_graph.number_of_vertices(), 3);
        let graph = road_graph.graph();
        assert!(graph.get_weight(&Edge { tail: 0, head: 1 }).is_some());
        assert!(graph.get_weight(&Edge { tail: 1, head: 0 }).is_some());
        assert!(graph.get_weight(&Edge { tail: 2, head: 1 }).is_some());
        assert_eq!(graph.get_weight(&Edge { tail: 1, head: 2 }), None);
    }
}
