use geojson::{Feature, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};

use crate::{
    graphs::{road_graph::Coordinate, Distance, Vertex},
    points::PointId,
};

/// A resolved route from the origin point to a destination point.
///
/// `vertices` and `coordinates` run in parallel, from the vertex nearest the
/// origin to the vertex nearest the destination. `distance` is the sum of the
/// edge weights between consecutive vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: PointId,
    pub destination: PointId,
    pub vertices: Vec<Vertex>,
    pub coordinates: Vec<Coordinate>,
    pub distance: Distance,
}

impl Route {
    pub fn origin_vertex(&self) -> Option<Vertex> {
        self.vertices.first().copied()
    }

    pub fn destination_vertex(&self) -> Option<Vertex> {
        self.vertices.last().copied()
    }

    pub fn number_of_segments(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// A `LineString` feature in GeoJSON axis order (longitude first).
    pub fn to_geojson_feature(&self) -> Feature {
        let positions = self
            .coordinates
            .iter()
            .map(|coordinate| vec![coordinate.longitude, coordinate.latitude])
            .collect();

        let mut properties = JsonObject::new();
        properties.insert(
            "origin".to_string(),
            JsonValue::from(self.origin.as_str()),
        );
        properties.insert(
            "destination".to_string(),
            JsonValue::from(self.destination.as_str()),
        );
        properties.insert("distance".to_string(), JsonValue::from(self.distance));

        Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(positions))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}
