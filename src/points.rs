use std::{fmt::Display, path::Path};

use ahash::AHashMap;
use geojson::{feature::Id, Feature, GeoJson, Geometry, JsonValue, Value};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::DatasetError, graphs::road_graph::Coordinate};

pub const DEFAULT_ORIGIN_ID: &str = "portaria";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    /// Lots are numbered; `7` and `"7"` name the same point.
    pub fn lot(number: u32) -> PointId {
        PointId(number.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PointId {
    fn from(id: &str) -> Self {
        PointId(id.to_string())
    }
}

impl From<String> for PointId {
    fn from(id: String) -> Self {
        PointId(id)
    }
}

impl Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    pub name: String,
    pub coordinate: Coordinate,
}

impl Point {
    pub fn new(id: impl Into<PointId>, name: impl Into<String>, coordinate: Coordinate) -> Point {
        Point {
            id: id.into(),
            name: name.into(),
            coordinate,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }
}

/// The gate and the lots, loaded once and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    points: Vec<Point>,
    by_id: AHashMap<PointId, usize>,
}

impl PointSet {
    pub fn new(points: Vec<Point>) -> Result<PointSet, DatasetError> {
        let mut by_id = AHashMap::with_capacity(points.len());
        for (index, point) in points.iter().enumerate() {
            if by_id.insert(point.id.clone(), index).is_some() {
                return Err(DatasetError::DuplicateId {
                    id: point.id.clone(),
                });
            }
        }

        Ok(PointSet { points, by_id })
    }

    pub fn from_geojson_file(path: &Path) -> Result<PointSet, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        let points = PointSet::from_geojson_str(&content)?;
        info!("loaded {} points from {}", points.len(), path.display());
        Ok(points)
    }

    /// Reads a FeatureCollection of Point features. The id comes from the
    /// feature id, or else the `id` or `lote` property; the name from the
    /// `name` or `nome` property, or else the id.
    pub fn from_geojson_str(geojson: &str) -> Result<PointSet, DatasetError> {
        let GeoJson::FeatureCollection(collection) = geojson.parse::<GeoJson>()? else {
            return Err(DatasetError::NotAFeatureCollection);
        };

        let points = collection
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| point_from_feature(index, feature))
            .collect::<Result<Vec<_>, _>>()?;

        PointSet::new(points)
    }

    pub fn get(&self, id: &PointId) -> Option<&Point> {
        self.by_id.get(id).map(|&index| &self.points[index])
    }

    pub fn contains(&self, id: &PointId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn origin(&self, origin_id: &PointId) -> Option<&Point> {
        self.get(origin_id)
    }

    /// Points in the order they were loaded.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn point_from_feature(index: usize, feature: &Feature) -> Result<Point, DatasetError> {
    let id = feature
        .id
        .as_ref()
        .map(|id| match id {
            Id::String(id) => PointId::from(id.as_str()),
            Id::Number(number) => PointId::from(number.to_string()),
        })
        .or_else(|| {
            ["id", "lote"]
                .iter()
                .find_map(|key| feature.property(key).and_then(id_from_json))
        })
        .ok_or(DatasetError::MissingId { index })?;

    let name = ["name", "nome"]
        .iter()
        .find_map(|key| feature.property(key).and_then(JsonValue::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string());

    let Some(Geometry {
        value: Value::Point(position),
        ..
    }) = feature.geometry.as_ref()
    else {
        return Err(DatasetError::NotAPoint { id });
    };
    let [longitude, latitude, ..] = position.as_slice() else {
        return Err(DatasetError::NotAPoint { id });
    };

    Ok(Point::new(id, name, Coordinate::new(*latitude, *longitude)))
}

fn id_from_json(value: &JsonValue) -> Option<PointId> {
    match value {
        JsonValue::String(id) => Some(PointId::from(id.as_str())),
        JsonValue::Number(number) => Some(PointId::from(number.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOTS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": "portaria",
                "properties": { "nome": "Portaria principal" },
                "geometry": { "type": "Point", "coordinates": [-46.8500, -23.4850] }
            },
            {
                "type": "Feature",
                "properties": { "lote": 7 },
                "geometry": { "type": "Point", "coordinates": [-46.8510, -23.4860] }
            },
            {
                "type": "Feature",
                "properties": { "id": "L12", "name": "Lote 12" },
                "geometry": { "type": "Point", "coordinates": [-46.8520, -23.4870] }
            }
        ]
    }"#;

    #[test]
    fn reads_ids_names_and_coordinates() {
        let points = PointSet::from_geojson_str(LOTS).unwrap();

        assert_eq!(points.len(), 3);

        let origin = points.origin(&PointId::from(DEFAULT_ORIGIN_ID)).unwrap();
        assert_eq!(origin.name, "Portaria principal");
        assert_eq!(origin.latitude(), -23.4850);
        assert_eq!(origin.longitude(), -46.8500);

        let lot = points.get(&PointId::lot(7)).unwrap();
        assert_eq!(lot.name, "7");

        assert_eq!(points.get(&PointId::from("L12")).unwrap().name, "Lote 12");

        let ids = points.iter().map(|point| point.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["portaria", "7", "L12"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let points = vec![
            Point::new("1", "a", Coordinate::new(0.0, 0.0)),
            Point::new("1", "b", Coordinate::new(1.0, 1.0)),
        ];

        assert!(matches!(
            PointSet::new(points),
            Err(DatasetError::DuplicateId { id }) if id.as_str() == "1"
        ));
    }

    #[test]
    fn rejects_features_without_point_geometry() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 3,
                "properties": {},
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
            }]
        }"#;

        assert!(matches!(
            PointSet::from_geojson_str(geojson),
            Err(DatasetError::NotAPoint { id }) if id == PointId::lot(3)
        ));
    }

    #[test]
    fn rejects_features_without_id() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "nameless" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }]
        }"#;

        assert!(matches!(
            PointSet::from_geojson_str(geojson),
            Err(DatasetError::MissingId { index: 0 })
        ));
    }

    #[test]
    fn rejects_other_geojson_objects() {
        let geojson = r#"{ "type": "Point", "coordinates": [0, 0] }"#;

        assert!(matches!(
            PointSet::from_geojson_str(geojson),
            Err(DatasetError::NotAFeatureCollection)
        ));
    }
}
