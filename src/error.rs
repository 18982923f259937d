use thiserror::Error;

use crate::{
    graphs::{road_graph::Coordinate, Vertex},
    points::PointId,
};

/// Why a route could not be produced. Every variant carries what a caller
/// needs to decide between retrying with a larger radius and giving up.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("point `{id}` is not in the dataset")]
    PointNotFound { id: PointId },

    #[error(transparent)]
    GraphFetch(#[from] GraphFetchError),

    #[error("no road graph vertex near ({latitude}, {longitude}): the graph is empty")]
    NotFound { latitude: f64, longitude: f64 },

    #[error("vertex {to} is not reachable from vertex {from}")]
    NoPath { from: Vertex, to: Vertex },
}

#[derive(Debug, Error)]
#[error("could not fetch road graph within {radius_m} m of {center}: {cause}")]
pub struct GraphFetchError {
    pub center: Coordinate,
    pub radius_m: u32,
    #[source]
    pub cause: FetchFailure,
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(u16),

    #[error("could not read OSM extract: {0}")]
    Pbf(#[from] osmpbf::Error),

    #[error("graph task did not finish: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("provider returned an empty graph")]
    Empty,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("could not read point dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("point dataset must be a FeatureCollection")]
    NotAFeatureCollection,

    #[error("feature {index} has no id, `id` or `lote` property")]
    MissingId { index: usize },

    #[error("feature `{id}` does not have a Point geometry")]
    NotAPoint { id: PointId },

    #[error("point id `{id}` appears more than once")]
    DuplicateId { id: PointId },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache file could not be encoded: {0}")]
    Bincode(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("a pbf source needs the path of an .osm.pbf extract")]
    MissingPbf,
}
