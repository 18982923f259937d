use std::{
    future::Future,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{FetchFailure, GraphFetchError},
    graphs::road_graph::{Coordinate, RoadGraph},
};

pub mod cache;
pub mod osm;
pub mod overpass;
pub mod pbf;

/// The street network within `radius_m` meters of `center`.
///
/// Two requests are equal when their centers agree to 1e-7 degrees and the
/// radius is the same.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GraphRequest {
    pub center: Coordinate,
    pub radius_m: u32,
}

impl GraphRequest {
    pub fn new(center: Coordinate, radius_m: u32) -> GraphRequest {
        GraphRequest { center, radius_m }
    }

    fn key(&self) -> (i64, i64, u32) {
        (
            (self.center.latitude * 1e7).round() as i64,
            (self.center.longitude * 1e7).round() as i64,
            self.radius_m,
        )
    }

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.center.haversine_distance(coordinate) <= self.radius_m as f64
    }

    pub fn error(&self, cause: impl Into<FetchFailure>) -> GraphFetchError {
        GraphFetchError {
            center: self.center,
            radius_m: self.radius_m,
            cause: cause.into(),
        }
    }
}

impl PartialEq for GraphRequest {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GraphRequest {}

impl Hash for GraphRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Somewhere a road graph can be obtained from. Fetches are not retried.
pub trait GraphSource: Send + Sync {
    fn fetch(
        &self,
        request: &GraphRequest,
    ) -> impl Future<Output = Result<RoadGraph, GraphFetchError>> + Send;
}

/// Rejects graphs without a single vertex, resolution could never succeed on
/// them.
pub(crate) fn non_empty(
    request: &GraphRequest,
    graph: RoadGraph,
) -> Result<RoadGraph, GraphFetchError> {
    if graph.is_empty() {
        return Err(request.error(FetchFailure::Empty));
    }
    Ok(graph)
}
