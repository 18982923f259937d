use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    error::{GraphFetchError, ResolveError},
    graphs::road_graph::RoadGraph,
    network::{cache::GraphCache, GraphRequest, GraphSource},
    points::{Point, PointId, PointSet, DEFAULT_ORIGIN_ID},
    resolver::resolve,
    route::Route,
};

pub const DEFAULT_RADIUS_M: u32 = 1500;

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub origin_id: PointId,
    /// Road graph radius around the origin, in meters.
    pub radius_m: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            origin_id: PointId::from(DEFAULT_ORIGIN_ID),
            radius_m: DEFAULT_RADIUS_M,
        }
    }
}

/// Everything one serving session routes against: the points, where road
/// graphs come from and the graphs already obtained. Created once, read-only
/// afterwards, dropped when the session ends.
pub struct RoutingSession<S> {
    points: Arc<PointSet>,
    origin: Point,
    source: S,
    cache: GraphCache,
    config: SessionConfig,
}

impl<S: GraphSource> RoutingSession<S> {
    pub fn new(
        points: PointSet,
        source: S,
        cache: GraphCache,
        config: SessionConfig,
    ) -> Result<Self, ResolveError> {
        let Some(origin) = points.origin(&config.origin_id).cloned() else {
            return Err(ResolveError::PointNotFound {
                id: config.origin_id,
            });
        };

        Ok(RoutingSession {
            points: Arc::new(points),
            origin,
            source,
            cache,
            config,
        })
    }

    pub fn points(&self) -> &PointSet {
        &self.points
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn origin(&self) -> &Point {
        &self.origin
    }

    pub fn graph_request(&self) -> GraphRequest {
        GraphRequest::new(self.origin().coordinate, self.config.radius_m)
    }

    pub async fn graph(&self) -> Result<Arc<RoadGraph>, GraphFetchError> {
        self.cache
            .get_or_fetch(&self.graph_request(), &self.source)
            .await
    }

    /// Fails fast on unknown ids, before any graph is fetched.
    pub async fn route_to(&self, destination_id: &PointId) -> Result<Route, ResolveError> {
        if !self.points.contains(destination_id) {
            return Err(ResolveError::PointNotFound {
                id: destination_id.clone(),
            });
        }

        let graph = self.graph().await?;
        let route = resolve(&self.points, &graph, &self.config.origin_id, destination_id)?;
        info!(
            "route to {} has {} segments and {} m",
            destination_id,
            route.number_of_segments(),
            route.distance
        );

        Ok(route)
    }

    pub async fn route_to_lot(&self, lot: u32) -> Result<Route, ResolveError> {
        self.route_to(&PointId::lot(lot)).await
    }

    /// Routes to every point but the origin, in dataset order, sharing one
    /// graph across threads. Only a failed graph fetch, or a search task
    /// that died, fails the whole call.
    ///
    /// The searches run on the blocking pool, not on the async worker.
    pub async fn route_all(
        &self,
    ) -> Result<Vec<(PointId, Result<Route, ResolveError>)>, GraphFetchError> {
        let graph = self.graph().await?;
        let points = Arc::clone(&self.points);
        let origin_id = self.config.origin_id.clone();

        tokio::task::spawn_blocking(move || route_all_blocking(&points, &graph, &origin_id))
            .await
            .map_err(|error| self.graph_request().error(error))
    }
}

fn route_all_blocking(
    points: &PointSet,
    graph: &RoadGraph,
    origin_id: &PointId,
) -> Vec<(PointId, Result<Route, ResolveError>)> {
    let destinations = points
        .iter()
        .filter(|point| point.id != *origin_id)
        .map(|point| point.id.clone())
        .collect::<Vec<_>>();

    destinations
        .into_par_iter()
        .map(|destination_id| {
            let route = resolve(points, graph, origin_id, &destination_id);
            if let Err(error) = &route {
                warn!("no route to {}: {}", destination_id, error);
            }
            (destination_id, route)
        })
        .collect()
}
