use tracing::debug;

use crate::{
    error::ResolveError,
    graphs::{
        road_graph::{Coordinate, RoadGraph},
        Vertex,
    },
    points::{PointId, PointSet},
    route::Route,
    search::{dijkstra::Dijkstra, Path, PathFinding},
};

/// The vertex geographically nearest to the coordinate.
pub fn nearest_node(graph: &RoadGraph, latitude: f64, longitude: f64) -> Result<Vertex, ResolveError> {
    graph
        .nearest_vertex(&Coordinate::new(latitude, longitude))
        .ok_or(ResolveError::NotFound {
            latitude,
            longitude,
        })
}

/// Minimum weight path between two vertices. A vertex to itself is a path of
/// one vertex and weight 0.
pub fn shortest_path(graph: &RoadGraph, origin: Vertex, destination: Vertex) -> Result<Path, ResolveError> {
    Dijkstra::new(graph.graph())
        .shortest_path(origin, destination)
        .ok_or(ResolveError::NoPath {
            from: origin,
            to: destination,
        })
}

pub fn resolve(
    points: &PointSet,
    graph: &RoadGraph,
    origin_id: &PointId,
    destination_id: &PointId,
) -> Result<Route, ResolveError> {
    let lookup = |id: &PointId| {
        points
            .get(id)
            .ok_or_else(|| ResolveError::PointNotFound { id: id.clone() })
    };
    let origin = lookup(origin_id)?;
    let destination = lookup(destination_id)?;

    let origin_vertex = nearest_node(graph, origin.latitude(), origin.longitude())?;
    let destination_vertex = nearest_node(graph, destination.latitude(), destination.longitude())?;
    debug!(
        "{} snapped to vertex {}, {} snapped to vertex {}",
        origin_id, origin_vertex, destination_id, destination_vertex
    );

    let path = shortest_path(graph, origin_vertex, destination_vertex)?;
    let coordinates = path
        .vertices
        .iter()
        .map(|&vertex| {
            graph.coordinate(vertex).ok_or(ResolveError::NoPath {
                from: origin_vertex,
                to: destination_vertex,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        origin: origin_id.clone(),
        destination: destination_id.clone(),
        vertices: path.vertices,
        coordinates,
        distance: path.distance,
    })
}
