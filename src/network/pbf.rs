use std::path::{Path, PathBuf};

use osmpbf::{Element, ElementReader};
use tracing::info;

use super::{
    non_empty,
    osm::{classify_way, OsmNetwork, OsmWay},
    GraphRequest, GraphSource,
};
use crate::{
    error::{FetchFailure, GraphFetchError},
    graphs::road_graph::{Coordinate, RoadGraph},
};

/// Cuts the street network around a point out of a local `.osm.pbf`
/// extract. Segments are kept when both ends lie within the radius.
#[derive(Clone, Debug)]
pub struct PbfSource {
    path: PathBuf,
}

impl PbfSource {
    pub fn new(path: impl Into<PathBuf>) -> PbfSource {
        PbfSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn read_network(path: &Path, request: &GraphRequest) -> Result<OsmNetwork, osmpbf::Error> {
    let mut network = OsmNetwork::new();
    let add_node = |network: &mut OsmNetwork, id: i64, latitude: f64, longitude: f64| {
        let coordinate = Coordinate::new(latitude, longitude);
        if request.contains(&coordinate) {
            network.add_node(id, coordinate);
        }
    };

    ElementReader::from_path(path)?.for_each(|element| match element {
        Element::Node(node) => add_node(&mut network, node.id(), node.lat(), node.lon()),
        Element::DenseNode(node) => add_node(&mut network, node.id(), node.lat(), node.lon()),
        Element::Way(way) => {
            if let Some(oneway) = classify_way(way.tags()) {
                network.add_way(OsmWay {
                    nodes: way.refs().collect(),
                    oneway,
                });
            }
        }
        Element::Relation(_) => {}
    })?;

    Ok(network)
}

impl GraphSource for PbfSource {
    async fn fetch(&self, request: &GraphRequest) -> Result<RoadGraph, GraphFetchError> {
        info!(
            "reading road graph within {} m of {} from {}",
            request.radius_m,
            request.center,
            self.path.display()
        );

        let path = self.path.clone();
        let owned_request = *request;
        let network = tokio::task::spawn_blocking(move || read_network(&path, &owned_request))
            .await
            .map_err(|error| request.error(error))?
            .map_err(|error| request.error(error))?;

        info!(
            "kept {} nodes and {} drivable ways",
            network.number_of_nodes(),
            network.number_of_ways()
        );

        non_empty(request, network.into_road_graph())
    }
}
