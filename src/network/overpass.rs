use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use super::{
    non_empty,
    osm::{classify_way, OsmNetwork, OsmWay, DRIVABLE_HIGHWAYS},
    GraphRequest, GraphSource,
};
use crate::{
    error::{FetchFailure, GraphFetchError},
    graphs::road_graph::{Coordinate, RoadGraph},
};

pub const OVERPASS_API_URL: &str = "https://overpass-api.de/api/interpreter";

#[derive(Clone, Debug)]
pub struct OverpassConfig {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        OverpassConfig {
            url: OVERPASS_API_URL.to_string(),
            timeout: Duration::from_secs(180),
            user_agent: concat!("lot_router/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Downloads drivable streets around a point from an Overpass API instance.
pub struct OverpassSource {
    config: OverpassConfig,
    client: reqwest::Client,
}

impl OverpassSource {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(OverpassSource { config, client })
    }

    async fn download(&self, request: &GraphRequest) -> Result<OverpassResponse, FetchFailure> {
        let query = overpass_query(request, self.config.timeout);
        debug!("Overpass query:\n{}", query);

        let response = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "text/plain")
            .body(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchFailure::Status(response.status().as_u16()));
        }

        Ok(response.json().await?)
    }
}

impl GraphSource for OverpassSource {
    async fn fetch(&self, request: &GraphRequest) -> Result<RoadGraph, GraphFetchError> {
        info!(
            "downloading road graph within {} m of {} from {}",
            request.radius_m, request.center, self.config.url
        );

        let response = self
            .download(request)
            .await
            .map_err(|cause| request.error(cause))?;
        let network = response.into_network();
        info!(
            "received {} nodes and {} drivable ways",
            network.number_of_nodes(),
            network.number_of_ways()
        );

        non_empty(request, network.into_road_graph())
    }
}

pub fn overpass_query(request: &GraphRequest, timeout: Duration) -> String {
    format!(
        r#"[out:json][timeout:{}];
(
  way["highway"~"^({})$"](around:{},{},{});
);
(._;>;);
out body;"#,
        timeout.as_secs(),
        DRIVABLE_HIGHWAYS.join("|"),
        request.radius_m,
        request.center.latitude,
        request.center.longitude
    )
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: std::collections::HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

impl OverpassResponse {
    pub fn into_network(self) -> OsmNetwork {
        let mut network = OsmNetwork::new();

        for element in self.elements {
            match element {
                OverpassElement::Node { id, lat, lon } => {
                    network.add_node(id, Coordinate::new(lat, lon))
                }
                OverpassElement::Way { nodes, tags } => {
                    let tags = tags.iter().map(|(key, value)| (key.as_str(), value.as_str()));
                    if let Some(oneway) = classify_way(tags) {
                        network.add_way(OsmWay { nodes, oneway });
                    }
                }
                OverpassElement::Other => {}
            }
        }

        network
    }
}
