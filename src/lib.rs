use std::path::Path;

use clap::ValueEnum;
use error::{GraphFetchError, SourceError};
use graphs::road_graph::RoadGraph;
use network::{
    overpass::{OverpassConfig, OverpassSource},
    pbf::PbfSource,
    GraphRequest, GraphSource,
};

pub mod error;
pub mod graphs;
pub mod images;
pub mod network;
pub mod points;
pub mod resolver;
pub mod route;
pub mod search;
pub mod session;
pub mod utility;

#[derive(Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// Overpass API over HTTP
    Overpass,
    /// Local .osm.pbf extract
    Pbf,
}

/// A graph source picked at runtime.
pub enum AnySource {
    Overpass(OverpassSource),
    Pbf(PbfSource),
}

impl AnySource {
    pub fn new(
        source_type: SourceType,
        overpass: OverpassConfig,
        pbf: Option<&Path>,
    ) -> Result<AnySource, SourceError> {
        Ok(match source_type {
            SourceType::Overpass => AnySource::Overpass(OverpassSource::new(overpass)?),
            SourceType::Pbf => AnySource::Pbf(PbfSource::new(pbf.ok_or(SourceError::MissingPbf)?)),
        })
    }
}

impl GraphSource for AnySource {
    async fn fetch(&self, request: &GraphRequest) -> Result<RoadGraph, GraphFetchError> {
        match self {
            AnySource::Overpass(source) => source.fetch(request).await,
            AnySource::Pbf(source) => source.fetch(request).await,
        }
    }
}
