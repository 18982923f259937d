use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use lot_router::{
    graphs::road_graph::Coordinate,
    network::{
        cache::{cache_file_path, write_graph_file},
        overpass::{OverpassConfig, OVERPASS_API_URL},
        GraphRequest, GraphSource,
    },
    session::DEFAULT_RADIUS_M,
    utility::get_progressspinner,
    AnySource, SourceType,
};
use tracing::{info, Level};

/// Downloads the road network around a point and stores it as bincode.
/// Writing into `--cache-dir` lets `route --cache-dir` skip the download.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("target").required(true).multiple(true).args(["out", "cache_dir"])))]
struct Args {
    #[arg(long, allow_negative_numbers = true)]
    latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    longitude: f64,

    /// Radius in meters
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_M)]
    radius: u32,

    #[arg(long, value_enum, default_value_t = SourceType::Overpass)]
    source: SourceType,

    /// Local .osm.pbf extract, for --source pbf
    #[arg(long, required_if_eq("source", "pbf"))]
    pbf: Option<PathBuf>,

    #[arg(long, env = "LOT_ROUTER_OVERPASS_URL", default_value = OVERPASS_API_URL)]
    overpass_url: String,

    /// Outfile, takes precedence over --cache-dir
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Cache directory to write into, created if missing
    #[arg(long, env = "LOT_ROUTER_CACHE_DIR")]
    cache_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let request = GraphRequest::new(Coordinate::new(args.latitude, args.longitude), args.radius);
    let overpass = OverpassConfig {
        url: args.overpass_url.clone(),
        ..OverpassConfig::default()
    };
    let source = AnySource::new(args.source, overpass, args.pbf.as_deref())?;

    let spinner = get_progressspinner("Fetching road graph");
    let graph = source.fetch(&request).await;
    spinner.finish_and_clear();
    let graph = graph?;

    let out = match (&args.out, &args.cache_dir) {
        (Some(out), _) => out.clone(),
        (None, Some(dir)) => cache_file_path(dir, &request),
        (None, None) => anyhow::bail!("either --out or --cache-dir is required"),
    };
    write_graph_file(&out, &request, &graph)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "wrote {} vertices and {} edges to {}",
        graph.number_of_vertices(),
        graph.number_of_edges(),
        out.display()
    );

    Ok(())
}
