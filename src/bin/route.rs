use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use geojson::FeatureCollection;
use lot_router::{
    error::ResolveError,
    images::RouteImages,
    network::{
        cache::{GraphCache, DEFAULT_CAPACITY},
        overpass::{OverpassConfig, OVERPASS_API_URL},
    },
    points::{PointId, PointSet, DEFAULT_ORIGIN_ID},
    route::Route,
    session::{RoutingSession, SessionConfig, DEFAULT_RADIUS_M},
    utility::get_progressspinner,
    AnySource, SourceType,
};
use tracing::{info, Level};

#[derive(Debug, ValueEnum, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
    Geojson,
}

/// Shortest driving route from the condominium gate to a lot.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Gate and lots as a GeoJSON FeatureCollection of points
    #[arg(short, long)]
    points: PathBuf,

    /// Lot number to route to
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        required_unless_present = "all",
        conflicts_with = "all"
    )]
    lot: Option<u32>,

    /// Route to every lot of the dataset
    #[arg(long)]
    all: bool,

    /// Id of the point every route starts at
    #[arg(long, default_value = DEFAULT_ORIGIN_ID)]
    origin_id: String,

    /// Radius of the road network around the origin, in meters
    #[arg(short, long, default_value_t = DEFAULT_RADIUS_M)]
    radius: u32,

    /// Where the road network comes from
    #[arg(long, value_enum, default_value_t = SourceType::Overpass)]
    source: SourceType,

    /// Local .osm.pbf extract, for --source pbf
    #[arg(long, required_if_eq("source", "pbf"))]
    pbf: Option<PathBuf>,

    #[arg(long, env = "LOT_ROUTER_OVERPASS_URL", default_value = OVERPASS_API_URL)]
    overpass_url: String,

    /// Keep downloaded road networks in this directory
    #[arg(long, env = "LOT_ROUTER_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Directory of pre-rendered NNN.png route images, checked before routing
    #[arg(long)]
    images: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    if let (Some(lot), Some(dir)) = (args.lot, &args.images) {
        if let Some(image) = RouteImages::new(dir).find(lot) {
            println!("Route image for lot {}: {}", lot, image.display());
            return Ok(());
        }
        info!(
            "no {} in {}, computing the route",
            RouteImages::file_name(lot),
            dir.display()
        );
    }

    let points = PointSet::from_geojson_file(&args.points)
        .with_context(|| format!("reading {}", args.points.display()))?;
    let overpass = OverpassConfig {
        url: args.overpass_url.clone(),
        ..OverpassConfig::default()
    };
    let source = AnySource::new(args.source, overpass, args.pbf.as_deref())?;
    let mut cache = GraphCache::new(DEFAULT_CAPACITY);
    if let Some(dir) = &args.cache_dir {
        cache = cache.with_disk_dir(dir);
    }
    let config = SessionConfig {
        origin_id: PointId::from(args.origin_id.as_str()),
        radius_m: args.radius,
    };
    let session = RoutingSession::new(points, source, cache, config)
        .map_err(|error| anyhow::anyhow!(explain(&error)))?;

    match args.lot {
        Some(lot) => {
            let spinner = get_progressspinner(&format!("Routing to lot {}", lot));
            let route = session.route_to_lot(lot).await;
            spinner.finish_and_clear();

            let route = route.map_err(|error| anyhow::anyhow!(explain(&error)))?;
            print_routes(&[route], args.format)?;
        }
        None => {
            let spinner = get_progressspinner("Fetching road graph");
            let routes = session.route_all().await;
            spinner.finish_and_clear();

            let mut resolved = Vec::new();
            for (destination, route) in routes? {
                match route {
                    Ok(route) => resolved.push(route),
                    Err(error) => eprintln!("{}: {}", destination, explain(&error)),
                }
            }
            print_routes(&resolved, args.format)?;
        }
    }

    Ok(())
}

/// What went wrong, phrased for whoever asked for the route.
fn explain(error: &ResolveError) -> String {
    match error {
        ResolveError::PointNotFound { id } => {
            format!("`{}` is not in the point dataset", id)
        }
        ResolveError::GraphFetch(error) => {
            format!("{}. Check the connection or the extract and try again", error)
        }
        ResolveError::NotFound { .. } => {
            format!("{}. Try a larger --radius", error)
        }
        ResolveError::NoPath { .. } => {
            format!(
                "{}. The lot is not connected to the gate within the fetched streets, try a larger --radius",
                error
            )
        }
    }
}

fn print_routes(routes: &[Route], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for route in routes {
                println!(
                    "{} -> {}: {} m over {} segments",
                    route.origin,
                    route.destination,
                    route.distance,
                    route.number_of_segments()
                );
                for coordinate in &route.coordinates {
                    println!("  {:.7}, {:.7}", coordinate.latitude, coordinate.longitude);
                }
            }
        }
        OutputFormat::Json => match routes {
            [route] => println!("{}", serde_json::to_string_pretty(route)?),
            routes => println!("{}", serde_json::to_string_pretty(routes)?),
        },
        OutputFormat::Geojson => match routes {
            [route] => println!("{}", route.to_geojson_feature()),
            routes => {
                let collection = FeatureCollection {
                    bbox: None,
                    features: routes.iter().map(Route::to_geojson_feature).collect(),
                    foreign_members: None,
                };
                println!("{}", collection);
            }
        },
    }

    Ok(())
}
