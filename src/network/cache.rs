use std::{
    fs::File,
    hash::{Hash, Hasher},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use ahash::AHashMap;
use fxhash::FxHasher64;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{GraphRequest, GraphSource};
use crate::{
    error::{CacheError, GraphFetchError},
    graphs::road_graph::RoadGraph,
};

/// Bump when the on-disk layout of [`RoadGraph`] changes.
const CACHE_VERSION: u32 = 1;

pub const DEFAULT_CAPACITY: usize = 8;

struct CacheEntry {
    graph: Arc<RoadGraph>,
    last_used: u64,
}

#[derive(Default)]
struct CacheEntries {
    clock: u64,
    graphs: AHashMap<GraphRequest, CacheEntry>,
}

impl CacheEntries {
    fn get(&mut self, request: &GraphRequest) -> Option<Arc<RoadGraph>> {
        self.clock += 1;
        let clock = self.clock;
        let entry = self.graphs.get_mut(request)?;
        entry.last_used = clock;
        Some(Arc::clone(&entry.graph))
    }

    fn insert(&mut self, request: GraphRequest, graph: Arc<RoadGraph>, capacity: usize) {
        if capacity == 0 {
            return;
        }

        self.clock += 1;
        let last_used = self.clock;
        self.graphs.insert(request, CacheEntry { graph, last_used });

        while self.graphs.len() > capacity {
            let Some(least_recently_used) = self
                .graphs
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(request, _)| *request)
            else {
                break;
            };
            self.graphs.remove(&least_recently_used);
            debug!(
                "evicted road graph within {} m of {}",
                least_recently_used.radius_m, least_recently_used.center
            );
        }
    }
}

/// Road graphs keyed by center and radius, so a session downloads each street
/// network once.
///
/// Holds at most `capacity` graphs in memory and evicts the least recently
/// used one beyond that. With a disk directory, graphs also outlive the
/// process as versioned bincode files.
pub struct GraphCache {
    capacity: usize,
    entries: Mutex<CacheEntries>,
    disk_dir: Option<PathBuf>,
}

impl Default for GraphCache {
    fn default() -> Self {
        GraphCache::new(DEFAULT_CAPACITY)
    }
}

impl GraphCache {
    pub fn new(capacity: usize) -> GraphCache {
        GraphCache {
            capacity,
            entries: Mutex::new(CacheEntries::default()),
            disk_dir: None,
        }
    }

    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> GraphCache {
        self.disk_dir = Some(dir.into());
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, request: &GraphRequest) -> Option<Arc<RoadGraph>> {
        self.entries.lock().get(request)
    }

    pub fn insert(&self, request: GraphRequest, graph: Arc<RoadGraph>) {
        self.entries.lock().insert(request, graph, self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().graphs.clear();
    }

    /// Memory, then disk, then `source`. A failed fetch leaves the cache
    /// untouched. Disk problems are logged and fall through to the source.
    pub async fn get_or_fetch<S: GraphSource>(
        &self,
        request: &GraphRequest,
        source: &S,
    ) -> Result<Arc<RoadGraph>, GraphFetchError> {
        if let Some(graph) = self.get(request) {
            debug!("road graph for {} found in memory", request.center);
            return Ok(graph);
        }

        let disk_path = self
            .disk_dir
            .as_ref()
            .map(|dir| cache_file_path(dir, request));

        if let Some(path) = &disk_path {
            match read_graph_file(path, request) {
                Ok(Some(graph)) => {
                    info!("road graph loaded from {}", path.display());
                    let graph = Arc::new(graph);
                    self.insert(*request, Arc::clone(&graph));
                    return Ok(graph);
                }
                Ok(None) => {}
                Err(error) => warn!("ignoring cache file {}: {}", path.display(), error),
            }
        }

        let graph = Arc::new(source.fetch(request).await?);
        info!(
            "road graph has {} vertices and {} edges",
            graph.number_of_vertices(),
            graph.number_of_edges()
        );

        if let Some(path) = &disk_path {
            match write_graph_file(path, request, &graph) {
                Ok(()) => info!("road graph saved to {}", path.display()),
                Err(error) => warn!("could not write cache file {}: {}", path.display(), error),
            }
        }

        self.insert(*request, Arc::clone(&graph));
        Ok(graph)
    }
}

/// Stable across runs, unlike the randomly seeded in-memory hasher.
pub fn cache_file_name(request: &GraphRequest) -> String {
    let mut hasher = FxHasher64::default();
    request.hash(&mut hasher);
    format!("{:016x}.bincode", hasher.finish())
}

/// Where a cache rooted at `dir` keeps the graph for `request`.
pub fn cache_file_path(dir: &Path, request: &GraphRequest) -> PathBuf {
    dir.join(cache_file_name(request))
}

pub fn write_graph_file(
    path: &Path,
    request: &GraphRequest,
    graph: &RoadGraph,
) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::with_capacity(64 * 1024, File::create(path)?);
    bincode::serialize_into(&mut writer, &CACHE_VERSION)?;
    bincode::serialize_into(&mut writer, request)?;
    bincode::serialize_into(&mut writer, graph)?;
    writer.flush()?;

    Ok(())
}

/// `None` when the file is missing, was written by another cache version, or
/// belongs to another request that hashed to the same name.
pub fn read_graph_file(path: &Path, request: &GraphRequest) -> Result<Option<RoadGraph>, CacheError> {
    if !path.is_file() {
        return Ok(None);
    }

    let mut reader = BufReader::new(File::open(path)?);
    let version: u32 = bincode::deserialize_from(&mut reader)?;
    if version != CACHE_VERSION {
        debug!("cache file {} has version {}", path.display(), version);
        return Ok(None);
    }

    let cached_request: GraphRequest = bincode::deserialize_from(&mut reader)?;
    if cached_request != *request {
        return Ok(None);
    }

    Ok(Some(bincode::deserialize_from(&mut reader)?))
}
