//! Persisted cache envelope (spec §4.3 / §6): a versioned document holding
//! the serialized graph and the mtimes observed when it was built, stored
//! under a deterministic platform-cache path derived from a hash of the
//! project root. A corrupted or version-mismatched file is treated as
//! absent (`IndexError::CacheCorrupt` is returned only to callers that ask
//! to see why; `load_cache` itself just degrades to `None`).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{IndexError, IndexResult};
use crate::graph::CodeGraph;

/// Current cache format version. Bump whenever the graph's node/edge or
/// envelope layout changes in a way bincode can't transparently read.
pub const CACHE_VERSION: u32 = 1;

const ENV_CACHE_DIR: &str = "CODE_INDEX_CACHE_DIR";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FileMeta {
    pub mtime_secs: u64,
    pub size: u64,
}

#[derive(serde::Serialize, serde::Deserialize)]
pub struct CacheEnvelope {
    pub version: u32,
    pub project_root: PathBuf,
    pub file_mtimes: HashMap<PathBuf, FileMeta>,
    pub graph: CodeGraph,
}

/// `hex16(sha256(project_root))` — the first 16 hex characters (8 bytes)
/// of the root's sha256 digest, per spec §6.
fn project_hash(project_root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_root.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// The platform cache directory, honoring `CODE_INDEX_CACHE_DIR` when set.
fn cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("code-index")
}

/// `<cache_dir>/<hex16(sha256(project_root))>.json` — spec §6's one file
/// per project root. The `.json` extension is historical to the format
/// name; the actual encoding is bincode, chosen for speed over the
/// teacher's own choice of the same crate.
pub fn cache_path(project_root: &Path) -> PathBuf {
    cache_dir().join(format!("{}.json", project_hash(project_root)))
}

pub fn collect_file_mtimes(graph: &CodeGraph) -> HashMap<PathBuf, FileMeta> {
    let mut mtimes = HashMap::new();
    for (path, _) in graph.file_nodes() {
        if let Ok(metadata) = std::fs::metadata(&path) {
            let mtime_secs = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0);
            mtimes.insert(
                path,
                FileMeta {
                    mtime_secs,
                    size: metadata.len(),
                },
            );
        }
    }
    mtimes
}

/// Save the graph to disk atomically: write to a temp file in the cache
/// directory, then rename into place.
pub fn save_cache(project_root: &Path, graph: &CodeGraph) -> IndexResult<()> {
    let dir = cache_dir();
    std::fs::create_dir_all(&dir).map_err(|source| IndexError::IoError {
        path: dir.clone(),
        source,
    })?;

    let envelope = CacheEnvelope {
        version: CACHE_VERSION,
        project_root: project_root.to_path_buf(),
        file_mtimes: collect_file_mtimes(graph),
        graph: graph.clone(),
    };

    let target = cache_path(project_root);
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|source| IndexError::IoError {
        path: dir.clone(),
        source,
    })?;
    bincode::serde::encode_into_std_write(&envelope, &mut tmp, bincode::config::standard())
        .map_err(|e| IndexError::CacheCorrupt {
            path: target.clone(),
            reason: e.to_string(),
        })?;
    tmp.as_file().flush().map_err(|source| IndexError::IoError {
        path: target.clone(),
        source,
    })?;
    tmp.persist(&target).map_err(|e| IndexError::IoError {
        path: target.clone(),
        source: e.error,
    })?;

    Ok(())
}

/// Load the cached graph from disk. Returns `None` when the file is
/// missing, unparsable, or from an incompatible version — any of which
/// triggers a cold rebuild upstream.
pub fn load_cache(project_root: &Path) -> Option<CacheEnvelope> {
    let target = cache_path(project_root);
    let bytes = std::fs::read(&target).ok()?;
    let result =
        bincode::serde::decode_from_slice::<CacheEnvelope, _>(&bytes, bincode::config::standard());
    match result {
        Ok((envelope, _)) if envelope.version == CACHE_VERSION => Some(envelope),
        _ => None,
    }
}
