// Key-value asset store
// Snapshots the asset root into memory at startup and resolves lookups
// through the request-to-asset mapping and the optional manifest.

use super::error::AssetError;
use crate::http::mime;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A stored asset: body bytes plus the content type derived from its key.
#[derive(Debug, Clone)]
pub struct Asset {
    pub body: Bytes,
    pub content_type: &'static str,
}

/// How a lookup interacts with the startup snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve from the in-memory snapshot taken at startup.
    #[default]
    Default,
    /// Re-read the backing directory on every lookup (debug mode,
    /// picks up file edits immediately).
    Bypass,
}

/// Per-request lookup options.
///
/// Two recognized fields: an override for the default request-to-asset
/// mapping, and the cache mode. Constructed fresh per request.
#[derive(Default)]
pub struct LookupOptions<'a> {
    pub map_request: Option<&'a (dyn Fn(&str) -> String + Send + Sync)>,
    pub cache_mode: CacheMode,
}

/// In-memory key-value store of static assets.
///
/// Keys are URL paths (`/js/app.js`). The optional manifest maps request
/// paths to storage keys, so content-hashed filenames can sit behind
/// stable URLs.
pub struct KvAssetStore {
    root: PathBuf,
    manifest: HashMap<String, String>,
    entries: HashMap<String, Asset>,
}

impl KvAssetStore {
    /// Walk `root` and snapshot every file into the store.
    ///
    /// `manifest_path`, when set, points at a JSON object mapping request
    /// paths to storage keys; it is applied on every lookup after the
    /// request-to-asset mapping.
    pub async fn load(
        root: impl AsRef<Path>,
        manifest_path: Option<&str>,
    ) -> Result<Self, AssetError> {
        let root = root.as_ref().to_path_buf();

        let manifest = match manifest_path {
            Some(path) => {
                let text = fs::read_to_string(path).await?;
                serde_json::from_str(&text)?
            }
            None => HashMap::new(),
        };

        let mut entries = HashMap::new();
        let mut dirs = vec![root.clone()];
        while let Some(dir) = dirs.pop() {
            let mut listing = fs::read_dir(&dir).await?;
            while let Some(entry) = listing.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    dirs.push(path);
                } else if file_type.is_file() {
                    let Ok(relative) = path.strip_prefix(&root) else {
                        continue;
                    };
                    let key = key_for(relative);
                    let body = Bytes::from(fs::read(&path).await?);
                    entries.insert(key, make_asset(body, &path));
                }
            }
        }

        Ok(Self {
            root,
            manifest,
            entries,
        })
    }

    /// Build a store directly from key/asset pairs (embedding and tests).
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Asset)>) -> Self {
        Self {
            root: PathBuf::new(),
            manifest: HashMap::new(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of snapshotted entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the path-to-key manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: HashMap<String, String>) -> Self {
        self.manifest = manifest;
        self
    }

    /// Default request-to-asset mapping.
    ///
    /// Directory-style paths get `index.html` appended; a final segment
    /// without an extension gets `/index.html` appended; everything else
    /// passes through unchanged.
    pub fn map_request_to_asset(path: &str) -> String {
        if path.ends_with('/') {
            return format!("{path}index.html");
        }
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        if last_segment.contains('.') {
            path.to_string()
        } else {
            format!("{path}/index.html")
        }
    }

    /// Look up the asset for a request path.
    ///
    /// The path goes through the override mapper (or the default mapping)
    /// and then the manifest before the store is consulted. `Bypass` mode
    /// reads the backing file instead of the snapshot.
    pub async fn get(
        &self,
        path: &str,
        options: &LookupOptions<'_>,
    ) -> Result<Asset, AssetError> {
        let mapped = match options.map_request {
            Some(mapper) => mapper(path),
            None => Self::map_request_to_asset(path),
        };
        let key = self.manifest.get(&mapped).cloned().unwrap_or(mapped);

        match options.cache_mode {
            CacheMode::Default => self
                .entries
                .get(&key)
                .cloned()
                .ok_or(AssetError::NotFound { key }),
            CacheMode::Bypass => self.read_through(&key).await,
        }
    }

    /// Read an asset straight from the backing directory.
    async fn read_through(&self, key: &str) -> Result<Asset, AssetError> {
        // Strip the leading slash and neutralize traversal segments
        let clean = key.trim_start_matches('/').replace("..", "");
        let path = self.root.join(clean);

        match fs::read(&path).await {
            Ok(body) => Ok(make_asset(Bytes::from(body), &path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AssetError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(AssetError::Io(e)),
        }
    }
}

/// URL-path key for a file relative to the asset root.
fn key_for(relative: &Path) -> String {
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

fn make_asset(body: Bytes, path: &Path) -> Asset {
    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Asset { body, content_type }
}
