use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use tracing::warn;

use crate::core::model::Extraction;

const DEFAULT_MAX_MEMORY_ENTRIES: usize = 1000;

/// One cached per-file extraction, validated by content hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedExtraction {
    extraction: Extraction,
    content_hash: u64,
}

/// Thread-safe extraction cache with a bounded memory tier and a
/// best-effort disk tier.
///
/// Keyed by canonical path and validated against a hash of the file
/// content, so a hit can never observe state the caller did not supply;
/// repeated runs over identical input stay deterministic with or without
/// the cache.
pub struct ExtractionCache {
    memory: DashMap<String, CachedExtraction>,
    disk_dir: Option<PathBuf>,
    max_memory_entries: usize,
}

impl ExtractionCache {
    pub fn new(disk_dir: Option<PathBuf>) -> Self {
        let resolved = disk_dir.unwrap_or_else(|| std::env::temp_dir().join("depscan_cache"));
        let disk_dir = match fs::create_dir_all(&resolved) {
            Ok(()) => Some(resolved),
            Err(err) => {
                warn!(dir = %resolved.display(), %err, "disk cache unavailable; memory only");
                None
            }
        };
        Self {
            memory: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            disk_dir,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    /// Cache without a disk tier.
    pub fn in_memory_only() -> Self {
        Self {
            memory: DashMap::with_capacity(DEFAULT_MAX_MEMORY_ENTRIES),
            disk_dir: None,
            max_memory_entries: DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }

    pub fn content_hash(content: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.hash(&mut hasher);
        hasher.finish()
    }

    /// Returns the cached extraction when the stored hash matches the
    /// current content.
    pub fn get(&self, path: &str, content_hash: u64) -> Option<Extraction> {
        if let Some(entry) = self.memory.get(path) {
            if entry.content_hash == content_hash {
                return Some(entry.extraction.clone());
            }
        }

        let disk_path = self.disk_path(path)?;
        let entry = self.load_from_disk(&disk_path)?;
        if entry.content_hash != content_hash {
            return None;
        }
        let extraction = entry.extraction.clone();
        if self.memory.len() < self.max_memory_entries {
            self.memory.insert(path.to_string(), entry);
        }
        Some(extraction)
    }

    pub fn store(&self, path: &str, content_hash: u64, extraction: &Extraction) {
        let entry = CachedExtraction {
            extraction: extraction.clone(),
            content_hash,
        };

        if self.memory.len() >= self.max_memory_entries {
            // Evict an arbitrary entry to stay bounded.
            if let Some(victim) = self.memory.iter().next() {
                let key = victim.key().clone();
                drop(victim);
                self.memory.remove(&key);
            }
        }
        self.memory.insert(path.to_string(), entry.clone());

        if let Some(disk_path) = self.disk_path(path) {
            if let Err(err) = self.store_to_disk(&disk_path, &entry) {
                warn!(path, %err, "failed to write cache entry");
            }
        }
    }

    pub fn clear(&self) {
        self.memory.clear();
        if let Some(dir) = &self.disk_dir {
            if dir.exists() {
                if let Err(err) = fs::remove_dir_all(dir).and_then(|_| fs::create_dir_all(dir)) {
                    warn!(dir = %dir.display(), %err, "failed to clear disk cache");
                }
            }
        }
    }

    fn disk_path(&self, path: &str) -> Option<PathBuf> {
        let dir = self.disk_dir.as_ref()?;
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Some(dir.join(format!("extract_{:x}.bincode", hasher.finish())))
    }

    fn load_from_disk(&self, disk_path: &PathBuf) -> Option<CachedExtraction> {
        let data = fs::read(disk_path).ok()?;
        bincode::deserialize(&data).ok()
    }

    fn store_to_disk(&self, disk_path: &PathBuf, entry: &CachedExtraction) -> anyhow::Result<()> {
        let data = bincode::serialize(entry)?;
        fs::write(disk_path, data)?;
        Ok(())
    }
}
