//! High-level cache orchestrator.
//!
//! The `Cache` type ties together the manifest, artifact store, and source
//! hasher into a single interface for the build pipeline. It handles loading
//! or creating the cache, detecting file changes, storing and retrieving
//! cached ASTs, and garbage collection.

use std::path::{Path, PathBuf};

use aion_common::ContentHash;

use crate::artifact::ArtifactStore;
use crate::error::CacheError;
use crate::hasher::{ChangeSet, SourceHasher};
use crate::manifest::{CacheManifest, FileCache};

/// Subdirectory name for cached AST artifacts.
const AST_SUBDIR: &str = "ast";

/// File extension for cached AST artifacts.
const AST_EXT: &str = "ast";

/// High-level cache manager for incremental builds.
///
/// Orchestrates the cache manifest, content-addressed artifact store, and
/// source file hashing to enable skipping reparsing of unchanged files.
/// All reads are fail-safe: corruption or version mismatches result in
/// cache misses rather than errors.
pub struct Cache {
    /// Root directory for all cache files.
    cache_dir: PathBuf,

    /// The cache manifest tracking file and module state.
    manifest: CacheManifest,

    /// Content-addressed binary artifact store.
    store: ArtifactStore,

    /// Aion version string for compatibility checks.
    aion_version: String,
}

impl Cache {
    /// Loads an existing cache or creates a fresh one.
    ///
    /// If a manifest exists and is compatible with the current Aion version,
    /// it is loaded. Otherwise a new empty manifest is created. This is
    /// fail-safe: any problem with the existing cache results in starting fresh.
    pub fn load_or_create(cache_dir: &Path, aion_version: &str) -> Self {
        let manifest = CacheManifest::load(cache_dir)
            .filter(|m| m.is_compatible(aion_version))
            .unwrap_or_else(|| CacheManifest::new(aion_version));

        Self {
            cache_dir: cache_dir.to_path_buf(),
            manifest,
            store: ArtifactStore::new(cache_dir),
            aion_version: aion_version.to_string(),
        }
    }

    /// Detects which source files have changed since the last build.
    ///
    /// Reads and hashes the given files, then compares against the manifest
    /// to categorize each file as new, modified, deleted, or unchanged.
    pub fn detect_changes(&self, file_paths: &[PathBuf]) -> ChangeSet {
        let hashes = SourceHasher::hash_files(file_paths);
        SourceHasher::detect_changes(&hashes, &self.manifest)
    }

    /// Stores a cached AST artifact for a source file.
    ///
    /// Records the content hash, cache key, and defined module names in the
    /// manifest. The actual AST bytes are written to the artifact store.
    pub fn store_ast(
        &mut self,
        path: &Path,
        content_hash: ContentHash,
        ast_bytes: &[u8],
        modules_defined: Vec<String>,
    ) -> Result<String, CacheError> {
        let key = self.store.write_artifact(
            AST_SUBDIR,
            AST_EXT,
            &content_hash,
            ast_bytes,
            &self.aion_version,
        )?;

        self.manifest.files.insert(
            path.to_path_buf(),
            FileCache {
                content_hash,
                ast_cache_key: key.clone(),
                modules_defined,
            },
        );

        Ok(key)
    }

    /// Loads a cached AST artifact for a source file.
    ///
    /// Returns `None` if the file is not in the manifest, the artifact
    /// is missing, or validation fails. This is fail-safe.
    pub fn load_ast(&self, path: &Path) -> Option<Vec<u8>> {
        let fc = self.manifest.files.get(path)?;
        self.store
            .read_artifact(AST_SUBDIR, &fc.ast_cache_key, AST_EXT)
    }

    /// Removes entries for deleted files from the manifest.
    ///
    /// Should be called after detecting changes to clean up stale entries.
    pub fn remove_deleted(&mut self, deleted_paths: &[PathBuf]) {
        for path in deleted_paths {
            self.manifest.files.remove(path);
        }
    }

    /// Persists the current manifest to disk.
    pub fn save(&self) -> Result<(), CacheError> {
        self.manifest.save(&self.cache_dir)
    }

    /// Returns a reference to the current cache manifest.
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    /// Runs garbage collection on AST artifacts.
    ///
    /// Removes any artifact files that are not referenced by the current
    /// manifest. Returns the number of files removed.
    pub fn gc(&self) -> Result<usize, CacheError> {
        let live_keys: Vec<&str> = self
            .manifest
            .files
            .values()
            .map(|fc| fc.ast_cache_key.as_str())
            .collect();
        self.store.gc(AST_SUBDIR, AST_EXT, &live_keys)
    }
}
