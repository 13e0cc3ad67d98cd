//! Incremental compilation cache management.
//!
//! This crate provides content-hash-based caching for parsed ASTs and other
//! intermediate artifacts, enabling fast incremental rebuilds when only a subset
//! of source files have changed. It also persists full placed-and-routed
//! projects so a later run can skip pack/place/route entirely.

#![warn(missing_docs)]

mod artifact;
mod cache;
mod error;
mod hasher;
mod manifest;
mod project;

pub use artifact::{ArtifactHeader, ArtifactStore};
pub use cache::Cache;
pub use error::CacheError;
pub use hasher::{ChangeSet, SourceHasher};
pub use manifest::{CacheManifest, FileCache, ModuleCacheEntry, TargetCache};
pub use project::{ChipArgs, PersistedProject, ProjectSettings};
