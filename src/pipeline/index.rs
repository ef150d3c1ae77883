//! Persisted dedup index of previously seen listing ids.
//!
//! ## On-disk format
//!
//! A flat array of little-endian `u64` ids, fully rewritten on each save.
//! There is no incremental/log format; a save replaces the whole set.
//!
//! ## Crash safety
//!
//! Saves write to a temp file and rename it over the target, so an
//! interrupted save leaves the previous file intact. A missing, unreadable,
//! or malformed file loads as the empty set (cold start, not an error).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::Listing;

/// Handle to the persisted set of seen listing ids.
#[derive(Debug, Clone)]
pub struct DedupIndex {
    path: PathBuf,
}

impl DedupIndex {
    /// Create an index handle backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted id set.
    ///
    /// Any read or format failure yields the empty set. First runs have no
    /// backing file, so this path is expected, not a fault.
    pub async fn load(&self) -> HashSet<u64> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(_) => return HashSet::new(),
        };

        if bytes.len() % 8 != 0 {
            // Not a valid id array; treat as a cold start.
            return HashSet::new();
        }

        bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                u64::from_le_bytes(buf)
            })
            .collect()
    }

    /// Partition `current` into listings whose id is absent from `seen`.
    ///
    /// Order of the returned listings matches their order in `current`.
    /// Pure: neither input is mutated.
    pub fn diff(current: &[Listing], seen: &HashSet<u64>) -> (Vec<Listing>, HashSet<u64>) {
        let fresh: Vec<Listing> = current
            .iter()
            .filter(|listing| !seen.contains(&listing.id))
            .cloned()
            .collect();
        let fresh_ids: HashSet<u64> = fresh.iter().map(|listing| listing.id).collect();
        (fresh, fresh_ids)
    }

    /// Write the union of `seen` and `fresh_ids`, replacing prior contents.
    ///
    /// Ids are written sorted so repeated saves of the same set are
    /// byte-identical.
    pub async fn merge_and_save(&self, seen: &HashSet<u64>, fresh_ids: &HashSet<u64>) -> Result<()> {
        let mut ids: Vec<u64> = seen.union(fresh_ids).copied().collect();
        ids.sort_unstable();

        let mut bytes = Vec::with_capacity(ids.len() * 8);
        for id in ids {
            bytes.extend_from_slice(&id.to_le_bytes());
        }

        self.write_atomic(&bytes).await
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
