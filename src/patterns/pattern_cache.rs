//! On-disk cache of the topology and pattern table.
//!
//! One bincode file per `(size, variant)`. A file that fails to decode, or that
//! describes a different board, is rebuilt and overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::topology::{BoardSize, Topology, Variant};
use crate::chess_errors::ConfigResult;
use crate::patterns::pattern_table::PatternTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternBundle {
    pub topology: Topology,
    pub patterns: PatternTable,
}

impl PatternBundle {
    pub fn build(size: BoardSize, variant: Variant) -> ConfigResult<Self> {
        let topology = Topology::build(size, variant)?;
        let patterns = PatternTable::build(&topology)?;
        Ok(Self { topology, patterns })
    }

    #[inline]
    fn describes(&self, size: BoardSize, variant: Variant) -> bool {
        self.topology.size == size && self.topology.variant == variant
    }
}

pub fn cache_file_name(size: BoardSize, variant: Variant) -> String {
    format!("patterns_{}x{}_{}.bin", size.rows, size.cols, variant)
}

pub fn encode_bundle(bundle: &PatternBundle) -> ConfigResult<Vec<u8>> {
    Ok(bincode::serialize(bundle)?)
}

pub fn decode_bundle(bytes: &[u8]) -> ConfigResult<PatternBundle> {
    Ok(bincode::deserialize(bytes)?)
}

pub fn save_bundle(dir: &Path, bundle: &PatternBundle) -> ConfigResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(cache_file_name(bundle.topology.size, bundle.topology.variant));
    fs::write(&path, encode_bundle(bundle)?)?;
    debug!(path = %path.display(), "saved pattern cache");
    Ok(path)
}

/// `Ok(None)` when no cache file exists yet.
pub fn load_bundle(dir: &Path, size: BoardSize, variant: Variant) -> ConfigResult<Option<PatternBundle>> {
    let path = dir.join(cache_file_name(size, variant));
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(&path)?;
    Ok(Some(decode_bundle(&bytes)?))
}

/// Load from `dir` when possible, otherwise build and, if a directory was
/// given, write the cache for next time.
pub fn load_or_build(dir: Option<&Path>, size: BoardSize, variant: Variant) -> ConfigResult<PatternBundle> {
    let Some(dir) = dir else {
        return PatternBundle::build(size, variant);
    };

    match load_bundle(dir, size, variant) {
        Ok(Some(bundle)) if bundle.describes(size, variant) => {
            debug!(dir = %dir.display(), %variant, "pattern cache hit");
            return Ok(bundle);
        }
        Ok(Some(_)) => warn!(dir = %dir.display(), "pattern cache describes another board, rebuilding"),
        Ok(None) => debug!(dir = %dir.display(), %variant, "pattern cache miss"),
        Err(err) => warn!(dir = %dir.display(), %err, "unreadable pattern cache, rebuilding"),
    }

    let bundle = PatternBundle::build(size, variant)?;
    save_bundle(dir, &bundle)?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wormhole_chess_cache_{tag}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn bundle_round_trips_through_bincode() {
        let bundle = PatternBundle::build(BoardSize::SIX, Variant::Wormhole).expect("bundle should build");
        let bytes = encode_bundle(&bundle).expect("bundle should encode");
        let back = decode_bundle(&bytes).expect("bundle should decode");
        assert_eq!(back, bundle);
    }

    #[test]
    fn load_or_build_writes_then_reads_the_cache() {
        let dir = scratch_dir("rw");
        let built = load_or_build(Some(&dir), BoardSize::EIGHT, Variant::Normal).expect("first call should build");
        assert!(dir.join(cache_file_name(BoardSize::EIGHT, Variant::Normal)).exists());
        let loaded = load_bundle(&dir, BoardSize::EIGHT, Variant::Normal)
            .expect("cache should read")
            .expect("cache file should exist");
        assert_eq!(loaded, built);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_cache_is_rebuilt() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).expect("scratch dir should be created");
        fs::write(dir.join(cache_file_name(BoardSize::SIX, Variant::Normal)), b"not bincode")
            .expect("corrupt file should be written");
        let bundle = load_or_build(Some(&dir), BoardSize::SIX, Variant::Normal).expect("corrupt cache should be rebuilt");
        assert_eq!(bundle.topology.tile_count(), 36);
        let _ = fs::remove_dir_all(&dir);
    }
}
