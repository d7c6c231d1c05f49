// src/fetch.rs

use crate::error::{Error, Result};
use crate::io::pdb;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

pub const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download/";

/// Identifiers are at least four ASCII letters or digits (e.g. "1CRN").
pub fn validate_identifier(id: &str) -> Result<()> {
    if id.len() >= 4 && id.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(id.to_string()))
    }
}

pub fn rcsb_download_url(id: &str) -> String {
    format!("{}{}.{}", RCSB_DOWNLOAD_URL, id.to_lowercase(), pdb::EXTENSION)
}

/// Source of structure files that are not cached locally.
/// `Ok(None)` means the identifier is unknown to the remote.
pub trait RemoteFetcher {
    fn fetch_by_identifier(&self, id: &str) -> Result<Option<Vec<u8>>>;
}

impl<F> RemoteFetcher for F
where
    F: Fn(&str) -> Result<Option<Vec<u8>>>,
{
    fn fetch_by_identifier(&self, id: &str) -> Result<Option<Vec<u8>>> {
        self(id)
    }
}

/// Directory of downloaded `<ID>.pdb` files.
#[derive(Debug, Clone)]
pub struct StructureCache {
    dir: PathBuf,
}

impl StructureCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, pdb::EXTENSION))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Returns the cached file for `id`, fetching and storing it when absent.
    pub fn ensure(&self, id: &str, fetcher: &dyn RemoteFetcher) -> Result<PathBuf> {
        validate_identifier(id)?;
        let path = self.path_for(id);
        if self.contains(id) {
            debug!("{} found in cache", id);
            return Ok(path);
        }

        info!("Requesting {} from remote", id);
        let bytes = fetcher
            .fetch_by_identifier(id)?
            .ok_or_else(|| Error::Fetch {
                id: id.to_string(),
                details: "not found".to_string(),
            })?;

        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        fs::write(&path, &bytes).map_err(|e| Error::io(&path, e))?;
        info!("{} downloaded ({} bytes)", id, bytes.len());
        Ok(path)
    }
}
