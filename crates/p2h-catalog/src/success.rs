use std::sync::Arc;

use log::debug;
use moka::sync::Cache;
use object_store::path::Path;
use object_store::ObjectStore;

use crate::error::CatalogResult;

pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Looks up `_SUCCESS` markers, remembering the answer for each directory.
///
/// Many data files share a directory, so a listing would otherwise probe
/// the same marker repeatedly. Entries never expire during a run.
pub struct SuccessMarkerProbe {
    store: Arc<dyn ObjectStore>,
    cache: Cache<Path, bool>,
}

impl SuccessMarkerProbe {
    pub fn new(store: Arc<dyn ObjectStore>, max_entries: u64) -> Self {
        debug!("Caching up to {max_entries} success marker lookups");
        Self {
            store,
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Whether `<directory>/_SUCCESS` exists. A missing object is not an error.
    pub async fn exists(&self, directory: &Path) -> CatalogResult<bool> {
        if let Some(exists) = self.cache.get(directory) {
            return Ok(exists);
        }
        let marker = directory.child(SUCCESS_MARKER);
        let exists = match self.store.head(&marker).await {
            Ok(_) => true,
            Err(object_store::Error::NotFound { .. }) => false,
            Err(e) => return Err(e.into()),
        };
        debug!("Success marker {marker} exists: {exists}");
        self.cache.insert(directory.clone(), exists);
        Ok(exists)
    }
}
