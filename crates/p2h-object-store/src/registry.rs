use std::sync::Arc;

use log::debug;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use p2h_common::error::{CommonError, CommonResult};
use url::Url;

/// Builds the object store serving the given store URL.
///
/// S3 credentials and region are resolved from the standard `AWS_*` environment variables.
pub fn get_object_store(url: &Url) -> CommonResult<Arc<dyn ObjectStore>> {
    match url.scheme() {
        "s3" | "s3a" => {
            let bucket = url
                .host_str()
                .ok_or_else(|| CommonError::invalid(format!("missing bucket in URL: {url}")))?;
            debug!("Creating S3 object store for bucket {bucket}");
            let store = AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| CommonError::invalid(e.to_string()))?;
            Ok(Arc::new(store))
        }
        "file" => Ok(Arc::new(LocalFileSystem::new())),
        "memory" => Ok(Arc::new(InMemory::new())),
        scheme => Err(CommonError::invalid(format!(
            "unsupported object store scheme: {scheme}"
        ))),
    }
}
