use std::fmt;

use object_store::path::{Path, DELIMITER};
use p2h_common::error::{CommonError, CommonResult};
use url::Url;

/// Where a versioned dataset lives: the store that holds it
/// and the key prefix under which its version directories sit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLocation {
    store_url: Url,
    prefix: Path,
    location: String,
}

impl DatasetLocation {
    /// Accepts `s3://bucket/prefix`, `s3a://...`, `file:///abs/path`, `memory:///prefix`
    /// or a plain local path.
    pub fn parse(value: &str) -> CommonResult<Self> {
        let location = value.trim_end_matches('/');
        if location.is_empty() {
            return Err(CommonError::invalid("empty dataset location"));
        }
        let url = if location.contains("://") {
            Url::parse(location).map_err(|e| CommonError::invalid(format!("{location}: {e}")))?
        } else {
            let path = std::path::absolute(location)
                .map_err(|e| CommonError::invalid(format!("{location}: {e}")))?;
            Url::from_file_path(&path).map_err(|()| {
                CommonError::invalid(format!("not a valid file path: {}", path.display()))
            })?
        };
        let (store_url, prefix) = match url.scheme() {
            "s3" | "s3a" => {
                let bucket = url.host_str().ok_or_else(|| {
                    CommonError::invalid(format!("missing bucket in dataset location: {location}"))
                })?;
                let store_url = Url::parse(&format!("{}://{bucket}", url.scheme()))
                    .map_err(|e| CommonError::internal(e.to_string()))?;
                (store_url, url_path(&url)?)
            }
            "file" | "memory" => {
                let store_url = Url::parse(&format!("{}:///", url.scheme()))
                    .map_err(|e| CommonError::internal(e.to_string()))?;
                (store_url, url_path(&url)?)
            }
            scheme => {
                return Err(CommonError::invalid(format!(
                    "unsupported dataset location scheme: {scheme}"
                )))
            }
        };
        if prefix.parts().next().is_none() {
            return Err(CommonError::invalid(format!(
                "dataset location must include a key prefix: {location}"
            )));
        }
        let location = if url.scheme() == "file" && !value.contains("://") {
            url.as_str().trim_end_matches('/').to_string()
        } else {
            location.to_string()
        };
        Ok(Self {
            store_url,
            prefix,
            location,
        })
    }

    /// The URL identifying the object store, without any key prefix.
    pub fn store_url(&self) -> &Url {
        &self.store_url
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The dataset location as it appears in table definitions.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The last segment of the prefix, used as the table base name.
    pub fn name(&self) -> &str {
        let prefix: &str = self.prefix.as_ref();
        prefix.rsplit(DELIMITER).next().unwrap_or_default()
    }
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.location)
    }
}

fn url_path(url: &Url) -> CommonResult<Path> {
    Path::from_url_path(url.path()).map_err(|e| CommonError::invalid(e.to_string()))
}
