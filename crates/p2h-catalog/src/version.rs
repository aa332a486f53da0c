use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::warn;
use object_store::path::Path;
use object_store::ObjectStore;
use regex::Regex;

use crate::error::{CatalogResult, VersioningSchemeError};
use crate::utils::create_regex;

lazy_static! {
    static ref VERSION_SEGMENT: Regex = create_regex(Regex::new(r"^v([0-9]+)$"));
}

/// A dataset version directory such as `v3`.
///
/// Versions order by their number. The directory name is kept as written
/// since it is part of the storage location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetVersion {
    number: u64,
    name: String,
}

impl DatasetVersion {
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for DatasetVersion {
    type Err = VersioningSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = VERSION_SEGMENT
            .captures(s)
            .and_then(|captures| captures.get(1))
            .and_then(|number| number.as_str().parse().ok())
            .ok_or_else(|| VersioningSchemeError::InvalidVersion(s.to_string()))?;
        Ok(Self {
            number,
            name: s.to_string(),
        })
    }
}

impl Ord for DatasetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.number
            .cmp(&other.number)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for DatasetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DatasetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validates one listed directory under the dataset prefix.
///
/// The directory must be exactly `<dataset prefix>/v<N>`.
pub fn parse_version_prefix(
    dataset_prefix: &str,
    candidate: &str,
) -> Result<DatasetVersion, VersioningSchemeError> {
    let segments = candidate
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>();
    let [parents @ .., version] = segments.as_slice() else {
        return Err(VersioningSchemeError::Malformed(candidate.to_string()));
    };
    if parents.is_empty() {
        return Err(VersioningSchemeError::Malformed(candidate.to_string()));
    }
    let parent = parents.join("/");
    if parent != dataset_prefix.trim_matches('/') {
        return Err(VersioningSchemeError::NestedDataset(parent));
    }
    version.parse()
}

/// Keeps the valid versions, most recent first, and warns about the rest.
pub fn collect_versions<'a>(
    dataset_prefix: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<DatasetVersion> {
    let mut versions = vec![];
    for candidate in candidates {
        match parse_version_prefix(dataset_prefix, candidate) {
            Ok(version) => versions.push(version),
            Err(e) => warn!("Ignoring {candidate}: {e}"),
        }
    }
    versions.sort_by(|a, b| b.cmp(a));
    versions
}

/// Lists the version directories directly under the dataset prefix.
pub async fn discover_versions(
    store: &dyn ObjectStore,
    dataset_prefix: &Path,
) -> CatalogResult<Vec<DatasetVersion>> {
    let listing = store.list_with_delimiter(Some(dataset_prefix)).await?;
    Ok(collect_versions(
        dataset_prefix.as_ref(),
        listing.common_prefixes.iter().map(AsRef::<str>::as_ref),
    ))
}
