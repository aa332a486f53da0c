use std::sync::Arc;

use futures::TryStreamExt;
use log::{debug, error, info, warn};
use object_store::path::Path;
use object_store::{ObjectMeta, ObjectStore};
use p2h_object_store::DatasetLocation;
use p2h_schema::{read_schema, translate_schema, ColumnDeclaration, SchemaDocument};

use crate::ddl::{synthesize, table_name};
use crate::error::{CatalogError, CatalogResult};
use crate::keys::ignore_object;
use crate::partition::partition_fields;
use crate::success::SuccessMarkerProbe;
use crate::version::{discover_versions, DatasetVersion};

pub const DEFAULT_SUCCESS_MARKER_CACHE_SIZE: u64 = 64;

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Only accept data files whose directory holds a `_SUCCESS` marker.
    pub success_only: bool,
    /// Stop after this many versions have been registered.
    pub recent_versions: Option<usize>,
    /// Only consider the version with this exact name, e.g. `v2`.
    pub version: Option<String>,
    pub success_marker_cache_size: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            success_only: false,
            recent_versions: None,
            version: None,
            success_marker_cache_size: DEFAULT_SUCCESS_MARKER_CACHE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatement {
    pub table: String,
    pub version: DatasetVersion,
    pub sql: String,
}

#[derive(Debug)]
pub struct VersionFailure {
    pub version: DatasetVersion,
    pub error: CatalogError,
}

#[derive(Debug)]
pub struct LoadReport {
    pub dataset: String,
    /// Statements in the order they should run.
    pub tables: Vec<TableStatement>,
    pub failures: Vec<VersionFailure>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.sql.as_str())
    }
}

/// Registers the versions of one dataset, most recent first.
///
/// Every loaded version gets a `<name>_<version>` table. The first version loaded
/// also gets a `<name>` table so the latest data can be queried by a stable name.
pub struct DatasetLoader {
    store: Arc<dyn ObjectStore>,
    location: DatasetLocation,
    options: LoadOptions,
    probe: SuccessMarkerProbe,
}

impl DatasetLoader {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        location: DatasetLocation,
        options: LoadOptions,
    ) -> Self {
        let probe = SuccessMarkerProbe::new(Arc::clone(&store), options.success_marker_cache_size);
        Self {
            store,
            location,
            options,
            probe,
        }
    }

    pub async fn load(&self) -> CatalogResult<LoadReport> {
        let mut versions = discover_versions(self.store.as_ref(), self.location.prefix()).await?;
        if let Some(wanted) = &self.options.version {
            versions.retain(|version| version.name() == wanted);
            if versions.is_empty() {
                warn!(
                    "No schemas available with version {wanted} for {}",
                    self.location
                );
            }
        }
        debug!("Found {} version(s) of {}", versions.len(), self.location);

        let mut report = LoadReport {
            dataset: self.location.to_string(),
            tables: vec![],
            failures: vec![],
        };
        let mut loaded = 0;
        for version in versions {
            if self.options.recent_versions.is_some_and(|limit| loaded >= limit) {
                break;
            }
            match self.load_version(&version, loaded == 0).await {
                Ok(tables) => {
                    report.tables.extend(tables);
                    loaded += 1;
                }
                Err(e) if e.is_recoverable() => {
                    warn!("Ignoring {} {version}: {e}", self.location.name());
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("Failed to load {} {version}: {e}", self.location.name());
                    report.failures.push(VersionFailure { version, error: e });
                }
            }
        }
        Ok(report)
    }

    async fn load_version(
        &self,
        version: &DatasetVersion,
        current: bool,
    ) -> CatalogResult<Vec<TableStatement>> {
        let name = self.location.name();
        let object = self.select_schema_object(version).await?;
        info!("Analyzing dataset {name}, {version}");

        let value = read_schema(self.store.as_ref(), &object).await?;
        let columns = translate_schema(&SchemaDocument::parse(&value)?)?;
        let key: &str = object.location.as_ref();
        let prefix: &str = self.location.prefix().as_ref();
        let relative = key.strip_prefix(prefix).unwrap_or(key);
        let partitions = partition_fields(relative);
        debug!("Using schema of {key} with partitions {partitions:?}");

        let mut tables = vec![self.statement(&columns, &partitions, version, true)?];
        if current {
            tables.push(self.statement(&columns, &partitions, version, false)?);
        }
        Ok(tables)
    }

    /// Picks the most recently modified data file of the version.
    async fn select_schema_object(&self, version: &DatasetVersion) -> CatalogResult<ObjectMeta> {
        let prefix = self.location.prefix().child(version.name());
        let mut objects = self
            .store
            .list(Some(&prefix))
            .try_collect::<Vec<_>>()
            .await?;
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        for object in objects {
            if ignore_object(&object) {
                continue;
            }
            if self.options.success_only
                && !self.probe.exists(&parent(&object.location)).await?
            {
                continue;
            }
            return Ok(object);
        }
        if self.options.success_only {
            Err(CatalogError::MissingSuccessMarker(prefix.to_string()))
        } else {
            Err(CatalogError::EmptyVersion(prefix.to_string()))
        }
    }

    fn statement(
        &self,
        columns: &[ColumnDeclaration],
        partitions: &[String],
        version: &DatasetVersion,
        with_version: bool,
    ) -> CatalogResult<TableStatement> {
        let base_name = self.location.name();
        let sql = synthesize(
            columns,
            partitions,
            base_name,
            version,
            self.location.location(),
            with_version,
        )?;
        Ok(TableStatement {
            table: table_name(base_name, version, with_version),
            version: version.clone(),
            sql,
        })
    }
}

fn parent(location: &Path) -> Path {
    let mut parts = location.parts().collect::<Vec<_>>();
    parts.pop();
    parts.into_iter().collect()
}
