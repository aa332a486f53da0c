use p2h_schema::error::SchemaError;
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("columns {} are in both the table columns and the partitioning columns; they should only be in one or another", .0.join(", "))]
    ColumnConflict(Vec<String>),
    #[error("incompatible versioning scheme: {0}")]
    VersioningScheme(#[from] VersioningSchemeError),
    #[error("missing _SUCCESS marker under {0}")]
    MissingSuccessMarker(String),
    #[error("no data files under {0}")]
    EmptyVersion(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

/// Why a directory under the dataset prefix is not a dataset version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersioningSchemeError {
    #[error("expected `<dataset>/<version>/`, found `{0}`")]
    Malformed(String),
    #[error("dataset `{0}` is nested within the prefix; load it directly instead")]
    NestedDataset(String),
    #[error("version must be an integer prefixed with a 'v', found `{0}`")]
    InvalidVersion(String),
}

impl CatalogError {
    /// Errors that only mean "skip this version".
    /// A data file that disappeared after listing counts as absent.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::VersioningScheme(_)
                | CatalogError::MissingSuccessMarker(_)
                | CatalogError::EmptyVersion(_)
                | CatalogError::Schema(SchemaError::ObjectStore(
                    object_store::Error::NotFound { .. }
                ))
        )
    }

    /// Errors that abort the whole dataset.
    pub fn is_fatal(&self) -> bool {
        match self {
            CatalogError::ObjectStore(_) => true,
            CatalogError::Schema(e) => e.is_transport() && !self.is_recoverable(),
            _ => false,
        }
    }
}
