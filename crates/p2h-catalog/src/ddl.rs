//! Hive DDL for an external Parquet table.
//!
//! Each table is (re)registered with three statements on one line:
//! `drop table if exists T; create external table T(...) ... location '...'; msck repair table T;`
//! The final `msck repair` makes Hive pick up partitions already present in storage.

use std::collections::HashSet;
use std::fmt;

use p2h_schema::ColumnDeclaration;

use crate::error::{CatalogError, CatalogResult};
use crate::version::DatasetVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDeclaration {
    name: String,
    columns: Vec<ColumnDeclaration>,
    partitions: Vec<String>,
    location: String,
}

impl TableDeclaration {
    /// Fails when a partition column shares its name with a data column.
    pub fn try_new(
        name: String,
        columns: Vec<ColumnDeclaration>,
        partitions: Vec<String>,
        location: String,
    ) -> CatalogResult<Self> {
        let partition_names = partitions
            .iter()
            .map(String::as_str)
            .collect::<HashSet<_>>();
        let conflicts = columns
            .iter()
            .filter(|column| partition_names.contains(column.name.as_str()))
            .map(|column| column.name.clone())
            .collect::<Vec<_>>();
        if !conflicts.is_empty() {
            return Err(CatalogError::ColumnConflict(conflicts));
        }
        Ok(Self {
            name,
            columns,
            partitions,
            location,
        })
    }
}

impl fmt::Display for TableDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let columns = self
            .columns
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "drop table if exists {name}; create external table {name}({columns})"
        )?;
        if !self.partitions.is_empty() {
            let partitions = self
                .partitions
                .iter()
                .map(|partition| format!("{partition} string"))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, " partitioned by ({partitions})")?;
        }
        write!(
            f,
            " stored as parquet location '{}'; msck repair table {name};",
            self.location
        )
    }
}

pub fn table_name(base_name: &str, version: &DatasetVersion, with_version: bool) -> String {
    if with_version {
        format!("{base_name}_{version}")
    } else {
        base_name.to_string()
    }
}

/// Builds the statements registering one dataset version as a table.
pub fn synthesize(
    columns: &[ColumnDeclaration],
    partitions: &[String],
    base_name: &str,
    version: &DatasetVersion,
    location: &str,
    with_version: bool,
) -> CatalogResult<String> {
    let table = TableDeclaration::try_new(
        table_name(base_name, version, with_version),
        columns.to_vec(),
        partitions.to_vec(),
        format!("{}/{version}", location.trim_end_matches('/')),
    )?;
    Ok(table.to_string())
}
