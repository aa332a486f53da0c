pub mod ddl;
pub mod error;
pub mod keys;
pub mod loader;
pub mod partition;
pub mod success;
mod utils;
pub mod version;

pub use ddl::{synthesize, table_name, TableDeclaration};
pub use loader::{DatasetLoader, LoadOptions, LoadReport, TableStatement, VersionFailure};
pub use version::{discover_versions, DatasetVersion};
