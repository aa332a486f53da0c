pub mod location;
pub mod registry;

pub use location::DatasetLocation;
pub use registry::get_object_store;
