//! Shared data model for the sonar ETL pipeline.

pub mod dataset;
pub mod error;
pub mod registry;
pub mod table;
pub mod value;

pub use dataset::Dataset;
pub use error::RegistryError;
pub use registry::{ColumnKind, DatasetSpec, MappingRegistry, QualityRule};
pub use table::{Record, Table};
pub use value::Value;
