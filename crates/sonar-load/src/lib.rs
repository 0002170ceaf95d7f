//! Load stage: destination configuration and full-refresh writes.

pub mod config;
pub mod error;
pub mod loader;

pub use config::{Environment, EtlConfig, PgConfig};
pub use error::{ConfigError, LoadError};
pub use loader::{create_schema_sql, insert_sql, truncate_sql, Loader, PgValue};
