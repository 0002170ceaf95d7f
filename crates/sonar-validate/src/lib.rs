//! Validation stage: primary-key integrity and data-quality gates that run
//! strictly before any load.

pub mod error;
pub mod keys;
pub mod quality;

pub use error::{KeyViolationKind, ValidateError};
pub use keys::{check_duplicates, check_null_or_empty, check_unique_key, KeyCheck};
pub use quality::check_quality;
