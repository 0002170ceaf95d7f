//! Transform stage: flatten raw documents, apply renames, project onto the
//! select list.

pub mod error;
pub mod explode;
pub mod flatten;
pub mod mapper;
pub mod transform;

pub use error::TransformError;
pub use explode::explode_supplier_groups;
pub use flatten::{flatten_document, parse_timestamp, parse_timestamp_str};
pub use mapper::{apply_rename, project};
pub use transform::transform;
