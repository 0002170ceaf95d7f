//! Source-document ingestion for the sonar ETL.

pub mod error;
pub mod source;

pub use error::SourceError;
pub use source::{check_required_fields, read_documents};
