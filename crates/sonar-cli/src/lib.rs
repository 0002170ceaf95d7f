//! Library surface of the sonar ETL CLI: pipeline orchestration, logging
//! setup, and the run summary, kept callable from integration tests.

pub mod logging;
pub mod pipeline;
pub mod summary;

pub use pipeline::{run_pipeline, DatasetRun, RunOptions, RunSummary, StageError};
