//! The per-dataset run: extract → transform → validate → load.
//!
//! Datasets are processed strictly in `Dataset::LOAD_ORDER` so parent
//! tables exist before children reference them. A failure in any stage
//! aborts that dataset's run (no partial load); the whole-dataset retry
//! loop here mirrors the surrounding scheduler's task-level retry policy,
//! which the full-truncate-then-insert design makes safe to re-run.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{error, info, info_span, warn};

use sonar_ingest::{check_required_fields, read_documents, SourceError};
use sonar_load::{LoadError, Loader};
use sonar_model::{Dataset, MappingRegistry, Table};
use sonar_transform::{transform, TransformError};
use sonar_validate::{
    check_duplicates, check_null_or_empty, check_quality, check_unique_key, ValidateError,
};

/// A failure in one stage of one dataset's run. Variants stay
/// distinguishable so callers can tell a key violation from a schema
/// mismatch from a database failure.
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Validate(#[from] ValidateError),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Options for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Datasets to process, already filtered; iteration respects load order.
    pub datasets: Vec<Dataset>,
    /// Directory with one `<collection>.json` file per source collection.
    pub input_dir: PathBuf,
    /// Attempts per dataset beyond the first.
    pub retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Abort the run after the first failed dataset. Set for live runs:
    /// loading a child against a failed parent's stale rows would leave the
    /// destination cross-run inconsistent. Dry runs keep going so one pass
    /// reports every dataset's problems.
    pub halt_on_failure: bool,
}

/// Outcome of one dataset's run (its final attempt).
#[derive(Debug)]
pub struct DatasetRun {
    pub dataset: Dataset,
    /// Rows in the transformed table, when transform succeeded.
    pub rows: Option<usize>,
    /// Rows inserted; `None` on dry runs and failures.
    pub loaded: Option<u64>,
    pub attempts: u32,
    pub error: Option<StageError>,
    pub elapsed: Duration,
}

impl DatasetRun {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of the whole run.
#[derive(Debug)]
pub struct RunSummary {
    pub runs: Vec<DatasetRun>,
}

impl RunSummary {
    pub fn has_errors(&self) -> bool {
        self.runs.iter().any(|r| !r.succeeded())
    }
}

/// Process every selected dataset in load order. `loader` is `None` on dry
/// runs. With `halt_on_failure` set, the first failed dataset aborts the
/// remainder of the run; children re-inserted against a parent's previous
/// contents would silently go stale.
pub fn run_pipeline(
    registry: &MappingRegistry,
    options: &RunOptions,
    mut loader: Option<&mut Loader>,
) -> RunSummary {
    let mut runs = Vec::new();
    for dataset in Dataset::LOAD_ORDER {
        if !options.datasets.contains(&dataset) {
            continue;
        }
        let span = info_span!("dataset", name = %dataset);
        let _guard = span.enter();
        let run = run_dataset_with_retry(dataset, registry, options, loader.as_deref_mut());
        let failed = !run.succeeded();
        runs.push(run);
        if failed && options.halt_on_failure {
            error!("aborting run, remaining datasets skipped");
            break;
        }
    }
    RunSummary { runs }
}

fn run_dataset_with_retry(
    dataset: Dataset,
    registry: &MappingRegistry,
    options: &RunOptions,
    mut loader: Option<&mut Loader>,
) -> DatasetRun {
    let started = Instant::now();
    let max_attempts = options.retries.saturating_add(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match run_dataset(dataset, registry, &options.input_dir, loader.as_deref_mut()) {
            Ok((rows, loaded)) => {
                info!(rows, attempt, "dataset run complete");
                return DatasetRun {
                    dataset,
                    rows: Some(rows),
                    loaded,
                    attempts: attempt,
                    error: None,
                    elapsed: started.elapsed(),
                };
            }
            Err(err) if attempt < max_attempts => {
                warn!(attempt, error = %err, "dataset run failed, retrying after delay");
                std::thread::sleep(options.retry_delay);
            }
            Err(err) => {
                error!(attempt, error = %err, "dataset run failed");
                return DatasetRun {
                    dataset,
                    rows: None,
                    loaded: None,
                    attempts: attempt,
                    error: Some(err),
                    elapsed: started.elapsed(),
                };
            }
        }
    }
}

/// One attempt: the full stage sequence for one dataset.
fn run_dataset(
    dataset: Dataset,
    registry: &MappingRegistry,
    input_dir: &Path,
    loader: Option<&mut Loader>,
) -> Result<(usize, Option<u64>), StageError> {
    let spec = registry.get(dataset);

    let path = input_dir.join(format!("{}.json", dataset.source_collection()));
    let docs = read_documents(&path)?;
    check_required_fields(&docs, &spec.required_fields)?;

    let table = transform(dataset, &docs, registry)?;

    validate_keys(&table)?;
    check_quality(&table, &spec.quality)?;

    let loaded = match loader {
        Some(loader) => Some(loader.load_table(&table, spec)?),
        None => {
            info!(rows = table.len(), "dry run, skipping load");
            None
        }
    };
    Ok((table.len(), loaded))
}

/// The primary-key gate: every key part non-null and non-empty, the key
/// itself unique (single column or composite tuple).
fn validate_keys(table: &Table) -> Result<(), ValidateError> {
    let key_columns = table.dataset.key_columns();
    for column in key_columns {
        check_null_or_empty(table, column)?;
    }
    match key_columns {
        [single] => {
            check_duplicates(table, single)?;
        }
        composite => {
            check_unique_key(table, composite)?;
        }
    }
    Ok(())
}
