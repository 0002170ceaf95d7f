use thiserror::Error;

/// Errors while loading configuration for the destination environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown environment '{0}' in config file")]
    UnknownEnvironment(String),
}

/// Errors during create-table/truncate/insert against the destination.
///
/// Fatal to the run; retries, if any, happen at whole-task granularity in
/// the surrounding scheduler.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("database error: {0}")]
    Db(#[from] postgres::Error),
    #[error("table '{table}' is missing required column(s): {columns:?}")]
    MissingColumns {
        table: String,
        columns: Vec<String>,
    },
}
