use thiserror::Error;

/// Errors raised while loading or checking the mapping registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error reading mappings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed mappings file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown dataset '{0}' in mappings file")]
    UnknownDataset(String),
    #[error("mappings file has no entry for dataset '{0}'")]
    MissingDataset(&'static str),
    #[error("dataset '{dataset}': select list is missing key column '{column}'")]
    KeyNotSelected {
        dataset: &'static str,
        column: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
