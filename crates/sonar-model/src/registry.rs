//! The mapping registry: declarative per-dataset transform and load rules.
//!
//! Loaded once per run from a YAML file keyed by dataset name. Each entry
//! carries the rename table (dotted source path to output column), the select
//! list (final output shape), the destination DDL, data-quality rules, and
//! the raw fields the source collection must provide. Completeness against
//! the closed [`Dataset`] enum is checked at load time.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{RegistryError, Result};
use crate::Dataset;

/// Declared SQL shape of one output column, used by the data-quality pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Varchar,
    Float,
    Boolean,
    Timestamp,
}

/// One data-quality rule for an output column.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QualityRule {
    pub column: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    /// Exact required length for identifier columns (Mongo object ids are
    /// always 24 hex characters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Declarative rules for one dataset.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatasetSpec {
    /// Dotted source path -> output column name. A trailing `.$oid`/`.$date`
    /// segment signals a scalar unwrap during flattening.
    #[serde(default)]
    pub rename: BTreeMap<String, String>,
    /// Final output columns, in destination order.
    pub select: Vec<String>,
    /// Raw top-level fields the source collection must provide.
    #[serde(default)]
    pub required_fields: Vec<String>,
    /// `CREATE TABLE IF NOT EXISTS {schema}.<table> (...)` statement.
    pub ddl: String,
    #[serde(default)]
    pub quality: Vec<QualityRule>,
}

impl DatasetSpec {
    /// DDL with the `{schema}` placeholder resolved.
    pub fn ddl_for_schema(&self, schema: &str) -> String {
        self.ddl.replace("{schema}", schema)
    }
}

#[derive(Debug, serde::Deserialize)]
struct RegistryFile {
    datasets: BTreeMap<String, DatasetSpec>,
}

/// All dataset specs for one run. Read-only after construction.
#[derive(Debug, Clone)]
pub struct MappingRegistry {
    specs: BTreeMap<Dataset, DatasetSpec>,
}

impl MappingRegistry {
    /// Parse a mappings file and check it is complete and well-formed:
    /// every dataset of the closed enum has an entry, no unknown names, and
    /// every key column appears in its select list.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(text)?;
        let mut specs = BTreeMap::new();
        for (name, spec) in file.datasets {
            let dataset = Dataset::from_name(&name)
                .ok_or_else(|| RegistryError::UnknownDataset(name.clone()))?;
            specs.insert(dataset, spec);
        }
        for dataset in Dataset::LOAD_ORDER {
            let spec = specs
                .get(&dataset)
                .ok_or(RegistryError::MissingDataset(dataset.name()))?;
            for column in dataset.key_columns() {
                if !spec.select.iter().any(|c| c == column) {
                    return Err(RegistryError::KeyNotSelected {
                        dataset: dataset.name(),
                        column,
                    });
                }
            }
        }
        Ok(Self { specs })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Spec for a dataset. Completeness is enforced at construction, so
    /// lookups never fail.
    pub fn get(&self, dataset: Dataset) -> &DatasetSpec {
        &self.specs[&dataset]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dataset, &DatasetSpec)> {
        self.specs.iter().map(|(d, s)| (*d, s))
    }
}
