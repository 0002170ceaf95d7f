//! The closed set of ETL datasets and their relational topology.

use std::fmt;

/// A destination dataset.
///
/// This is a closed enumeration rather than a free-form string so that a
/// typo or a missing mapping entry is caught when the registry loads, not
/// halfway through a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Clients,
    Suppliers,
    SonarRuns,
    SupplierGroup,
    SonarResults,
}

impl Dataset {
    /// All datasets in foreign-key dependency order: parents strictly before
    /// children (`supplier_group` references clients, `sonar_results`
    /// references suppliers and sonar_runs).
    pub const LOAD_ORDER: [Dataset; 5] = [
        Dataset::Clients,
        Dataset::Suppliers,
        Dataset::SonarRuns,
        Dataset::SupplierGroup,
        Dataset::SonarResults,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Suppliers => "suppliers",
            Self::SonarRuns => "sonar_runs",
            Self::SupplierGroup => "supplier_group",
            Self::SonarResults => "sonar_results",
        }
    }

    /// Primary key column(s) guarded before load. `supplier_group` carries a
    /// composite key; the others a single id column.
    pub fn key_columns(self) -> &'static [&'static str] {
        match self {
            Self::Clients => &["client_id"],
            Self::Suppliers => &["supplier_id"],
            Self::SonarRuns => &["sonar_run_id"],
            Self::SupplierGroup => &["supplier_id", "client_id", "group_name"],
            Self::SonarResults => &["sonar_result_id"],
        }
    }

    /// Datasets whose tables this dataset references by foreign key.
    ///
    /// Truncating a parent cascades into every transitive child, so a run
    /// that reloads a parent must also reload the children this topology
    /// reaches.
    pub fn fk_parents(self) -> &'static [Dataset] {
        match self {
            Self::Clients | Self::Suppliers => &[],
            Self::SonarRuns | Self::SupplierGroup => &[Dataset::Clients],
            Self::SonarResults => &[Dataset::Suppliers, Dataset::SonarRuns],
        }
    }

    /// Source collection holding this dataset's raw documents.
    /// `supplier_group` rows are exploded out of the clients collection.
    pub fn source_collection(self) -> &'static str {
        match self {
            Self::SupplierGroup => "clients",
            other => other.name(),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::LOAD_ORDER.into_iter().find(|d| d.name() == name)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
