use super::{ProjectDescriptor, ReferenceRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Every reference seen during a run, keyed by bare name.
///
/// Iteration is ordered by bare name. Only the resolver writes to the
/// table; once analysis is done it is read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceTable {
    records: BTreeMap<String, ReferenceRecord>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceRecord> {
        self.records.get(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceRecord> {
        self.records.values()
    }

    pub(crate) fn insert(&mut self, record: ReferenceRecord) {
        self.records.insert(record.name.clone(), record);
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ReferenceRecord> {
        self.records.get_mut(name)
    }
}

/// Project × reference incidence table.
///
/// Each row is indexed by project position in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMatrix {
    project_count: usize,
    uses: BTreeMap<String, Vec<bool>>,
}

impl UsageMatrix {
    pub fn build(projects: &[ProjectDescriptor], references: &ReferenceTable) -> Self {
        let project_count = projects.len();
        let mut uses: BTreeMap<String, Vec<bool>> = references
            .iter()
            .map(|record| (record.name.clone(), vec![false; project_count]))
            .collect();

        for (index, project) in projects.iter().enumerate() {
            for name in &project.references {
                match uses.get_mut(name) {
                    Some(row) => row[index] = true,
                    None => tracing::warn!(
                        reference = %name,
                        project = %project.name,
                        "reference missing from reference table"
                    ),
                }
            }
        }

        uses.retain(|_, row| row.iter().any(|used| *used));

        Self {
            project_count,
            uses,
        }
    }

    pub fn project_count(&self) -> usize {
        self.project_count
    }

    pub fn len(&self) -> usize {
        self.uses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    pub fn uses(&self, name: &str) -> Option<&[bool]> {
        self.uses.get(name).map(Vec::as_slice)
    }

    /// Rows ordered by bare name.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[bool])> {
        self.uses
            .iter()
            .map(|(name, row)| (name.as_str(), row.as_slice()))
    }
}

/// Complete result of analysing a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub root: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub projects: Vec<ProjectDescriptor>,
    pub references: ReferenceTable,
    pub matrix: UsageMatrix,
}

impl Analysis {
    pub fn new(root: PathBuf, projects: Vec<ProjectDescriptor>, references: ReferenceTable) -> Self {
        let matrix = UsageMatrix::build(&projects, &references);
        Self {
            root,
            generated_at: Utc::now(),
            projects,
            references,
            matrix,
        }
    }

    /// Reference rows for the report, sorted by bare name.
    pub fn reference_rows(&self) -> impl Iterator<Item = (&ReferenceRecord, &[bool])> {
        self.matrix
            .rows()
            .filter_map(|(name, row)| self.references.get(name).map(|record| (record, row)))
    }
}
