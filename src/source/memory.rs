//! In-memory collaborator store using `DashMap`.
//!
//! Backs tests, the CLI and demos. Data is lost when the store is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    CommandSink, ExperimentalGroupSource, MeasurementReferenceCheck, OntologyTermSource,
    PersistedRowSource, RemovalEligibilityCheck,
};
use crate::diff::Diff;
use crate::experiment::{
    BatchId, ExperimentId, ExperimentalGroup, OntologyAxis, OntologyTerm, RowRecord, SampleCode,
    SampleId,
};
use crate::{Error, Result};

/// Known sample codes and instrument CURIEs, as stored in a JSON fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFixture {
    /// Existing sample codes
    pub samples: Vec<String>,
    /// Known instrument CURIEs
    pub instruments: Vec<String>,
}

/// In-memory implementation of every collaborator trait.
///
/// Thread-safe; all methods take `&self`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: DashMap<ExperimentId, Vec<Arc<ExperimentalGroup>>>,
    terms: DashMap<OntologyAxis, Vec<OntologyTerm>>,
    batches: DashMap<BatchId, Vec<RowRecord>>,
    blocked_removals: DashSet<SampleId>,
    submissions: DashMap<BatchId, Vec<Diff>>,
    sample_codes: DashSet<SampleCode>,
    instruments: DashSet<String>,
    next_sample: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store knowing the samples and instruments of a fixture.
    #[must_use]
    pub fn from_fixture(fixture: &StoreFixture) -> Self {
        let store = Self::new();
        for code in &fixture.samples {
            store.add_sample_code(SampleCode::new(code.clone()));
        }
        for curie in &fixture.instruments {
            store.add_instrument(curie.clone());
        }
        store
    }

    /// Register the groups of an experiment.
    pub fn insert_groups(&self, experiment_id: ExperimentId, groups: Vec<Arc<ExperimentalGroup>>) {
        self.groups.insert(experiment_id, groups);
    }

    /// Register the candidates of an ontology axis.
    pub fn insert_terms(&self, axis: OntologyAxis, terms: Vec<OntologyTerm>) {
        self.terms.insert(axis, terms);
    }

    /// Store the persisted rows of a batch.
    pub fn insert_batch(&self, batch_id: BatchId, rows: Vec<RowRecord>) {
        self.batches.insert(batch_id, rows);
    }

    /// Mark a sample as having data attached.
    pub fn block_removal(&self, sample_id: SampleId) {
        self.blocked_removals.insert(sample_id);
    }

    /// Register an existing sample code.
    pub fn add_sample_code(&self, code: SampleCode) {
        self.sample_codes.insert(code);
    }

    /// Register a known instrument CURIE.
    pub fn add_instrument(&self, curie: impl Into<String>) {
        self.instruments.insert(curie.into());
    }

    /// Diffs submitted for a batch, oldest first.
    #[must_use]
    pub fn submissions(&self, batch_id: &BatchId) -> Vec<Diff> {
        self.submissions
            .get(batch_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    fn assign_id(&self) -> SampleId {
        let n = self.next_sample.fetch_add(1, Ordering::Relaxed) + 1;
        SampleId::new(format!("sample-{n}"))
    }

    fn apply(&self, batch_id: &BatchId, diff: &Diff) {
        let mut rows = self.batches.entry(batch_id.clone()).or_default();
        rows.retain(|row| {
            row.sample_id()
                .is_some_and(|id| !diff.removed().contains(id))
        });
        for changed in diff.changed() {
            if let Some(slot) = rows
                .iter_mut()
                .find(|row| row.sample_id() == changed.sample_id())
            {
                *slot = changed.clone();
            }
        }
        for added in diff.added() {
            let mut builder = RowRecord::builder().sample_id(self.assign_id());
            if let Some(method) = added.analysis_method() {
                builder = builder.analysis_method(method);
            }
            if let Some(name) = added.sample_name() {
                builder = builder.sample_name(name);
            }
            if let Some(replicate) = added.biological_replicate() {
                builder = builder.biological_replicate(replicate.clone());
            }
            if let Some(group) = added.experimental_group() {
                builder = builder.experimental_group(Arc::clone(group));
            }
            if let Some(term) = added.species() {
                builder = builder.species(term.clone());
            }
            if let Some(term) = added.specimen() {
                builder = builder.specimen(term.clone());
            }
            if let Some(term) = added.analyte() {
                builder = builder.analyte(term.clone());
            }
            if let Some(comment) = added.comment() {
                builder = builder.comment(comment);
            }
            rows.push(builder.build());
        }
    }
}

impl ExperimentalGroupSource for MemoryStore {
    async fn groups_for_experiment(
        &self,
        experiment_id: &ExperimentId,
    ) -> Result<Vec<Arc<ExperimentalGroup>>> {
        self.groups
            .get(experiment_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::NotFound(format!("experiment {experiment_id}")))
    }
}

impl OntologyTermSource for MemoryStore {
    async fn candidates_for(&self, axis: OntologyAxis) -> Result<Vec<OntologyTerm>> {
        Ok(self
            .terms
            .get(&axis)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn find_by_curie(&self, curie: &str) -> Result<Option<OntologyTerm>> {
        Ok(self.terms.iter().find_map(|entry| {
            entry
                .value()
                .iter()
                .find(|term| term.curie() == Some(curie))
                .cloned()
        }))
    }
}

impl PersistedRowSource for MemoryStore {
    async fn existing_rows_for_batch(&self, batch_id: &BatchId) -> Result<Vec<RowRecord>> {
        Ok(self
            .batches
            .get(batch_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

impl RemovalEligibilityCheck for MemoryStore {
    async fn is_removable(&self, sample_id: &SampleId) -> Result<bool> {
        Ok(!self.blocked_removals.contains(sample_id))
    }
}

impl CommandSink for MemoryStore {
    async fn submit(&self, batch_id: &BatchId, diff: Diff) -> Result<()> {
        info!(
            batch = %batch_id,
            added = diff.added().len(),
            changed = diff.changed().len(),
            removed = diff.removed().len(),
            "applying batch diff"
        );
        self.apply(batch_id, &diff);
        self.submissions
            .entry(batch_id.clone())
            .or_default()
            .push(diff);
        Ok(())
    }
}

impl MeasurementReferenceCheck for MemoryStore {
    async fn sample_exists(&self, code: &SampleCode) -> Result<bool> {
        Ok(self.sample_codes.contains(code))
    }

    async fn instrument_exists(&self, curie: &str) -> Result<bool> {
        Ok(self.instruments.contains(curie))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{
        BiologicalReplicate, Condition, ExperimentalValue, GroupId, ReplicateId, VariableLevel,
    };
    use crate::source::load_context;

    fn group() -> Arc<ExperimentalGroup> {
        let condition = Condition::new(vec![VariableLevel::new(
            "genotype",
            ExperimentalValue::new("wt"),
        )])
        .unwrap();
        Arc::new(
            ExperimentalGroup::new(
                GroupId(1),
                condition,
                vec![BiologicalReplicate::new(ReplicateId(1), "R1")],
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_groups_for_unknown_experiment() {
        let store = MemoryStore::new();
        let result = store
            .groups_for_experiment(&ExperimentId::new("missing"))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_context() {
        let store = MemoryStore::new();
        let experiment = ExperimentId::new("E1");
        store.insert_groups(experiment.clone(), vec![group()]);
        store.insert_terms(
            OntologyAxis::Species,
            vec![OntologyTerm::new("Homo sapiens", "NCBITaxon:9606")],
        );

        let context = load_context(&experiment, &store, &store).await.unwrap();
        assert_eq!(context.groups().len(), 1);
        assert_eq!(context.terms(OntologyAxis::Species).len(), 1);
        assert!(context.terms(OntologyAxis::Analyte).is_empty());
    }

    #[tokio::test]
    async fn test_find_by_curie() {
        let store = MemoryStore::new();
        store.insert_terms(
            OntologyAxis::Analyte,
            vec![OntologyTerm::new("RNA", "CHEBI:33697")],
        );
        let found = store.find_by_curie("CHEBI:33697").await.unwrap();
        assert_eq!(found.map(|t| t.label().to_string()), Some("RNA".to_string()));
        assert!(store.find_by_curie("CHEBI:0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_applies_diff() {
        let store = MemoryStore::new();
        let batch = BatchId::new("b1");
        let kept = RowRecord::builder()
            .sample_id(SampleId::new("s1"))
            .sample_name("kept")
            .build();
        let dropped = RowRecord::builder()
            .sample_id(SampleId::new("s2"))
            .sample_name("dropped")
            .build();
        store.insert_batch(batch.clone(), vec![kept.clone(), dropped.clone()]);

        let edited = vec![kept, RowRecord::builder().sample_name("new").build()];
        let original = store.existing_rows_for_batch(&batch).await.unwrap();
        let diff = crate::diff::diff(&original, &edited);
        store.submit(&batch, diff).await.unwrap();

        let rows = store.existing_rows_for_batch(&batch).await.unwrap();
        let names: Vec<&str> = rows.iter().filter_map(RowRecord::sample_name).collect();
        assert_eq!(names, vec!["kept", "new"]);
        assert!(rows.iter().all(RowRecord::is_persisted));
        assert_eq!(store.submissions(&batch).len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_reference_checks() {
        let store = Arc::new(MemoryStore::from_fixture(&StoreFixture {
            samples: (0..50).map(|i| format!("QTEST{i:03}")).collect(),
            instruments: vec!["EFO:0008637".to_string()],
        }));
        let mut handles = vec![];
        for i in 0..50 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .sample_exists(&SampleCode::new(format!("QTEST{i:03}")))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }
        assert!(store.instrument_exists("EFO:0008637").await.unwrap());
        assert!(!store.instrument_exists("EFO:0000000").await.unwrap());
    }
}
