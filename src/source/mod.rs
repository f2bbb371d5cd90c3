//! Collaborator interfaces
//!
//! The engine never persists anything itself. Experimental groups, ontology
//! candidates, persisted rows, removal checks and command submission are
//! provided by the surrounding application through these traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use batchgrid::experiment::{BatchId, SampleId};
//! use batchgrid::source::{MemoryStore, PersistedRowSource, RemovalEligibilityCheck};
//!
//! # async fn example() -> batchgrid::Result<()> {
//! let store = MemoryStore::new();
//! store.block_removal(SampleId::new("s-1"));
//!
//! assert!(!store.is_removable(&SampleId::new("s-1")).await?);
//! assert!(store.existing_rows_for_batch(&BatchId::new("b-1")).await?.is_empty());
//! # Ok(())
//! # }
//! ```

mod memory;

pub use memory::{MemoryStore, StoreFixture};

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::context::BatchContext;
use crate::diff::Diff;
use crate::experiment::{
    BatchId, ExperimentId, ExperimentalGroup, OntologyAxis, OntologyTerm, RowRecord, SampleCode,
    SampleId,
};
use crate::Result;

/// Experimental groups of an experiment.
pub trait ExperimentalGroupSource: Send + Sync {
    /// Get the groups of an experiment in their defined order.
    ///
    /// Returns `Error::NotFound` for an unknown experiment.
    fn groups_for_experiment(
        &self,
        experiment_id: &ExperimentId,
    ) -> impl Future<Output = Result<Vec<Arc<ExperimentalGroup>>>> + Send;
}

/// Ontology terms offered for the species, specimen and analyte columns.
pub trait OntologyTermSource: Send + Sync {
    /// Get the candidates of one axis.
    fn candidates_for(
        &self,
        axis: OntologyAxis,
    ) -> impl Future<Output = Result<Vec<OntologyTerm>>> + Send;

    /// Look a term up by CURIE.
    fn find_by_curie(
        &self,
        curie: &str,
    ) -> impl Future<Output = Result<Option<OntologyTerm>>> + Send;
}

/// Rows of an already registered batch.
pub trait PersistedRowSource: Send + Sync {
    /// Get the persisted rows of a batch; every row carries a `sample_id`.
    fn existing_rows_for_batch(
        &self,
        batch_id: &BatchId,
    ) -> impl Future<Output = Result<Vec<RowRecord>>> + Send;
}

/// Whether a persisted sample may be deleted.
pub trait RemovalEligibilityCheck: Send + Sync {
    /// `false` when data (e.g. measurements) is attached to the sample.
    fn is_removable(&self, sample_id: &SampleId) -> impl Future<Output = Result<bool>> + Send;
}

/// Receiver of confirmed edits.
pub trait CommandSink: Send + Sync {
    /// Apply a diff to a batch.
    fn submit(&self, batch_id: &BatchId, diff: Diff) -> impl Future<Output = Result<()>> + Send;
}

/// Reference lookups for measurement metadata uploads.
pub trait MeasurementReferenceCheck: Send + Sync {
    /// Whether a sample with this code exists.
    fn sample_exists(&self, code: &SampleCode) -> impl Future<Output = Result<bool>> + Send;

    /// Whether an instrument with this CURIE exists.
    fn instrument_exists(&self, curie: &str) -> impl Future<Output = Result<bool>> + Send;
}

/// Load the reference data for editing batches of one experiment.
///
/// # Errors
///
/// Propagates errors of either source.
pub async fn load_context<G, T>(
    experiment_id: &ExperimentId,
    groups: &G,
    terms: &T,
) -> Result<BatchContext>
where
    G: ExperimentalGroupSource,
    T: OntologyTermSource,
{
    let mut context = BatchContext::new(
        experiment_id.clone(),
        groups.groups_for_experiment(experiment_id).await?,
    );
    for axis in OntologyAxis::ALL {
        context = context.with_terms(axis, terms.candidates_for(axis).await?);
    }
    debug!(
        experiment = %experiment_id,
        groups = context.groups().len(),
        "loaded batch context"
    );
    Ok(context)
}
