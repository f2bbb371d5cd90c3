//! Sample domain model
//!
//! Value objects the batch engine works on. They are supplied by the
//! project-management domain and never persisted by this crate.
//!
//! ## Model Overview
//!
//! ```text
//! ExperimentalGroup (1) ──< BiologicalReplicate (N)
//!        │
//!        └── Condition ──< VariableLevel (N, one per variable)
//!
//! RowRecord ──> ExperimentalGroup, BiologicalReplicate, OntologyTerm x3
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use batchgrid::experiment::{
//!     AnalysisMethod, BiologicalReplicate, Condition, ExperimentalGroup, ExperimentalValue,
//!     GroupId, ReplicateId, RowRecord, VariableLevel,
//! };
//!
//! let condition = Condition::new(vec![VariableLevel::new(
//!     "genotype",
//!     ExperimentalValue::new("wildtype"),
//! )])?;
//! let group = Arc::new(ExperimentalGroup::new(
//!     GroupId(1),
//!     condition,
//!     vec![BiologicalReplicate::new(ReplicateId(1), "R1")],
//! )?);
//!
//! let row = RowRecord::builder()
//!     .sample_name("leaf-1")
//!     .analysis_method(AnalysisMethod::RnaSeq)
//!     .experimental_group(Arc::clone(&group))
//!     .biological_replicate(group.biological_replicates()[0].clone())
//!     .build();
//! assert!(!row.is_persisted());
//! # Ok::<(), batchgrid::Error>(())
//! ```

mod analysis_method;
mod condition;
mod group;
mod ids;
mod ontology;
mod sample_record;

pub use analysis_method::AnalysisMethod;
pub use condition::{Condition, ExperimentalValue, VariableLevel};
pub use group::{BiologicalReplicate, ExperimentalGroup, ExperimentalGroupBuilder, GroupId, ReplicateId};
pub use ids::{BatchId, ExperimentId, SampleCode, SampleId};
pub use ontology::{extract_curie, OntologyAxis, OntologyTerm};
pub use sample_record::{RowRecord, RowRecordBuilder};
