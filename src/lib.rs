//! # batchgrid: Sample Batch Editing Engine
//!
//! batchgrid is the presentation-free core of a spreadsheet-like editor for
//! batches of laboratory samples. It resolves free-text cells against the
//! experimental design, validates rows column by column, diffs an edited
//! batch against its persisted state, and checks tab-delimited metadata
//! uploads.
//!
//! ## Pipeline
//!
//! - **Resolve**: canonical condition strings, replicate labels and ontology
//!   terms become typed references ([`resolve`], [`canonical`])
//! - **Validate**: per-column rules yield cell verdicts that fold into a
//!   [`ValidationReport`] ([`validation`])
//! - **Diff**: edited rows against the original yield added, changed and
//!   removed sets ([`diff`])
//! - **Submit**: an [`EditSession`] checks removal eligibility and hands the
//!   diff to a [`source::CommandSink`]
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use batchgrid::experiment::{
//!     BiologicalReplicate, Condition, ExperimentId, ExperimentalGroup, ExperimentalValue,
//!     GroupId, ReplicateId, VariableLevel,
//! };
//! use batchgrid::grid::{Grid, GridCommand};
//! use batchgrid::validation::Column;
//! use batchgrid::BatchContext;
//!
//! let condition = Condition::new(vec![VariableLevel::new(
//!     "genotype",
//!     ExperimentalValue::new("wt"),
//! )])?;
//! let group = ExperimentalGroup::new(
//!     GroupId(1),
//!     condition,
//!     vec![BiologicalReplicate::new(ReplicateId(1), "R1")],
//! )?;
//! let context = BatchContext::new(ExperimentId::new("E1"), vec![Arc::new(group)]);
//!
//! let mut grid = Grid::new(context);
//! let outcome = grid.dispatch(GridCommand::SetCell {
//!     row: 0,
//!     column: Column::Condition,
//!     value: "genotype:wt".to_string(),
//! })?;
//! assert!(grid.rows()[0].record().experimental_group().is_some());
//! assert!(outcome
//!     .verdicts()
//!     .iter()
//!     .filter(|verdict| verdict.column() == Column::Condition)
//!     .all(|verdict| verdict.is_valid()));
//! # Ok::<(), batchgrid::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod canonical;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod experiment;
pub mod grid;
pub mod prefill;
pub mod resolve;
pub mod session;
pub mod source;
pub mod upload;
pub mod validation;

pub use config::EngineConfig;
pub use context::BatchContext;
pub use diff::{diff, Diff};
pub use error::{Error, Result};
pub use grid::{Grid, GridCommand, GridOutcome};
pub use resolve::{ReplicatePolicy, Resolution};
pub use session::{Confirmation, EditSession, Rejection};
pub use validation::{ValidationMode, ValidationReport};
