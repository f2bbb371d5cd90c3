//! Row validation
//!
//! Column rules ([`rules`]), the cell-by-cell [`RowValidator`] and the
//! [`ValidationReport`] accumulator shared with the upload checks.
//!
//! ```rust
//! use batchgrid::validation::{Column, ColumnRule, ColumnSpec, RowValidator, ValidationReport};
//!
//! let validator = RowValidator::new(vec![ColumnSpec::new(
//!     Column::SampleLabel,
//!     vec![ColumnRule::Required],
//! )]);
//! assert_eq!(validator.columns().len(), 1);
//!
//! let report = ValidationReport::passed(2).combine(ValidationReport::warning("Empty row provided."));
//! assert!(report.is_valid());
//! ```

mod report;
pub mod rules;
mod validator;

pub use report::ValidationReport;
pub use rules::{sample_batch_columns, Candidates, Column, ColumnRule, ColumnSpec};
pub use validator::{report_of, CellVerdict, RowCells, RowValidator, Verdict};

/// When rows are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Every cell edit validates its row immediately
    #[default]
    Eager,
    /// Validation suspended during bulk population
    Lazy,
}
