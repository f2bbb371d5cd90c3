//! Row Validator - evaluates column rules cell by cell

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::report::ValidationReport;
use super::rules::{Candidates, Column, ColumnRule, ColumnSpec};
use crate::context::BatchContext;
use crate::experiment::ExperimentalGroup;

/// Read access to one grid row as the validator needs it.
pub trait RowCells {
    /// Raw text of a cell; empty when unset.
    fn cell(&self, column: Column) -> &str;

    /// Experimental group selected in this row, if resolved.
    fn experimental_group(&self) -> Option<&ExperimentalGroup>;

    /// Whether the text of `column` resolved to exactly one domain object.
    /// Enumerated cells only pass when it did.
    fn is_resolved(&self, _column: Column) -> bool {
        true
    }

    /// Whether the row was added during a lazy phase and is not validated
    /// yet. Pending rows do not count towards distinctness.
    fn is_pending(&self) -> bool {
        false
    }
}

/// Verdict for one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every rule passed
    Valid,
    /// At least one rule failed; all failing rules are listed
    Invalid {
        /// Failure messages in rule order
        reasons: Vec<String>,
    },
}

impl Verdict {
    /// Whether the verdict is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Failure messages; empty when valid.
    #[must_use]
    pub fn reasons(&self) -> &[String] {
        match self {
            Self::Valid => &[],
            Self::Invalid { reasons } => reasons,
        }
    }
}

/// Verdict for the cell at (`row`, `column`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellVerdict {
    row: usize,
    column: Column,
    verdict: Verdict,
}

impl CellVerdict {
    /// Create a cell verdict.
    #[must_use]
    pub const fn new(row: usize, column: Column, verdict: Verdict) -> Self {
        Self {
            row,
            column,
            verdict,
        }
    }

    /// Get the row index.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Get the column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Get the verdict.
    #[must_use]
    pub const fn verdict(&self) -> &Verdict {
        &self.verdict
    }

    /// Whether the cell is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.verdict.is_valid()
    }
}

/// Fold cell verdicts into a report: each valid cell counts as one validated
/// entry, each failure reason becomes one failure.
#[must_use]
pub fn report_of(verdicts: &[CellVerdict]) -> ValidationReport {
    let mut report = ValidationReport::new();
    for cell in verdicts {
        match &cell.verdict {
            Verdict::Valid => report.add_passed(),
            Verdict::Invalid { reasons } => {
                for reason in reasons {
                    report.add_failure(reason.clone());
                }
            }
        }
    }
    report
}

/// Counts of non-blank values per distinct column, over non-pending rows.
#[derive(Debug, Default)]
struct DistinctIndex<'a> {
    counts: FxHashMap<Column, FxHashMap<&'a str, usize>>,
}

impl<'a> DistinctIndex<'a> {
    fn build<R: RowCells>(columns: &[ColumnSpec], rows: &'a [R]) -> Self {
        let mut counts: FxHashMap<Column, FxHashMap<&'a str, usize>> = FxHashMap::default();
        for spec in columns.iter().filter(|spec| spec.is_distinct()) {
            let per_value = counts.entry(spec.column()).or_default();
            for row in rows.iter().filter(|row| !row.is_pending()) {
                let value = row.cell(spec.column()).trim();
                if !value.is_empty() {
                    *per_value.entry(value).or_insert(0) += 1;
                }
            }
        }
        Self { counts }
    }

    fn occurrences(&self, column: Column, value: &str) -> usize {
        self.counts
            .get(&column)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }
}

/// Validates grid rows against a fixed set of column rules.
#[derive(Debug, Clone)]
pub struct RowValidator {
    columns: Vec<ColumnSpec>,
}

impl RowValidator {
    /// Create a validator for the given columns.
    #[must_use]
    pub const fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Validator for the sample batch grid of one experiment.
    #[must_use]
    pub fn sample_batch(context: &BatchContext) -> Self {
        Self::new(super::rules::sample_batch_columns(context))
    }

    /// Get the column specs.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Validate every cell of `rows[row]`. Distinctness is checked against
    /// all of `rows`.
    ///
    /// An out-of-range `row` yields no verdicts.
    #[must_use]
    pub fn validate<R: RowCells>(&self, row: usize, rows: &[R]) -> Vec<CellVerdict> {
        let index = DistinctIndex::build(&self.columns, rows);
        rows.get(row)
            .map(|cells| self.validate_with(row, cells, &index))
            .unwrap_or_default()
    }

    /// Validate every cell of every row.
    #[must_use]
    pub fn validate_all<R: RowCells>(&self, rows: &[R]) -> Vec<CellVerdict> {
        let index = DistinctIndex::build(&self.columns, rows);
        rows.iter()
            .enumerate()
            .flat_map(|(i, cells)| self.validate_with(i, cells, &index))
            .collect()
    }

    /// Validate every row and fold the result into one report.
    ///
    /// Rows are split into chunks of `chunk_size`; chunk reports are merged in
    /// row order.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn report<R: RowCells + Sync>(&self, rows: &[R], chunk_size: usize) -> ValidationReport {
        use rayon::prelude::*;

        let index = DistinctIndex::build(&self.columns, rows);
        let chunk_size = chunk_size.max(1);
        rows.par_chunks(chunk_size)
            .enumerate()
            .map(|(chunk, slice)| {
                let verdicts: Vec<CellVerdict> = slice
                    .iter()
                    .enumerate()
                    .flat_map(|(offset, cells)| {
                        self.validate_with(chunk * chunk_size + offset, cells, &index)
                    })
                    .collect();
                report_of(&verdicts)
            })
            .reduce(ValidationReport::new, ValidationReport::combine)
    }

    /// Validate every row and fold the result into one report.
    #[cfg(not(feature = "rayon"))]
    #[must_use]
    pub fn report<R: RowCells>(&self, rows: &[R], chunk_size: usize) -> ValidationReport {
        let index = DistinctIndex::build(&self.columns, rows);
        let chunk_size = chunk_size.max(1);
        rows.chunks(chunk_size)
            .enumerate()
            .map(|(chunk, slice)| {
                let verdicts: Vec<CellVerdict> = slice
                    .iter()
                    .enumerate()
                    .flat_map(|(offset, cells)| {
                        self.validate_with(chunk * chunk_size + offset, cells, &index)
                    })
                    .collect();
                report_of(&verdicts)
            })
            .sum()
    }

    fn validate_with<R: RowCells>(
        &self,
        row: usize,
        cells: &R,
        index: &DistinctIndex<'_>,
    ) -> Vec<CellVerdict> {
        let verdicts: Vec<CellVerdict> = self
            .columns
            .iter()
            .map(|spec| {
                let value = cells.cell(spec.column()).trim();
                let reasons: Vec<String> = spec
                    .rules()
                    .iter()
                    .filter(|rule| !Self::passes(rule, spec.column(), value, cells, index))
                    .map(|rule| rule.message(spec.column(), value))
                    .collect();
                let verdict = if reasons.is_empty() {
                    Verdict::Valid
                } else {
                    Verdict::Invalid { reasons }
                };
                CellVerdict::new(row, spec.column(), verdict)
            })
            .collect();
        debug!(
            row,
            invalid = verdicts.iter().filter(|v| !v.is_valid()).count(),
            "validated row"
        );
        verdicts
    }

    fn passes<R: RowCells>(
        rule: &ColumnRule,
        column: Column,
        value: &str,
        cells: &R,
        index: &DistinctIndex<'_>,
    ) -> bool {
        match rule {
            ColumnRule::Required => !value.is_empty(),
            ColumnRule::EnumeratedFrom(_) if value.is_empty() => true,
            ColumnRule::EnumeratedFrom(Candidates::Fixed(options)) => {
                options.iter().any(|option| option == value) && cells.is_resolved(column)
            }
            ColumnRule::EnumeratedFrom(Candidates::ReplicatesOfRowGroup) => cells
                .experimental_group()
                .is_some_and(|group| group.replicate_by_label(value).is_some()),
            ColumnRule::DistinctAcrossRows => {
                if value.is_empty() {
                    return true;
                }
                let own = usize::from(cells.is_pending());
                index.occurrences(column, value) + own < 2
            }
        }
    }
}
