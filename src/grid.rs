//! Grid - the presentation-free sample batch editing surface
//!
//! A grid owns its rows: the raw text of every cell plus the [`RowRecord`]
//! resolved from that text. All interaction goes through [`Grid::dispatch`]
//! with a [`GridCommand`], so a UI layer only translates its events.
//!
//! ```rust
//! use batchgrid::context::BatchContext;
//! use batchgrid::experiment::ExperimentId;
//! use batchgrid::grid::{Grid, GridCommand};
//! use batchgrid::validation::Column;
//!
//! let context = BatchContext::new(ExperimentId::new("E1"), Vec::new());
//! let mut grid = Grid::new(context);
//! assert_eq!(grid.len(), 2);
//!
//! let outcome = grid.dispatch(GridCommand::SetCell {
//!     row: 0,
//!     column: Column::SampleLabel,
//!     value: "leaf-1".to_string(),
//! })?;
//! assert!(!outcome.is_valid()); // the other required cells are still empty
//! # Ok::<(), batchgrid::Error>(())
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::canonical;
use crate::config::EngineConfig;
use crate::context::BatchContext;
use crate::experiment::{ExperimentalGroup, RowRecord};
use crate::prefill;
use crate::resolve::{self, ReplicatePolicy};
use crate::validation::{
    report_of, CellVerdict, Column, RowCells, RowValidator, ValidationMode, ValidationReport,
};
use crate::{Error, Result};

/// One row of the grid.
#[derive(Debug, Clone, Default)]
pub struct GridRow {
    record: RowRecord,
    cells: [String; Column::COUNT],
    pending: bool,
    verdicts: Vec<CellVerdict>,
}

impl GridRow {
    fn empty(pending: bool) -> Self {
        Self {
            pending,
            ..Self::default()
        }
    }

    fn from_record(context: &BatchContext, record: RowRecord, pending: bool) -> Self {
        let mut row = Self::empty(pending);
        for column in Column::ALL {
            row.cells[column.index()] = render(context, &record, column);
        }
        row.record = record;
        row
    }

    /// Get the resolved record.
    #[must_use]
    pub const fn record(&self) -> &RowRecord {
        &self.record
    }

    /// Get the latest verdicts of this row; empty until validated.
    #[must_use]
    pub fn verdicts(&self) -> &[CellVerdict] {
        &self.verdicts
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.trim().is_empty())
    }
}

impl RowCells for GridRow {
    fn cell(&self, column: Column) -> &str {
        &self.cells[column.index()]
    }

    fn experimental_group(&self) -> Option<&ExperimentalGroup> {
        self.record.experimental_group().map(Arc::as_ref)
    }

    fn is_resolved(&self, column: Column) -> bool {
        match column {
            Column::AnalysisMethod => self.record.analysis_method().is_some(),
            Column::Condition => self.record.experimental_group().is_some(),
            Column::BiologicalReplicate => self.record.biological_replicate().is_some(),
            Column::Species | Column::Specimen | Column::Analyte => column
                .ontology_axis()
                .is_some_and(|axis| self.record.term(axis).is_some()),
            Column::SampleLabel | Column::Comment => true,
        }
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Render the cell text of a record.
fn render(context: &BatchContext, record: &RowRecord, column: Column) -> String {
    let text = match column {
        Column::AnalysisMethod => record.analysis_method().map(|m| m.label().to_string()),
        Column::SampleLabel => record.sample_name().map(str::to_string),
        Column::Condition => record
            .experimental_group()
            .map(|group| canonical::format(group.condition())),
        Column::BiologicalReplicate => record
            .biological_replicate()
            .map(|replicate| replicate.label().to_string()),
        Column::Species | Column::Specimen | Column::Analyte => column
            .ontology_axis()
            .and_then(|axis| record.term(axis).map(|term| context.term_text(axis, term))),
        Column::Comment => record.comment().map(str::to_string),
    };
    text.unwrap_or_default()
}

/// A user or program action on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCommand {
    /// Append one empty row
    AddEmptyRow,
    /// Remove the last row, if any
    RemoveLastRow,
    /// Replace the text of one cell
    SetCell {
        /// Row index
        row: usize,
        /// Column edited
        column: Column,
        /// New raw text
        value: String,
    },
    /// Replace all rows with rows rendered from records
    LoadRows(Vec<RowRecord>),
    /// Replace all rows with the full-factorial prefill
    Prefill,
    /// Drop all rows and start over with the initial empty rows
    Reset,
    /// Switch validation mode; switching to eager validates every row
    SetMode(ValidationMode),
    /// Validate every row now
    ValidateAll,
}

/// Verdicts produced while handling one command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridOutcome {
    verdicts: Vec<CellVerdict>,
}

impl GridOutcome {
    /// Get the verdicts; empty when nothing was validated.
    #[must_use]
    pub fn verdicts(&self) -> &[CellVerdict] {
        &self.verdicts
    }

    /// Whether every produced verdict is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.verdicts.iter().all(CellVerdict::is_valid)
    }

    /// Fold the verdicts into a report.
    #[must_use]
    pub fn report(&self) -> ValidationReport {
        report_of(&self.verdicts)
    }
}

/// The sample batch grid.
#[derive(Debug, Clone)]
pub struct Grid {
    context: BatchContext,
    validator: RowValidator,
    rows: Vec<GridRow>,
    mode: ValidationMode,
    policy: ReplicatePolicy,
    initial_row_count: usize,
}

impl Grid {
    /// Create a grid with the default engine configuration.
    #[must_use]
    pub fn new(context: BatchContext) -> Self {
        Self::with_config(context, &EngineConfig::default())
    }

    /// Create a grid starting with `config.initial_row_count` empty rows.
    #[must_use]
    pub fn with_config(context: BatchContext, config: &EngineConfig) -> Self {
        let validator = RowValidator::sample_batch(&context);
        let mut grid = Self {
            context,
            validator,
            rows: Vec::new(),
            mode: ValidationMode::Eager,
            policy: config.replicate_policy(),
            initial_row_count: config.initial_row_count(),
        };
        grid.reset();
        grid
    }

    /// Get the context the grid edits against.
    #[must_use]
    pub const fn context(&self) -> &BatchContext {
        &self.context
    }

    /// Get the rows.
    #[must_use]
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the grid has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the current validation mode.
    #[must_use]
    pub const fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Raw text of a cell.
    #[must_use]
    pub fn cell(&self, row: usize, column: Column) -> Option<&str> {
        self.rows.get(row).map(|r| r.cell(column))
    }

    /// Records of all rows that are not entirely blank, in row order.
    #[must_use]
    pub fn records(&self) -> Vec<RowRecord> {
        self.rows
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| row.record.clone())
            .collect()
    }

    /// Apply a command.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `SetCell` addresses a row that does not
    /// exist.
    pub fn dispatch(&mut self, command: GridCommand) -> Result<GridOutcome> {
        let verdicts = match command {
            GridCommand::AddEmptyRow => {
                let pending = self.mode == ValidationMode::Lazy;
                self.lazily(|grid| grid.rows.push(GridRow::empty(pending)))
            }
            GridCommand::RemoveLastRow => {
                self.rows.pop();
                self.validate_if_eager()
            }
            GridCommand::SetCell { row, column, value } => self.set_cell(row, column, value)?,
            GridCommand::LoadRows(records) => self.lazily(|grid| grid.load(records)),
            GridCommand::Prefill => self.lazily(|grid| {
                let records = prefill::prefill_context(&grid.context);
                grid.load(records);
            }),
            GridCommand::Reset => {
                self.reset();
                Vec::new()
            }
            GridCommand::SetMode(mode) => self.set_mode(mode),
            GridCommand::ValidateAll => self.validate_all(),
        };
        Ok(GridOutcome { verdicts })
    }

    /// Validate every row and report; leaves the mode untouched.
    pub fn validate_all(&mut self) -> Vec<CellVerdict> {
        for row in &mut self.rows {
            row.pending = false;
            row.verdicts.clear();
        }
        let verdicts = self.validator.validate_all(&self.rows);
        for verdict in &verdicts {
            if let Some(row) = self.rows.get_mut(verdict.row()) {
                row.verdicts.push(verdict.clone());
            }
        }
        debug!(rows = self.rows.len(), "validated grid");
        verdicts
    }

    /// Validate every row into one report, merging row chunks of
    /// `chunk_size`.
    #[must_use]
    pub fn report(&self, chunk_size: usize) -> ValidationReport {
        self.validator.report(&self.rows, chunk_size)
    }

    fn reset(&mut self) {
        self.rows = (0..self.initial_row_count)
            .map(|_| GridRow::empty(false))
            .collect();
        self.mode = ValidationMode::Eager;
    }

    fn load(&mut self, records: Vec<RowRecord>) {
        info!(rows = records.len(), "loading rows into grid");
        let context = &self.context;
        self.rows = records
            .into_iter()
            .map(|record| GridRow::from_record(context, record, true))
            .collect();
    }

    fn set_mode(&mut self, mode: ValidationMode) -> Vec<CellVerdict> {
        let previous = self.mode;
        self.mode = mode;
        if previous == ValidationMode::Lazy && mode == ValidationMode::Eager {
            self.validate_all()
        } else {
            Vec::new()
        }
    }

    /// Run a bulk change with validation suspended, then restore the previous
    /// mode. Restoring eager mode validates every row.
    fn lazily(&mut self, change: impl FnOnce(&mut Self)) -> Vec<CellVerdict> {
        let previous = self.mode;
        self.mode = ValidationMode::Lazy;
        change(self);
        self.set_mode(previous)
    }

    fn validate_if_eager(&mut self) -> Vec<CellVerdict> {
        match self.mode {
            ValidationMode::Eager => self.validate_all(),
            ValidationMode::Lazy => Vec::new(),
        }
    }

    fn set_cell(&mut self, row: usize, column: Column, value: String) -> Result<Vec<CellVerdict>> {
        let Some(target) = self.rows.get_mut(row) else {
            return Err(Error::InvalidInput(format!(
                "row {row} does not exist (grid has {} rows)",
                self.rows.len()
            )));
        };
        target.cells[column.index()] = value;
        Self::resolve_cell(&self.context, self.policy, target, column);

        if self.mode == ValidationMode::Lazy {
            return Ok(Vec::new());
        }
        let distinct_column = self
            .validator
            .columns()
            .iter()
            .any(|spec| spec.column() == column && spec.is_distinct());
        if distinct_column {
            // a changed value can create or clear duplicates in other rows
            return Ok(self.validate_all());
        }
        let verdicts = self.validator.validate(row, &self.rows);
        if let Some(target) = self.rows.get_mut(row) {
            target.pending = false;
            target.verdicts.clone_from(&verdicts);
        }
        Ok(verdicts)
    }

    /// Update the record of `row` from the text of `column`.
    fn resolve_cell(
        context: &BatchContext,
        policy: ReplicatePolicy,
        row: &mut GridRow,
        column: Column,
    ) {
        let text = row.cells[column.index()].trim().to_string();
        let non_blank = || Some(text.clone()).filter(|t| !t.is_empty());
        match column {
            Column::AnalysisMethod => {
                row.record
                    .set_analysis_method(resolve::analysis_method(&text).resolved());
            }
            Column::SampleLabel => row.record.set_sample_name(non_blank()),
            Column::Condition => {
                let group = resolve::experimental_group(&text, context.groups()).resolved();
                row.record.set_experimental_group(group);
                // the replicate label may name a replicate of the new group
                Self::resolve_cell(context, policy, row, Column::BiologicalReplicate);
            }
            Column::BiologicalReplicate => {
                let group = row.record.experimental_group().map(Arc::clone);
                let replicate = resolve::biological_replicate(
                    &text,
                    group.as_deref(),
                    context.groups(),
                    policy,
                )
                .resolved();
                row.record.set_biological_replicate(replicate);
            }
            Column::Species | Column::Specimen | Column::Analyte => {
                if let Some(axis) = column.ontology_axis() {
                    let term = resolve::ontology_term(&text, context.terms(axis)).resolved();
                    row.record.set_term(axis, term);
                }
            }
            Column::Comment => row.record.set_comment(non_blank()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{
        AnalysisMethod, BiologicalReplicate, Condition, ExperimentId, ExperimentalValue,
        GroupId, OntologyAxis, OntologyTerm, ReplicateId, VariableLevel,
    };

    fn context() -> BatchContext {
        let group = |id: u64, genotype: &str, labels: &[&str]| {
            let condition = Condition::new(vec![VariableLevel::new(
                "genotype",
                ExperimentalValue::new(genotype),
            )])
            .unwrap();
            let replicates = labels
                .iter()
                .zip(1..)
                .map(|(label, n)| BiologicalReplicate::new(ReplicateId(id * 10 + n), *label))
                .collect();
            Arc::new(ExperimentalGroup::new(GroupId(id), condition, replicates).unwrap())
        };
        BatchContext::new(
            ExperimentId::new("E1"),
            vec![group(1, "wt", &["R1", "R2"]), group(2, "ko", &["R3"])],
        )
        .with_terms(
            OntologyAxis::Species,
            vec![OntologyTerm::new("Homo sapiens", "NCBITaxon:9606")],
        )
        .with_terms(
            OntologyAxis::Specimen,
            vec![OntologyTerm::new("blood", "UBERON:0000178")],
        )
        .with_terms(
            OntologyAxis::Analyte,
            vec![OntologyTerm::new("RNA", "CHEBI:33697")],
        )
    }

    fn set(grid: &mut Grid, row: usize, column: Column, value: &str) -> GridOutcome {
        grid.dispatch(GridCommand::SetCell {
            row,
            column,
            value: value.to_string(),
        })
        .unwrap()
    }

    fn fill_row(grid: &mut Grid, row: usize, label: &str) {
        set(grid, row, Column::AnalysisMethod, "RNA sequencing");
        set(grid, row, Column::SampleLabel, label);
        set(grid, row, Column::Condition, "genotype:wt");
        set(grid, row, Column::BiologicalReplicate, "R1");
        set(grid, row, Column::Species, "Homo sapiens");
        set(grid, row, Column::Specimen, "blood");
        set(grid, row, Column::Analyte, "RNA");
    }

    #[test]
    fn test_grid_starts_with_initial_rows() {
        let grid = Grid::new(context());
        assert_eq!(grid.len(), 2);
        assert!(grid.records().is_empty());
    }

    #[test]
    fn test_set_cell_resolves_record() {
        let mut grid = Grid::new(context());
        fill_row(&mut grid, 0, "s1");
        let record = grid.rows()[0].record();
        assert_eq!(record.analysis_method(), Some(AnalysisMethod::RnaSeq));
        assert_eq!(record.experimental_group().unwrap().id(), GroupId(1));
        assert_eq!(record.biological_replicate().unwrap().id(), ReplicateId(11));
        assert!(grid.rows()[0].verdicts().iter().all(CellVerdict::is_valid));
    }

    #[test]
    fn test_changing_condition_rebinds_replicate() {
        let mut grid = Grid::new(context());
        fill_row(&mut grid, 0, "s1");
        let outcome = set(&mut grid, 0, Column::Condition, "genotype:ko");
        assert!(grid.rows()[0].record().biological_replicate().is_none());
        let invalid: Vec<Column> = outcome
            .verdicts()
            .iter()
            .filter(|v| !v.is_valid())
            .map(CellVerdict::column)
            .collect();
        assert_eq!(invalid, vec![Column::BiologicalReplicate]);
    }

    #[test]
    fn test_set_cell_out_of_range() {
        let mut grid = Grid::new(context());
        let result = grid.dispatch(GridCommand::SetCell {
            row: 9,
            column: Column::Comment,
            value: String::new(),
        });
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_label_revalidates_other_rows() {
        let mut grid = Grid::new(context());
        fill_row(&mut grid, 0, "same");
        fill_row(&mut grid, 1, "same");
        let duplicates = |grid: &Grid| {
            grid.rows()
                .iter()
                .flat_map(GridRow::verdicts)
                .filter(|v| v.column() == Column::SampleLabel && !v.is_valid())
                .count()
        };
        assert_eq!(duplicates(&grid), 2);
        set(&mut grid, 1, Column::SampleLabel, "other");
        assert_eq!(duplicates(&grid), 0);
    }

    #[test]
    fn test_add_row_in_lazy_mode_is_pending() {
        let mut grid = Grid::new(context());
        grid.dispatch(GridCommand::SetMode(ValidationMode::Lazy)).unwrap();
        let outcome = grid.dispatch(GridCommand::AddEmptyRow).unwrap();
        assert!(outcome.verdicts().is_empty());
        assert_eq!(grid.mode(), ValidationMode::Lazy);
        assert!(grid.rows()[2].is_pending());

        let outcome = grid.dispatch(GridCommand::SetMode(ValidationMode::Eager)).unwrap();
        // every row re-validated, not only the last one
        let rows: std::collections::BTreeSet<usize> =
            outcome.verdicts().iter().map(CellVerdict::row).collect();
        assert_eq!(rows.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(!grid.rows()[2].is_pending());
    }

    #[test]
    fn test_prefill_restores_eager_and_validates() {
        let mut grid = Grid::new(context());
        let outcome = grid.dispatch(GridCommand::Prefill).unwrap();
        assert_eq!(grid.mode(), ValidationMode::Eager);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.cell(2, Column::Condition), Some("genotype:ko"));
        assert_eq!(grid.cell(0, Column::Species), Some("Homo sapiens"));
        // analysis and sample label are left for the user
        assert!(!outcome.is_valid());
        assert_eq!(outcome.report().failures().len(), 6);
    }

    #[test]
    fn test_remove_last_row_and_reset() {
        let mut grid = Grid::new(context());
        grid.dispatch(GridCommand::RemoveLastRow).unwrap();
        assert_eq!(grid.len(), 1);
        grid.dispatch(GridCommand::Reset).unwrap();
        assert_eq!(grid.len(), 2);
    }
}
