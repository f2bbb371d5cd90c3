//! Column rules of the sample batch grid

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::BatchContext;
use crate::experiment::{AnalysisMethod, OntologyAxis};

/// A column of the sample batch grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// `Analysis to be performed`
    AnalysisMethod,
    /// `Sample label`
    SampleLabel,
    /// `Condition`
    Condition,
    /// `Biological replicate ID`
    BiologicalReplicate,
    /// `Species`
    Species,
    /// `Specimen`
    Specimen,
    /// `Analyte`
    Analyte,
    /// `Customer comment`
    Comment,
}

impl Column {
    /// Number of columns.
    pub const COUNT: usize = 8;

    /// All columns in display order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::AnalysisMethod,
        Self::SampleLabel,
        Self::Condition,
        Self::BiologicalReplicate,
        Self::Species,
        Self::Specimen,
        Self::Analyte,
        Self::Comment,
    ];

    /// Header text of the column.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AnalysisMethod => "Analysis to be performed",
            Self::SampleLabel => "Sample label",
            Self::Condition => "Condition",
            Self::BiologicalReplicate => "Biological replicate ID",
            Self::Species => "Species",
            Self::Specimen => "Specimen",
            Self::Analyte => "Analyte",
            Self::Comment => "Customer comment",
        }
    }

    /// Ontology axis backing the column, if any.
    #[must_use]
    pub const fn ontology_axis(self) -> Option<OntologyAxis> {
        match self {
            Self::Species => Some(OntologyAxis::Species),
            Self::Specimen => Some(OntologyAxis::Specimen),
            Self::Analyte => Some(OntologyAxis::Analyte),
            _ => None,
        }
    }

    /// Position in display order.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the accepted values of an enumerated column come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Same options for every row
    Fixed(Vec<String>),
    /// Replicate labels of the group selected in the same row
    ReplicatesOfRowGroup,
}

/// One constraint on a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRule {
    /// Cell must not be blank
    Required,
    /// Non-blank cell must be one of the candidates
    EnumeratedFrom(Candidates),
    /// Non-blank cell must not repeat in another row
    DistinctAcrossRows,
}

impl ColumnRule {
    /// Failure message of this rule for `column` and the offending `value`.
    #[must_use]
    pub fn message(&self, column: Column, value: &str) -> String {
        match self {
            Self::Required => format!(
                "The column '{}' does not allow empty values. Please enter a value.",
                column.name()
            ),
            Self::EnumeratedFrom(_) => format!(
                "'{value}' is not a valid option for column '{}' in this row.",
                column.name()
            ),
            Self::DistinctAcrossRows => format!(
                "The column '{}' does not allow duplicate values.",
                column.name()
            ),
        }
    }
}

/// A column together with its rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    column: Column,
    rules: Vec<ColumnRule>,
}

impl ColumnSpec {
    /// Create a column spec.
    #[must_use]
    pub const fn new(column: Column, rules: Vec<ColumnRule>) -> Self {
        Self { column, rules }
    }

    /// Get the column.
    #[must_use]
    pub const fn column(&self) -> Column {
        self.column
    }

    /// Get the rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ColumnRule] {
        &self.rules
    }

    /// Whether the column carries a distinctness rule.
    #[must_use]
    pub fn is_distinct(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, ColumnRule::DistinctAcrossRows))
    }
}

/// Column rules of the sample batch grid for one experiment.
#[must_use]
pub fn sample_batch_columns(context: &BatchContext) -> Vec<ColumnSpec> {
    let analysis_labels = AnalysisMethod::sorted_labels()
        .into_iter()
        .map(str::to_string)
        .collect();
    let term_column = |column: Column, axis: OntologyAxis| {
        ColumnSpec::new(
            column,
            vec![
                ColumnRule::Required,
                ColumnRule::EnumeratedFrom(Candidates::Fixed(context.term_options(axis))),
            ],
        )
    };
    vec![
        ColumnSpec::new(
            Column::AnalysisMethod,
            vec![
                ColumnRule::Required,
                ColumnRule::EnumeratedFrom(Candidates::Fixed(analysis_labels)),
            ],
        ),
        ColumnSpec::new(
            Column::SampleLabel,
            vec![ColumnRule::Required, ColumnRule::DistinctAcrossRows],
        ),
        ColumnSpec::new(
            Column::Condition,
            vec![
                ColumnRule::Required,
                ColumnRule::EnumeratedFrom(Candidates::Fixed(context.condition_options())),
            ],
        ),
        ColumnSpec::new(
            Column::BiologicalReplicate,
            vec![
                ColumnRule::Required,
                ColumnRule::EnumeratedFrom(Candidates::ReplicatesOfRowGroup),
            ],
        ),
        term_column(Column::Species, OntologyAxis::Species),
        term_column(Column::Specimen, OntologyAxis::Specimen),
        term_column(Column::Analyte, OntologyAxis::Analyte),
        ColumnSpec::new(Column::Comment, Vec::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::ExperimentId;

    #[test]
    fn test_messages() {
        assert_eq!(
            ColumnRule::Required.message(Column::SampleLabel, ""),
            "The column 'Sample label' does not allow empty values. Please enter a value."
        );
        assert_eq!(
            ColumnRule::EnumeratedFrom(Candidates::ReplicatesOfRowGroup)
                .message(Column::BiologicalReplicate, "R9"),
            "'R9' is not a valid option for column 'Biological replicate ID' in this row."
        );
        assert_eq!(
            ColumnRule::DistinctAcrossRows.message(Column::SampleLabel, "x"),
            "The column 'Sample label' does not allow duplicate values."
        );
    }

    #[test]
    fn test_sample_batch_columns_cover_all_columns() {
        let context = BatchContext::new(ExperimentId::new("E1"), Vec::new());
        let columns: Vec<Column> = sample_batch_columns(&context)
            .iter()
            .map(ColumnSpec::column)
            .collect();
        assert_eq!(columns, Column::ALL);
    }

    #[test]
    fn test_only_sample_label_is_distinct() {
        let context = BatchContext::new(ExperimentId::new("E1"), Vec::new());
        let distinct: Vec<Column> = sample_batch_columns(&context)
            .iter()
            .filter(|spec| spec.is_distinct())
            .map(ColumnSpec::column)
            .collect();
        assert_eq!(distinct, vec![Column::SampleLabel]);
    }

    #[test]
    fn test_column_index_matches_order() {
        for (i, column) in Column::ALL.iter().enumerate() {
            assert_eq!(column.index(), i);
        }
    }
}
