//! Sample sheet row validation
//!
//! Rows of a sample registration or update sheet reference conditions by
//! their canonical string, analysis methods by abbreviation and ontology
//! terms by `"label [CURIE]"`. Each row yields a report plus the assembled
//! [`RowRecord`].

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::tsv::{Sheet, SheetRow};
use crate::canonical;
use crate::context::BatchContext;
use crate::experiment::{
    extract_curie, AnalysisMethod, ExperimentalGroup, OntologyAxis, RowRecord, SampleCode,
    SampleId,
};
use crate::source::OntologyTermSource;
use crate::validation::ValidationReport;
use crate::{Error, Result};

/// Header of the sample code column (update sheets only).
pub const SAMPLE_CODE_COLUMN: &str = "QBiC Sample Id";

const ANALYSIS_COLUMN: &str = "Analysis to be performed";
const LABEL_COLUMN: &str = "Sample label";
const REPLICATE_COLUMN: &str = "Biological replicate id";
const CONDITION_COLUMN: &str = "Condition";
const SPECIES_COLUMN: &str = "Species";
const SPECIMEN_COLUMN: &str = "Specimen";
const ANALYTE_COLUMN: &str = "Analyte";
const COMMENT_COLUMN: &str = "Customer comment";

/// Raw cells of one sample sheet row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSheetRow {
    line: usize,
    sample_code: String,
    analysis: String,
    label: String,
    replicate: String,
    condition: String,
    species: String,
    specimen: String,
    analyte: String,
    comment: String,
}

impl SampleSheetRow {
    /// Extract the non-blank rows of a sample sheet.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the first missing column. The
    /// sample code column is only required when `with_sample_code` is set.
    pub fn from_sheet(sheet: &Sheet, with_sample_code: bool) -> Result<Vec<Self>> {
        let column = |name: &str| {
            sheet
                .column_index(name)
                .ok_or_else(|| Error::InvalidInput(format!("missing column '{name}'")))
        };
        let code = if with_sample_code {
            Some(column(SAMPLE_CODE_COLUMN)?)
        } else {
            None
        };
        let analysis = column(ANALYSIS_COLUMN)?;
        let label = column(LABEL_COLUMN)?;
        let replicate = column(REPLICATE_COLUMN)?;
        let condition = column(CONDITION_COLUMN)?;
        let species = column(SPECIES_COLUMN)?;
        let specimen = column(SPECIMEN_COLUMN)?;
        let analyte = column(ANALYTE_COLUMN)?;
        let comment = sheet.column_index(COMMENT_COLUMN);

        let cell = |row: &SheetRow, index: Option<usize>| {
            index.map_or_else(String::new, |i| row.cell(i).to_string())
        };
        Ok(sheet
            .rows()
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| Self {
                line: row.line(),
                sample_code: cell(row, code),
                analysis: cell(row, Some(analysis)),
                label: cell(row, Some(label)),
                replicate: cell(row, Some(replicate)),
                condition: cell(row, Some(condition)),
                species: cell(row, Some(species)),
                specimen: cell(row, Some(specimen)),
                analyte: cell(row, Some(analyte)),
                comment: cell(row, comment),
            })
            .collect())
    }

    /// Line number in the sheet.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Raw text of an ontology column.
    #[must_use]
    pub fn term_text(&self, axis: OntologyAxis) -> &str {
        match axis {
            OntologyAxis::Species => &self.species,
            OntologyAxis::Specimen => &self.specimen,
            OntologyAxis::Analyte => &self.analyte,
        }
    }
}

/// Validates sample sheet rows against one experiment.
#[derive(Debug, Clone)]
pub struct SampleSheetValidator {
    conditions: FxHashMap<String, Arc<ExperimentalGroup>>,
    existing: FxHashMap<SampleCode, SampleId>,
}

impl SampleSheetValidator {
    /// Create a validator for new samples of an experiment.
    #[must_use]
    pub fn new(context: &BatchContext) -> Self {
        let conditions = context
            .groups()
            .iter()
            .map(|group| (canonical::format(group.condition()), Arc::clone(group)))
            .collect();
        Self {
            conditions,
            existing: FxHashMap::default(),
        }
    }

    /// Make the persisted samples known, for validating update sheets.
    #[must_use]
    pub fn with_existing(mut self, rows: &[RowRecord]) -> Self {
        self.existing = rows
            .iter()
            .filter_map(|row| Some((row.sample_code()?.clone(), row.sample_id()?.clone())))
            .collect();
        self
    }

    /// Validate a row describing a sample that is not registered yet.
    ///
    /// # Errors
    ///
    /// Propagates term lookup errors.
    pub async fn validate_new<T: OntologyTermSource>(
        &self,
        row: &SampleSheetRow,
        terms: &T,
    ) -> Result<(ValidationReport, RowRecord)> {
        let mut record = RowRecord::new();
        record.set_sample_name(Some(row.label.clone()).filter(|l| !l.is_empty()));
        record.set_comment(Some(row.comment.clone()).filter(|c| !c.is_empty()));

        let mut report = ValidationReport::new();
        match self.conditions.get(&row.condition) {
            Some(group) => {
                record.set_biological_replicate(group.replicate_by_label(&row.replicate).cloned());
                record.set_experimental_group(Some(Arc::clone(group)));
                report.add_passed();
            }
            None => report.add_failure(format!("Unknown condition: {}", row.condition)),
        }
        match AnalysisMethod::for_abbreviation(&row.analysis) {
            Some(method) => {
                record.set_analysis_method(Some(method));
                report.add_passed();
            }
            None => report.add_failure(format!("Unknown analysis: {}", row.analysis)),
        }
        for axis in OntologyAxis::ALL {
            let text = row.term_text(axis);
            let Some(curie) = extract_curie(text) else {
                report.add_failure(format!("Missing CURIE in {axis}: {text}"));
                continue;
            };
            match terms.find_by_curie(&curie).await? {
                Some(term) => {
                    record.set_term(axis, Some(term));
                    report.add_passed();
                }
                None => report.add_failure(format!("Unknown {axis}: {curie}")),
            }
        }
        debug!(line = row.line, valid = report.is_valid(), "validated sample row");
        Ok((report, record))
    }

    /// Validate a row describing a registered sample.
    ///
    /// The sample code must name a known sample; the remaining checks are
    /// those of [`SampleSheetValidator::validate_new`].
    ///
    /// # Errors
    ///
    /// Propagates term lookup errors.
    pub async fn validate_existing<T: OntologyTermSource>(
        &self,
        row: &SampleSheetRow,
        terms: &T,
    ) -> Result<(ValidationReport, RowRecord)> {
        if row.sample_code.is_empty() {
            return Ok((ValidationReport::failure("Missing sample id."), RowRecord::new()));
        }
        let code = SampleCode::new(row.sample_code.clone());
        let Some(sample_id) = self.existing.get(&code).cloned() else {
            return Ok((
                ValidationReport::failure(format!("Unknown sample id: {}", row.sample_code)),
                RowRecord::new(),
            ));
        };
        let (report, record) = self.validate_new(row, terms).await?;
        Ok((report, with_identity(record, sample_id, code)))
    }
}

/// Copy a record, attaching identity and code.
fn with_identity(record: RowRecord, sample_id: SampleId, code: SampleCode) -> RowRecord {
    let mut identified = RowRecord::builder().sample_id(sample_id).sample_code(code).build();
    identified.set_analysis_method(record.analysis_method());
    identified.set_sample_name(record.sample_name().map(str::to_string));
    identified.set_biological_replicate(record.biological_replicate().cloned());
    identified.set_experimental_group(record.experimental_group().cloned());
    for axis in OntologyAxis::ALL {
        identified.set_term(axis, record.term(axis).cloned());
    }
    identified.set_comment(record.comment().map(str::to_string));
    identified
}
